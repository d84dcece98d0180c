use chrono::{NaiveDate, NaiveDateTime};
use log::info;

use super::reader::BdeckRecord;
use super::{BdeckError, BdeckResult};
use crate::math::utm::latlon_to_utm;
use crate::track::{AreaOfInterest, TrackObservation, TrackPoint};

pub const KNOTS_TO_MS: f64 = 0.51444;
pub const NAUTICAL_MILE_M: f64 = 1852.0;
/// UTM zone used for the intermediate X/Y columns (Puerto Rico).
pub const DEFAULT_UTM_ZONE: u8 = 20;

pub fn knots_to_ms(knots: f64) -> f64 {
    knots * KNOTS_TO_MS
}

pub fn nautical_miles_to_m(nautical_miles: f64) -> f64 {
    nautical_miles * NAUTICAL_MILE_M
}

/// Parses a tenths-of-degree coordinate with a hemisphere suffix, e.g. `655W`.
fn hemi_to_degrees(value: &str, positive: char, negative: char) -> Option<f64> {
    let suffix = value.chars().last()?;
    let magnitude: f64 = value[..value.len() - suffix.len_utf8()].trim().parse().ok()?;
    let hemisphere = suffix.to_ascii_uppercase();
    let degrees = magnitude / 10.0;
    if hemisphere == positive {
        Some(degrees)
    } else if hemisphere == negative {
        Some(-degrees)
    } else {
        None
    }
}

/// `("181N", "665W")` → `(18.1, -66.5)`.
pub fn latlon_hemi_to_degrees(lat: &str, lon: &str) -> Option<(f64, f64)> {
    Some((
        hemi_to_degrees(lat.trim(), 'N', 'S')?,
        hemi_to_degrees(lon.trim(), 'E', 'W')?,
    ))
}

/// Parses a `YYYYMMDDHH` synoptic time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.len() != 10 || !value.is_ascii() {
        return None;
    }
    let date = NaiveDate::parse_from_str(&value[..8], "%Y%m%d").ok()?;
    let hour: u32 = value[8..].parse().ok()?;
    date.and_hms_opt(hour, 0, 0)
}

fn required<'a>(record: &'a BdeckRecord, field: &'static str) -> BdeckResult<&'a str> {
    record.get(field).ok_or(BdeckError::MissingField {
        line: record.line,
        field,
    })
}

fn optional_number(record: &BdeckRecord, field: &'static str) -> BdeckResult<Option<f64>> {
    record
        .get(field)
        .map(|raw| {
            raw.parse::<f64>().map_err(|_| BdeckError::InvalidField {
                line: record.line,
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

/// Converts one row to SI units. Missing VMAX/RMW become 0; a zero radius is
/// rejected later by the swath engine rather than here.
pub fn convert_record(record: &BdeckRecord) -> BdeckResult<TrackObservation> {
    let raw_time = required(record, "YYYYMMDDHH")?;
    let time = parse_timestamp(raw_time).ok_or_else(|| BdeckError::InvalidField {
        line: record.line,
        field: "YYYYMMDDHH",
        value: raw_time.to_string(),
    })?;

    let raw_lat = required(record, "LATN/S")?;
    let raw_lon = required(record, "LONE/W")?;
    let (latitude, longitude) =
        latlon_hemi_to_degrees(raw_lat, raw_lon).ok_or_else(|| BdeckError::InvalidField {
            line: record.line,
            field: "LATN/S, LONE/W",
            value: format!("{} {}", raw_lat, raw_lon),
        })?;

    let v_max = knots_to_ms(optional_number(record, "VMAX")?.unwrap_or(0.0));
    let r_max = nautical_miles_to_m(optional_number(record, "RMW")?.unwrap_or(0.0));
    let rad_threshold_ms = optional_number(record, "RAD")?.map(knots_to_ms);
    // wind radii are distances, so nautical miles rather than knots
    let quadrant_radii_m = [
        optional_number(record, "RAD1")?.map(nautical_miles_to_m),
        optional_number(record, "RAD2")?.map(nautical_miles_to_m),
        optional_number(record, "RAD3")?.map(nautical_miles_to_m),
        optional_number(record, "RAD4")?.map(nautical_miles_to_m),
    ];
    let (utm_x, utm_y) = latlon_to_utm(latitude, longitude, DEFAULT_UTM_ZONE);

    Ok(TrackObservation {
        time,
        point: TrackPoint::new(latitude, longitude, v_max, r_max),
        rad_threshold_ms,
        quadrant_radii_m,
        utm_x,
        utm_y,
    })
}

pub fn convert_records(records: &[BdeckRecord]) -> BdeckResult<Vec<TrackObservation>> {
    info!("Parameter conversion started for {} rows", records.len());
    let observations = records
        .iter()
        .map(convert_record)
        .collect::<BdeckResult<Vec<_>>>()?;
    info!("Parameter conversion finished");
    Ok(observations)
}

/// Keeps observations whose center lies strictly inside `area`.
pub fn filter_inside_area(
    observations: &[TrackObservation],
    area: &AreaOfInterest,
) -> Vec<TrackObservation> {
    observations
        .iter()
        .filter(|obs| area.contains(obs.point.latitude, obs.point.longitude))
        .cloned()
        .collect()
}
