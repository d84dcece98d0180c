//! netCDF output for swath grids.
//!
//! The static swath is repeated once per track timestamp so the file carries
//! the same `wind_speed(time, lat, lon)` layout as time-resolved products.

use std::fs;
use std::path::Path;

use chrono::{NaiveDateTime, TimeZone, Utc};
use log::info;

use super::{OutputError, OutputResult};
use crate::processing::SwathOutput;

/// Default netCDF fill value for `float` variables.
pub const FILL_VALUE_F32: f32 = 9.969_209_968_386_869e36;

pub const TIME_UNITS: &str = "hours since 1970-01-01 00:00:00";

fn hours_since_epoch(time: &NaiveDateTime) -> f64 {
    Utc.from_utc_datetime(time).timestamp() as f64 / 3600.0
}

/// Time axis values; a single zero entry when the track has no timestamps.
fn time_axis(timestamps: &[NaiveDateTime]) -> Vec<f64> {
    if timestamps.is_empty() {
        vec![0.0]
    } else {
        timestamps.iter().map(hours_since_epoch).collect()
    }
}

/// Swath cells as `f32`, NaN replaced by [`FILL_VALUE_F32`], repeated `frames` times.
fn wind_speed_values(output: &SwathOutput, frames: usize) -> Vec<f32> {
    let frame: Vec<f32> = output
        .swath
        .iter()
        .map(|&value| {
            if value.is_nan() {
                FILL_VALUE_F32
            } else {
                value as f32
            }
        })
        .collect();
    let mut values = Vec::with_capacity(frame.len() * frames);
    for _ in 0..frames {
        values.extend_from_slice(&frame);
    }
    values
}

fn nc_error(context: &str) -> impl Fn(::netcdf::Error) -> OutputError + '_ {
    move |e| OutputError::NetCdf(format!("{}: {}", context, e))
}

/// Writes the swath with dims `lon`, `lat`, `time` and variables `lon(lon)`,
/// `lat(lat)`, `time(time)` and `wind_speed(time, lat, lon)`.
pub fn write_swath_netcdf<P: AsRef<Path>>(
    path: P,
    output: &SwathOutput,
    timestamps: &[NaiveDateTime],
) -> OutputResult<()> {
    let path = path.as_ref();
    let (n_lat, n_lon) = output.grid.shape();
    if output.swath.dim() != (n_lat, n_lon) {
        return Err(OutputError::InvalidShape(format!(
            "swath {:?} does not match grid {:?}",
            output.swath.dim(),
            (n_lat, n_lon)
        )));
    }
    let times = time_axis(timestamps);
    let wind_speed = wind_speed_values(output, times.len());
    let longitudes: Vec<f32> = output.grid.longitudes().iter().map(|&v| v as f32).collect();
    let latitudes: Vec<f32> = output.grid.latitudes().iter().map(|&v| v as f32).collect();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = ::netcdf::create(path).map_err(nc_error("creating file"))?;
    file.add_dimension("lon", n_lon)
        .map_err(nc_error("adding lon dimension"))?;
    file.add_dimension("lat", n_lat)
        .map_err(nc_error("adding lat dimension"))?;
    file.add_dimension("time", times.len())
        .map_err(nc_error("adding time dimension"))?;

    file.add_attribute("title", "Swath of maximum sustained wind speed")
        .map_err(nc_error("writing global attributes"))?;
    file.add_attribute("Conventions", "CF-1.8")
        .map_err(nc_error("writing global attributes"))?;
    file.add_attribute("source", "Jelesnianski (1965) radial wind profile")
        .map_err(nc_error("writing global attributes"))?;

    {
        let mut var = file
            .add_variable::<f32>("lon", &["lon"])
            .map_err(nc_error("adding lon"))?;
        var.put_attribute("units", "degrees_east")
            .map_err(nc_error("lon attributes"))?;
        var.put_attribute("long_name", "longitude")
            .map_err(nc_error("lon attributes"))?;
        var.put_values(&longitudes, ..)
            .map_err(nc_error("writing lon"))?;
    }
    {
        let mut var = file
            .add_variable::<f32>("lat", &["lat"])
            .map_err(nc_error("adding lat"))?;
        var.put_attribute("units", "degrees_north")
            .map_err(nc_error("lat attributes"))?;
        var.put_attribute("long_name", "latitude")
            .map_err(nc_error("lat attributes"))?;
        var.put_values(&latitudes, ..)
            .map_err(nc_error("writing lat"))?;
    }
    {
        let mut var = file
            .add_variable::<f64>("time", &["time"])
            .map_err(nc_error("adding time"))?;
        var.put_attribute("units", TIME_UNITS)
            .map_err(nc_error("time attributes"))?;
        var.put_attribute("calendar", "standard")
            .map_err(nc_error("time attributes"))?;
        var.put_values(&times, ..)
            .map_err(nc_error("writing time"))?;
    }
    {
        let mut var = file
            .add_variable::<f32>("wind_speed", &["time", "lat", "lon"])
            .map_err(nc_error("adding wind_speed"))?;
        var.set_fill_value(FILL_VALUE_F32)
            .map_err(nc_error("wind_speed fill value"))?;
        var.put_attribute("units", "m s-1")
            .map_err(nc_error("wind_speed attributes"))?;
        var.put_attribute("long_name", "maximum sustained wind speed")
            .map_err(nc_error("wind_speed attributes"))?;
        var.put_values(&wind_speed, ..)
            .map_err(nc_error("writing wind_speed"))?;
    }

    info!("Swath data written to {}", path.display());
    Ok(())
}
