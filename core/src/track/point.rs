use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::math::profile::Jelesnianski;
use crate::prelude::SwathResult;

/// One storm observation as consumed by the swath engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Degrees north, negative in the southern hemisphere.
    pub latitude: f64,
    /// Degrees east, negative in the western hemisphere.
    pub longitude: f64,
    /// Maximum sustained wind speed, m/s.
    pub v_max: f64,
    /// Radius of maximum wind, metres.
    pub r_max: f64,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64, v_max: f64, r_max: f64) -> Self {
        Self {
            latitude,
            longitude,
            v_max,
            r_max,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Builds the radial profile for this point, rejecting unusable radii or speeds.
    pub fn profile(&self) -> SwathResult<Jelesnianski> {
        Jelesnianski::new(self.r_max, self.v_max)
    }
}

/// A converted b-deck row: the track point plus the fields kept for labelling
/// and the intermediate table.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackObservation {
    pub time: NaiveDateTime,
    pub point: TrackPoint,
    /// Wind threshold the quadrant radii refer to, m/s.
    pub rad_threshold_ms: Option<f64>,
    /// NE, SE, SW, NW radii of the threshold wind, metres.
    pub quadrant_radii_m: [Option<f64>; 4],
    /// UTM easting/northing of the center, metres.
    pub utm_x: f64,
    pub utm_y: f64,
}

impl TrackObservation {
    pub fn points(observations: &[TrackObservation]) -> Vec<TrackPoint> {
        observations.iter().map(|obs| obs.point).collect()
    }

    pub fn times(observations: &[TrackObservation]) -> Vec<NaiveDateTime> {
        observations.iter().map(|obs| obs.time).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::SwathError;

    #[test]
    fn profile_rejects_zero_radius() {
        let point = TrackPoint::new(18.0, -66.5, 50.0, 0.0);
        assert!(matches!(
            point.profile(),
            Err(SwathError::InvalidParameter(_))
        ));
    }

    #[test]
    fn center_is_lat_lon_ordered() {
        let point = TrackPoint::new(18.0, -66.5, 50.0, 30_000.0);
        assert_eq!(point.center(), (18.0, -66.5));
    }
}
