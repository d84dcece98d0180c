use serde::{Deserialize, Serialize};

use crate::prelude::{SwathError, SwathResult};

/// Geographic bounding box of the swath grid, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl AreaOfInterest {
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> SwathResult<Self> {
        let area = Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        };
        area.validate()?;
        Ok(area)
    }

    pub fn validate(&self) -> SwathResult<()> {
        let bounds = [self.lat_min, self.lat_max, self.lon_min, self.lon_max];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(SwathError::InvalidArea(format!(
                "non-finite bounds {:?}",
                bounds
            )));
        }
        if self.lat_min >= self.lat_max {
            return Err(SwathError::InvalidArea(format!(
                "lat_min {} must be below lat_max {}",
                self.lat_min, self.lat_max
            )));
        }
        if self.lon_min >= self.lon_max {
            return Err(SwathError::InvalidArea(format!(
                "lon_min {} must be below lon_max {}",
                self.lon_min, self.lon_max
            )));
        }
        Ok(())
    }

    /// True when the point lies strictly inside the box; edges are outside.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude > self.lat_min
            && latitude < self.lat_max
            && longitude > self.lon_min
            && longitude < self.lon_max
    }

    /// Display extent ordered `[lon_min, lon_max, lat_min, lat_max]`.
    pub fn extent(&self) -> [f64; 4] {
        [self.lon_min, self.lon_max, self.lat_min, self.lat_max]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_boxes_are_rejected() {
        assert!(AreaOfInterest::new(19.0, 17.0, -68.0, -65.0).is_err());
        assert!(AreaOfInterest::new(17.0, 19.0, -65.0, -65.0).is_err());
        assert!(AreaOfInterest::new(f64::NAN, 19.0, -68.0, -65.0).is_err());
    }

    #[test]
    fn contains_excludes_boundary() {
        let area = AreaOfInterest::new(17.0, 19.0, -68.0, -65.0).unwrap();
        assert!(area.contains(18.2, -66.1));
        assert!(!area.contains(17.0, -66.1));
        assert!(!area.contains(20.0, -66.1));
    }
}
