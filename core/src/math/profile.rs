//! Jelesnianski (1965) gradient-wind approximation.
//!
//! Inside the radius of maximum wind the speed grows as `(r / r_max)^1.5`,
//! outside it decays as `(r_max / r)^0.5`. Both branches equal `v_max` at
//! `r = r_max`.

use crate::prelude::{SwathError, SwathResult, WindProfile};

const INNER_EXPONENT: f64 = 1.5;
const OUTER_EXPONENT: f64 = 0.5;

/// Radial profile parameterised by radius of maximum wind and peak speed.
///
/// `r_max` and the distances passed to [`WindProfile::speed_at`] must share a
/// length unit; the swath engine uses metres for both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jelesnianski {
    r_max: f64,
    v_max: f64,
}

impl Jelesnianski {
    pub fn new(r_max: f64, v_max: f64) -> SwathResult<Self> {
        if !(r_max > 0.0 && r_max.is_finite()) {
            return Err(SwathError::InvalidParameter(format!(
                "radius of maximum wind must be positive, got {}",
                r_max
            )));
        }
        if !(v_max >= 0.0 && v_max.is_finite()) {
            return Err(SwathError::InvalidParameter(format!(
                "maximum wind speed must be non-negative, got {}",
                v_max
            )));
        }
        Ok(Self { r_max, v_max })
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    pub fn v_max(&self) -> f64 {
        self.v_max
    }
}

impl WindProfile for Jelesnianski {
    #[inline]
    fn speed_at(&self, r: f64) -> f64 {
        if r.is_nan() {
            return f64::NAN;
        }
        // Geodesic distances are never negative; kept so the function is total.
        if r < 0.0 {
            return 0.0;
        }
        if r <= self.r_max {
            self.v_max * (r / self.r_max).powf(INNER_EXPONENT)
        } else {
            self.v_max * (self.r_max / r).powf(OUTER_EXPONENT)
        }
    }
}

/// Scalar form of the profile: wind speed at `r` for the given storm.
pub fn evaluate(r: f64, r_max: f64, v_max: f64) -> SwathResult<f64> {
    Ok(Jelesnianski::new(r_max, v_max)?.speed_at(r))
}
