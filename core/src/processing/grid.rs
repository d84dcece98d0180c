use ndarray::Array2;

use crate::prelude::{SwathError, SwathResult};
use crate::track::AreaOfInterest;

/// Evenly spaced values in `[start, stop)` with numpy `arange` semantics:
/// `ceil((stop - start) / step)` samples at `start + i * step`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    (0..arange_len(start, stop, step))
        .map(|i| start + i as f64 * step)
        .collect()
}

/// Sample count of [`arange`] without allocating; saturates at `usize::MAX`.
pub fn arange_len(start: f64, stop: f64, step: f64) -> usize {
    let count = ((stop - start) / step).ceil();
    if count > 0.0 {
        count as usize
    } else {
        0
    }
}

/// Largest grid accepted, in cells. Each `f64` field of this size is 128 MiB
/// and aggregation holds several of them at once.
pub const MAX_GRID_CELLS: usize = 16 * 1024 * 1024;

/// Regular lat/lon lattice covering an area of interest.
///
/// Axes step from `min` to `max + resolution` (exclusive), so the upper bound
/// is always covered even when the extent is not a multiple of the
/// resolution. Rows index latitude, columns index longitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    resolution: f64,
    pub lat: Array2<f64>,
    pub lon: Array2<f64>,
}

impl Grid {
    pub fn build(area: &AreaOfInterest, resolution: f64) -> SwathResult<Self> {
        area.validate()?;
        if !(resolution > 0.0 && resolution.is_finite()) {
            return Err(SwathError::InvalidArea(format!(
                "grid resolution must be positive, got {}",
                resolution
            )));
        }

        let n_lat = arange_len(area.lat_min, area.lat_max + resolution, resolution);
        let n_lon = arange_len(area.lon_min, area.lon_max + resolution, resolution);
        match n_lat.checked_mul(n_lon) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(SwathError::InvalidArea(format!(
                    "{}x{} grid at resolution {} exceeds {} cells",
                    n_lat, n_lon, resolution, MAX_GRID_CELLS
                )))
            }
        }

        let latitudes = arange(area.lat_min, area.lat_max + resolution, resolution);
        let longitudes = arange(area.lon_min, area.lon_max + resolution, resolution);
        let shape = (latitudes.len(), longitudes.len());

        let lat = Array2::from_shape_fn(shape, |(i, _)| latitudes[i]);
        let lon = Array2::from_shape_fn(shape, |(_, j)| longitudes[j]);

        Ok(Self {
            latitudes,
            longitudes,
            resolution,
            lat,
            lon,
        })
    }

    /// `(n_lat, n_lon)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.latitudes.len(), self.longitudes.len())
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn zeros(&self) -> Array2<f64> {
        Array2::zeros(self.shape())
    }

    /// Coordinates of cell `(i, j)` as `(latitude, longitude)`.
    pub fn coordinates(&self, index: (usize, usize)) -> (f64, f64) {
        (self.latitudes[index.0], self.longitudes[index.1])
    }

    /// Cell whose coordinates are closest to the given point, clamped to the grid.
    pub fn nearest_index(&self, latitude: f64, longitude: f64) -> (usize, usize) {
        (
            nearest_axis_index(&self.latitudes, self.resolution, latitude),
            nearest_axis_index(&self.longitudes, self.resolution, longitude),
        )
    }
}

fn nearest_axis_index(axis: &[f64], step: f64, value: f64) -> usize {
    let last = axis.len().saturating_sub(1);
    match axis.first() {
        Some(&origin) => {
            let offset = ((value - origin) / step).round();
            if offset.is_nan() || offset < 0.0 {
                0
            } else {
                (offset as usize).min(last)
            }
        }
        None => 0,
    }
}
