use log::{info, warn};
use ndarray::Array2;
use rayon::prelude::*;

use crate::math::geodesy::distances_into;
use crate::math::profile::Jelesnianski;
use crate::math::stats::StatsHelper;
use crate::prelude::{SwathError, SwathObserver, SwathResult, WindProfile};
use crate::processing::grid::Grid;
use crate::telemetry::log::LogManager;
use crate::track::{AreaOfInterest, TrackPoint};

/// A track point left out of the swath together with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPoint {
    pub index: usize,
    pub point: TrackPoint,
    pub error: SwathError,
}

/// Highest finite swath value and where it occurs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwathPeak {
    pub speed: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub index: (usize, usize),
}

/// Result of one aggregation: the swath, the grid it lives on, and the points
/// that were rejected along the way.
#[derive(Debug, Clone)]
pub struct SwathOutput {
    pub swath: Array2<f64>,
    pub grid: Grid,
    pub skipped: Vec<SkippedPoint>,
}

impl SwathOutput {
    /// `(swath, grid_lat, grid_lon)`.
    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
        (self.swath, self.grid.lat, self.grid.lon)
    }

    pub fn peak(&self) -> Option<SwathPeak> {
        StatsHelper::peak(&self.swath).map(|(speed, index)| {
            let (latitude, longitude) = self.grid.coordinates(index);
            SwathPeak {
                speed,
                latitude,
                longitude,
                index,
            }
        })
    }
}

/// Folds per-point radial wind fields into a per-cell running maximum.
#[derive(Debug, Clone, Copy)]
pub struct SwathAggregator {
    resolution: f64,
    parallel: bool,
}

impl SwathAggregator {
    pub fn new(resolution: f64) -> Self {
        Self {
            resolution,
            parallel: false,
        }
    }

    /// Spreads track points over the rayon pool; output is identical to the
    /// sequential path.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn generate(
        &self,
        points: &[TrackPoint],
        area: &AreaOfInterest,
        observer: &dyn SwathObserver,
    ) -> SwathResult<SwathOutput> {
        let grid = Grid::build(area, self.resolution)?;
        let (n_lat, n_lon) = grid.shape();
        info!(
            "Swath generation started: {} track points on a {}x{} grid",
            points.len(),
            n_lat,
            n_lon
        );

        let mut accepted = Vec::with_capacity(points.len());
        let mut skipped = Vec::new();
        for (index, point) in points.iter().enumerate() {
            match point.profile() {
                Ok(profile) => accepted.push((index, *point, profile)),
                Err(error) => {
                    warn!("skipping track point {}: {}", index, error);
                    observer.point_skipped(index, &error);
                    skipped.push(SkippedPoint {
                        index,
                        point: *point,
                        error,
                    });
                }
            }
        }

        let total = points.len();
        let swath = if self.parallel {
            fold_parallel(&grid, &accepted, total, observer)
        } else {
            fold_sequential(&grid, &accepted, total, observer)
        };

        observer.finished(accepted.len(), skipped.len());
        info!(
            "Swath generation finished: {} folded, {} skipped",
            accepted.len(),
            skipped.len()
        );

        Ok(SwathOutput {
            swath,
            grid,
            skipped,
        })
    }
}

/// Generates the swath sequentially, logging progress and skipped points.
pub fn generate_swath(
    points: &[TrackPoint],
    area: &AreaOfInterest,
    grid_resolution: f64,
) -> SwathResult<SwathOutput> {
    SwathAggregator::new(grid_resolution).generate(points, area, &LogManager::new())
}

/// Distance field for one point, turned into wind speeds, folded into `swath`.
/// `field` is scratch space of the grid's shape.
fn accumulate(
    grid: &Grid,
    point: &TrackPoint,
    profile: &Jelesnianski,
    field: &mut Array2<f64>,
    swath: &mut Array2<f64>,
) {
    distances_into(&grid.lat, &grid.lon, point.center(), field);
    profile.apply(field);
    StatsHelper::fold_max(swath, field);
}

fn fold_sequential(
    grid: &Grid,
    accepted: &[(usize, TrackPoint, Jelesnianski)],
    total: usize,
    observer: &dyn SwathObserver,
) -> Array2<f64> {
    let mut swath = grid.zeros();
    let mut field = grid.zeros();
    for (index, point, profile) in accepted {
        accumulate(grid, point, profile, &mut field, &mut swath);
        observer.point_folded(*index, total);
    }
    swath
}

fn fold_parallel(
    grid: &Grid,
    accepted: &[(usize, TrackPoint, Jelesnianski)],
    total: usize,
    observer: &dyn SwathObserver,
) -> Array2<f64> {
    accepted
        .par_iter()
        .fold(
            || (grid.zeros(), grid.zeros()),
            |(mut swath, mut field), (index, point, profile)| {
                accumulate(grid, point, profile, &mut field, &mut swath);
                observer.point_folded(*index, total);
                (swath, field)
            },
        )
        .map(|(swath, _)| swath)
        .reduce(
            || grid.zeros(),
            |mut left, right| {
                StatsHelper::fold_max(&mut left, &right);
                left
            },
        )
}
