use ndarray::Array2;

/// Common error type for swath generation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SwathError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid area: {0}")]
    InvalidArea(String),
}

pub type SwathResult<T> = Result<T, SwathError>;

/// Radial wind profile around a storm center.
pub trait WindProfile {
    /// Wind speed at distance `r` from the center, in the profile's length unit.
    fn speed_at(&self, r: f64) -> f64;

    /// Replaces every distance in `field` with the wind speed at that distance.
    fn apply(&self, field: &mut Array2<f64>) {
        field.mapv_inplace(|r| self.speed_at(r));
    }
}

/// Receives progress events while a swath is being aggregated.
///
/// Observers are shared across rayon workers when the parallel path is
/// enabled, so every hook takes `&self`.
pub trait SwathObserver: Sync {
    fn point_folded(&self, _index: usize, _total: usize) {}

    fn point_skipped(&self, _index: usize, _error: &SwathError) {}

    fn finished(&self, _folded: usize, _skipped: usize) {}
}

impl SwathObserver for () {}

impl<T: SwathObserver + ?Sized> SwathObserver for &T {
    fn point_folded(&self, index: usize, total: usize) {
        (**self).point_folded(index, total);
    }

    fn point_skipped(&self, index: usize, error: &SwathError) {
        (**self).point_skipped(index, error);
    }

    fn finished(&self, folded: usize, skipped: usize) {
        (**self).finished(folded, skipped);
    }
}

impl<A: SwathObserver, B: SwathObserver> SwathObserver for (A, B) {
    fn point_folded(&self, index: usize, total: usize) {
        self.0.point_folded(index, total);
        self.1.point_folded(index, total);
    }

    fn point_skipped(&self, index: usize, error: &SwathError) {
        self.0.point_skipped(index, error);
        self.1.point_skipped(index, error);
    }

    fn finished(&self, folded: usize, skipped: usize) {
        self.0.finished(folded, skipped);
        self.1.finished(folded, skipped);
    }
}
