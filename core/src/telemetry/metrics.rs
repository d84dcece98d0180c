use std::sync::Mutex;

use crate::prelude::{SwathError, SwathObserver};

/// Counts folded and skipped track points; safe to share across workers.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    folded: usize,
    skipped: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                folded: 0,
                skipped: 0,
            }),
        }
    }

    pub fn record_folded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.folded += 1;
        }
    }

    pub fn record_skipped(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped += 1;
        }
    }

    /// `(folded, skipped)`.
    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.folded, metrics.skipped)
        } else {
            (0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl SwathObserver for MetricsRecorder {
    fn point_folded(&self, _index: usize, _total: usize) {
        self.record_folded();
    }

    fn point_skipped(&self, _index: usize, _error: &SwathError) {
        self.record_skipped();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_counts_each_event() {
        let metrics = MetricsRecorder::new();
        metrics.point_folded(0, 3);
        metrics.point_folded(1, 3);
        metrics.point_skipped(2, &SwathError::InvalidParameter("r_max".into()));
        assert_eq!(metrics.snapshot(), (2, 1));
    }

    #[test]
    fn pair_observer_fans_out() {
        let pair = (MetricsRecorder::new(), MetricsRecorder::new());
        pair.point_folded(0, 1);
        pair.finished(1, 0);
        assert_eq!(pair.0.snapshot(), (1, 0));
        assert_eq!(pair.1.snapshot(), (1, 0));
    }
}
