use log::{debug, info};

use crate::prelude::SwathObserver;

/// Routes swath progress to the `log` facade.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SwathObserver for LogManager {
    fn point_folded(&self, index: usize, total: usize) {
        debug!("folded track point {} of {}", index + 1, total);
    }

    fn finished(&self, folded: usize, skipped: usize) {
        self.record(&format!(
            "swath aggregation complete ({} folded, {} skipped)",
            folded, skipped
        ));
    }
}
