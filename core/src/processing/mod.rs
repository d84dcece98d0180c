pub mod grid;
pub mod swath;

pub use grid::{arange, arange_len, Grid, MAX_GRID_CELLS};
pub use swath::{generate_swath, SkippedPoint, SwathAggregator, SwathOutput, SwathPeak};
