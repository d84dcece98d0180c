//! Wind-swath engine for single-storm peak wind maps.
//!
//! A b-deck track is read and converted to SI units, each track point is
//! expanded into a radial wind field over a regular lat/lon grid, and the
//! fields are folded into a per-cell running maximum. The resulting swath can
//! be written as a netCDF classic file or rendered to PNG.

pub mod bdeck;
pub mod math;
pub mod output;
pub mod prelude;
pub mod processing;
pub mod telemetry;
pub mod track;

pub use prelude::{SwathError, SwathObserver, SwathResult, WindProfile};
pub use processing::{generate_swath, SwathAggregator, SwathOutput};
pub use track::{AreaOfInterest, TrackObservation, TrackPoint};
