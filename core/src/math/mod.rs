pub mod geodesy;
pub mod profile;
pub mod stats;
pub mod utm;

pub use geodesy::{distances, distances_into, geodesic_distance, LatLon};
pub use profile::{evaluate, Jelesnianski};
pub use stats::StatsHelper;
