pub mod area;
pub mod point;

pub use area::AreaOfInterest;
pub use point::{TrackObservation, TrackPoint};
