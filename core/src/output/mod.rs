//! Persisting and rendering finished swaths.

pub mod ncfile;
pub mod png;
pub mod render;

pub use ncfile::write_swath_netcdf;
pub use png::{encode_png, encode_png_auto, write_png};
pub use render::{render_swath, RenderOptions, RenderedImage};

use thiserror::Error;

pub type OutputResult<T> = Result<T, OutputError>;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("netCDF error: {0}")]
    NetCdf(String),
}
