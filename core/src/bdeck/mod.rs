//! ATCF b-deck track files: reading and conversion to SI units.

pub mod convert;
pub mod reader;

pub use convert::{convert_records, filter_inside_area};
pub use reader::{load_bdeck_file, parse_bdeck, BdeckRecord, DEFAULT_SKIP_ROWS};

use thiserror::Error;

pub type BdeckResult<T> = Result<T, BdeckError>;

#[derive(Error, Debug)]
pub enum BdeckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: invalid {field} value '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}
