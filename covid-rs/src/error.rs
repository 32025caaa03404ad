use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the outer layers (loading, configuration). The numeric core
/// never fails: degenerate inputs are replaced by safe defaults.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    IO(#[from] io::Error),

    #[error("csv error: {0}")]
    CSV(#[from] csv::Error),

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid date: {0}")]
    ParseDate(#[from] chrono::format::ParseError),

    #[error("region {region}: expected {expected} days of data, got {got}")]
    Shape {
        region: String,
        expected: usize,
        got: usize,
    },

    #[error("unknown region: {0}")]
    MissingRegion(String),

    #[error("empty dataset")]
    MissingData,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
