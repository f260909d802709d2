use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TripError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stream I/O error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected at least {expected} fields, found {found}")]
    TooFewFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: column '{column}' value '{value}' invalid: {message}")]
    DataRow {
        line: u64,
        column: &'static str,
        value: String,
        message: String,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl TripError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TripError>;
