//! Crate error type
//!
//! Only fatal construction failures are errors. Malformed individual
//! records are logged and skipped (or end the stream) by their readers.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no wind data")]
    NoWindData,

    #[error("no navigation data: telemetry needs a header and at least one row")]
    EmptyTelemetry,

    #[error("invalid telemetry: {0}")]
    Csv(#[from] csv::Error),

    #[error("telemetry header is missing mandatory column '{0}'")]
    MissingColumn(String),

    #[error("no navigation data points found")]
    NoNavigationData,

    #[error("invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
