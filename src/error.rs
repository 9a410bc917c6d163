use crate::timestamp::FormatError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Log file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid timestamp {raw:?} on line {line}: {source}")]
    TimestampFormat {
        line: usize,
        raw: String,
        #[source]
        source: FormatError,
    },
}
