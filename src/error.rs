use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a report run. None of these are recoverable:
/// a run either produces a complete report or no output file at all.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("input file not found or unreadable: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read {}: {detail}", .path.display())]
    InputRead { path: PathBuf, detail: String },

    #[error("unsupported input format: .{0} (expected csv, tsv, json or parquet)")]
    UnsupportedFormat(String),

    #[error("{} has no '{column}' column", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to write {}: {source}", .path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    /// Flatten a loader failure, cause chain included, into [`ReportError::InputRead`].
    pub(crate) fn input_read(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        ReportError::InputRead {
            path: path.into(),
            detail: format!("{err:#}"),
        }
    }
}
