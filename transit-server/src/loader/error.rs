//! Loader error types.

use std::path::PathBuf;

use crate::domain::DomainError;

/// Errors from reading topology or schedule sources.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record is malformed; `line` is 1-based
    #[error("line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// Schedule records do not fit the plan
    #[error("schedule does not fit the plan: {0}")]
    Schedule(#[from] DomainError),
}

impl LoadError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        LoadError::Format {
            line,
            reason: reason.into(),
        }
    }
}
