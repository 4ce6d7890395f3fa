use std::path::PathBuf;

use thiserror::Error;
use wordnet_types::UnknownPos;

/// Result type used across the WordNet readers.
pub type Result<T, E = DbError> = std::result::Result<T, E>;

/// Failures raised while reading or decoding dictionary files.
///
/// Absence of a word is never an error; lookups report it as `None` or an
/// empty list. Everything here means the dataset could not be read or does
/// not match the expected format.
#[derive(Debug, Error)]
pub enum DbError {
    /// A line violates the positional/counted record layout.
    #[error("{context}: malformed record: {reason}")]
    MalformedRecord { context: String, reason: String },

    /// A category tag in a record is not one of `n`, `v`, `a`, `s`, `r`.
    #[error(transparent)]
    UnknownCategory(#[from] UnknownPos),

    /// A required dictionary file does not exist.
    #[error("missing required WordNet file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DbError {
    pub(crate) fn malformed(context: impl ToString, reason: impl Into<String>) -> Self {
        DbError::MalformedRecord {
            context: context.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DbError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, DbError::MalformedRecord { .. })
    }
}
