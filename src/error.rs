use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Whole-source failures. Reported once per run; the run yields no entries.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("input not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path: path.to_path_buf() }
        } else {
            Self::Io { path: path.to_path_buf(), source }
        }
    }
}

/// A single input line that could not be used. Always skipped, never fatal.
#[derive(Debug, Error)]
#[error("line {line}: {reason}")]
pub struct MalformedRecord {
    pub line: u64,
    pub reason: MalformedReason,
}

#[derive(Debug, Error)]
pub enum MalformedReason {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid date {0:?}")]
    BadDate(String),
}

impl MalformedRecord {
    pub fn new(line: u64, reason: impl Into<MalformedReason>) -> Self {
        Self { line, reason: reason.into() }
    }
}
