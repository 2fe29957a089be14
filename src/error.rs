use crate::drafts::host::HostError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("filesystem error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize archive record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("host rejected request: {0}")]
    Host(#[from] HostError),
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
    #[error("malformed archive record {path}: {reason}")]
    MalformedRecord { path: PathBuf, reason: String },
}

impl DraftError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type DraftResult<T> = Result<T, DraftError>;
