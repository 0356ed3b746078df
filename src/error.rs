//! Error types for the tab registry and the session serializer

use std::path::PathBuf;
use thiserror::Error;

/// Registry operation addressed a tab that does not exist
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TabError {
    #[error("tab index {index} out of range ({len} tabs open)")]
    InvalidTabIndex { index: usize, len: usize },
}

/// Failure reading a session document
#[derive(Debug, Error)]
pub enum SessionError {
    /// The document is not valid UTF-8 JSON of the expected shape
    #[error("corrupt session document: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("failed to read session file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, SessionError::Corrupt(_))
    }
}
