use thiserror::Error;

/// Unified error type for auto-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid semantic version: {0}")]
    InvalidVersion(String),

    #[error("No valid release tag found")]
    NoValidTagFound,

    #[error("Commit range unavailable: {0}")]
    CommitRange(String),

    #[error("Asset name conflict: {0}")]
    AssetConflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Host operation failed: {0}")]
    Host(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in auto-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an invalid-version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion(msg.into())
    }

    /// Create a commit-range error with context
    pub fn commit_range(msg: impl Into<String>) -> Self {
        ReleaseError::CommitRange(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a host error with context
    pub fn host(msg: impl Into<String>) -> Self {
        ReleaseError::Host(msg.into())
    }
}
