use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("{0} missing")]
    MissingField(&'static str),

    #[error("expected version in format 1.2.3, got '{0}'")]
    VersionFormat(String),

    #[error("expected version in format 1.2.3, invalid component '{component}': {source}")]
    VersionComponent {
        component: String,
        #[source]
        source: ParseIntError,
    },

    #[error("working tree has uncommitted changes")]
    DirtyWorkingTree,

    #[error("tag already exists: {0}")]
    TagExists(String),

    #[error("open git directory failed: {0}")]
    Repository(String),

    #[error("write {} failed: {source}", path.display())]
    ChangelogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("add file failed: {0}")]
    Stage(String),

    #[error("commit failed: {0}")]
    Commit(String),

    #[error("create tag failed: {0}")]
    Tag(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        ReleaseError::Repository(msg.into())
    }

    /// Create a staging error with context
    pub fn stage(msg: impl Into<String>) -> Self {
        ReleaseError::Stage(msg.into())
    }

    /// Create a commit error with context
    pub fn commit(msg: impl Into<String>) -> Self {
        ReleaseError::Commit(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }
}
