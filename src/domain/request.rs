use std::path::PathBuf;

use super::version::Version;
use crate::error::{ReleaseError, Result};

/// Author and tagger identity for the release commit and tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Author {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Raw release inputs as collected from flags, environment and config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub message: String,
    pub version: String,
    pub author_name: String,
    pub author_email: String,
    pub repo: PathBuf,
}

/// A validated release: parsed version and complete author identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub message: String,
    pub version: Version,
    pub author: Author,
}

impl ReleaseRequest {
    /// Check every field is present, then parse the version.
    ///
    /// Fields are checked in a fixed order so the first missing one is reported.
    pub fn validate(&self) -> Result<Release> {
        if self.message.is_empty() {
            return Err(ReleaseError::MissingField("Message"));
        }
        if self.version.is_empty() {
            return Err(ReleaseError::MissingField("Version"));
        }
        if self.author_name.is_empty() {
            return Err(ReleaseError::MissingField("AuthorName"));
        }
        if self.author_email.is_empty() {
            return Err(ReleaseError::MissingField("AuthorEmail"));
        }
        if self.repo.as_os_str().is_empty() {
            return Err(ReleaseError::MissingField("Repo"));
        }

        Ok(Release {
            message: self.message.clone(),
            version: Version::parse(&self.version)?,
            author: Author::new(&self.author_name, &self.author_email),
        })
    }
}
