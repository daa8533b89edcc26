//! Git operations abstraction layer
//!
//! The release workflow talks to version control through the [Repository]
//! trait. Implementations:
//!
//! - [repository::Git2Repository]: real repositories through the `git2` crate
//! - [mock::MockRepository]: in-memory state for tests
//!
//! ```rust
//! # use git_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! if repo.is_clean()? && !repo.tag_exists("1.2.3")? {
//!     println!("ready to release 1.2.3");
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::Author;
use crate::error::Result;
use git2::Oid;
use std::path::{Path, PathBuf};

/// Commit information read back after committing
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

impl CommitInfo {
    /// First seven characters of the hash
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// Version-control capabilities the release workflow relies on
///
/// All methods return [crate::error::Result<T>]; implementations map the
/// underlying errors to the [crate::error::ReleaseError] variant naming the
/// step that failed.
pub trait Repository {
    /// Root of the working tree
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Working directory path
    /// * `Err` - If the repository is bare
    fn workdir(&self) -> Result<PathBuf>;

    /// Whether the working tree has no staged, unstaged or untracked changes
    ///
    /// Ignored files do not count as changes.
    fn is_clean(&self) -> Result<bool>;

    /// Whether a tag with the given name exists
    ///
    /// # Arguments
    /// * `tag_name` - Name of the tag (e.g., "1.2.3")
    fn tag_exists(&self, tag_name: &str) -> Result<bool>;

    /// Stage a file for the next commit
    ///
    /// # Arguments
    /// * `path` - Path relative to the working directory
    fn stage_path(&self, path: &Path) -> Result<()>;

    /// Commit the index on top of HEAD
    ///
    /// Author and committer are both `author`, timestamped now. With `all`,
    /// modified and deleted tracked files are staged first.
    ///
    /// # Returns
    /// * `Ok(Oid)` - Object ID of the new commit
    /// * `Err` - If the index or commit cannot be written
    fn commit(&self, author: &Author, message: &str, all: bool) -> Result<Oid>;

    /// Resolve a commit object by ID
    fn find_commit(&self, oid: Oid) -> Result<CommitInfo>;

    /// Create an annotated tag pointing at a commit
    ///
    /// # Arguments
    /// * `name` - Name for the new tag
    /// * `target` - Commit the tag points to
    /// * `tagger` - Identity recorded on the tag object
    /// * `message` - Tag message
    ///
    /// # Returns
    /// * `Ok(Oid)` - Object ID of the tag object
    /// * `Err` - If the tag already exists, the target is not a commit, or Git fails
    fn create_annotated_tag(
        &self,
        name: &str,
        target: Oid,
        tagger: &Author,
        message: &str,
    ) -> Result<Oid>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash() {
        let info = CommitInfo {
            hash: "0123456789abcdef".to_string(),
            message: "m".to_string(),
            author: "a".to_string(),
        };
        assert_eq!(info.short_hash(), "0123456");
    }

    #[test]
    fn test_short_hash_of_short_value() {
        let info = CommitInfo {
            hash: "abc".to_string(),
            message: "m".to_string(),
            author: "a".to_string(),
        };
        assert_eq!(info.short_hash(), "abc");
    }
}
