//! Domain logic - pure release rules independent of git operations

pub mod changelog;
pub mod request;
pub mod version;

pub use changelog::{
    has_version_section, insert_entry, ChangelogUpdater, CHANGELOG_FILENAME, DEFAULT_CHANGELOG,
};
pub use request::{Author, Release, ReleaseRequest};
pub use version::Version;
