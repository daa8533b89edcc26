//! Changelog text insertion
//!
//! A changelog is a preamble followed by version sections, newest first:
//!
//! ```text
//! # Changelog
//! ...
//!
//! ## 1.1.0
//!
//! - Second release
//!
//! ## 1.0.0
//!
//! - Initial Version
//! ```
//!
//! New sections are spliced in before the first `## ` heading. A document
//! without any such heading is left as it is.

use std::sync::LazyLock;

use regex::bytes::Regex;

use super::version::Version;

/// File name used when no other changelog file is configured
pub const CHANGELOG_FILENAME: &str = "CHANGELOG.md";

/// Document used when the repository has no changelog yet
pub const DEFAULT_CHANGELOG: &str = r#"# Changelog

All notable changes to this project will be documented in this file.

Please choose versions by [Semantic Versioning](http://semver.org/).

* MAJOR version when you make incompatible API changes,
* MINOR version when you add functionality in a backwards-compatible manner, and
* PATCH version when you make backwards-compatible bug fixes.

## 1.0.0

- Initial Version
"#;

// Shortest prefix up to the first newline followed by "##" and ASCII whitespace.
// Matching is byte-wise so documents that are not valid UTF-8 still split.
static SECTION_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s-u)^(.*?)(\n##[\t\n\x0C\r ].*)$")
        .expect("section boundary pattern is valid")
});

/// Returns true if `document` has a version section to insert before.
pub fn has_version_section(document: impl AsRef<[u8]>) -> bool {
    SECTION_BOUNDARY.is_match(document.as_ref())
}

/// Inserts a section for `version` before the first existing version section.
///
/// Returns the document unchanged when it has no `## ` section line.
pub fn insert_entry(document: impl AsRef<[u8]>, version: &Version, message: &str) -> Vec<u8> {
    let document = document.as_ref();
    let Some(captures) = SECTION_BOUNDARY.captures(document) else {
        return document.to_vec();
    };

    let prefix = captures.get(1).map_or(&b""[..], |m| m.as_bytes());
    let remainder = captures.get(2).map_or(&b""[..], |m| m.as_bytes());
    let entry = format!("\n## {}\n\n- {}\n", version, message);

    let mut updated = Vec::with_capacity(document.len() + entry.len());
    updated.extend_from_slice(prefix);
    updated.extend_from_slice(entry.as_bytes());
    updated.extend_from_slice(remainder);
    updated
}

/// Changelog updater with an injected default document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogUpdater {
    default_document: String,
}

impl ChangelogUpdater {
    /// Create an updater that falls back to `default_document`
    pub fn new(default_document: impl Into<String>) -> Self {
        ChangelogUpdater {
            default_document: default_document.into(),
        }
    }

    /// The document used when there is no existing changelog
    pub fn default_document(&self) -> &str {
        &self.default_document
    }

    /// Insert an entry into `existing`, or into the default document if there is none
    pub fn update(&self, existing: Option<&[u8]>, version: &Version, message: &str) -> Vec<u8> {
        let document = existing.unwrap_or(self.default_document.as_bytes());
        insert_entry(document, version, message)
    }
}

impl Default for ChangelogUpdater {
    fn default() -> Self {
        ChangelogUpdater::new(DEFAULT_CHANGELOG)
    }
}
