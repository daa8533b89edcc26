use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while preparing the changelog.
/// The release continues; these are reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The changelog exists but could not be read; the default document was used instead
    ChangelogUnreadable { path: PathBuf, reason: String },
    /// The changelog has no `## ` section to insert before, so it was left unchanged
    ChangelogEntryNotInserted { path: PathBuf, version: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::ChangelogUnreadable { path, reason } => {
                write!(
                    f,
                    "Cannot read '{}' ({}), starting from the default changelog",
                    path.display(),
                    reason
                )
            }
            BoundaryWarning::ChangelogEntryNotInserted { path, version } => {
                write!(
                    f,
                    "No '## ' section found in '{}', entry for {} was not inserted",
                    path.display(),
                    version
                )
            }
        }
    }
}
