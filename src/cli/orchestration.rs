//! Release workflow orchestration
//!
//! Runs the release steps in order against a [Repository]. Every step is
//! fail-fast and nothing is undone: if the commit fails after the changelog
//! was written, the written changelog stays on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use git2::Oid;
use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::domain::{has_version_section, ChangelogUpdater, Release};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// Options for the release workflow that do not come from the release itself
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOptions {
    /// Changelog path relative to the repository root
    pub changelog_file: PathBuf,

    /// Also commit modified and deleted tracked files
    pub commit_all: bool,

    /// Preview mode - compute the changelog but don't write, commit or tag
    pub dry_run: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        ReleaseOptions {
            changelog_file: PathBuf::from(crate::domain::CHANGELOG_FILENAME),
            commit_all: true,
            dry_run: false,
        }
    }
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The released version string
    pub version: String,

    /// The tag that was (or would be) created
    pub tag: String,

    /// Absolute path of the changelog
    pub changelog_path: PathBuf,

    /// The release commit; `None` in dry-run mode
    pub commit: Option<Oid>,

    /// Non-fatal issues met along the way
    pub warnings: Vec<BoundaryWarning>,

    /// Whether this was a preview
    pub dry_run: bool,
}

/// Main release workflow
///
/// 1. Check the working tree is clean
/// 2. Check the version tag does not exist yet
/// 3. Read the changelog, falling back to the default document
/// 4. Insert the new section and write the changelog back
/// 5. Stage the changelog and commit
/// 6. Create an annotated tag named after the version on that commit
///
/// # Arguments
///
/// * `repo` - Repository to release from
/// * `release` - Validated release inputs
/// * `updater` - Changelog updater carrying the default document
/// * `options` - Changelog location, commit and dry-run settings
pub fn run_release_workflow<R: Repository>(
    repo: &R,
    release: &Release,
    updater: &ChangelogUpdater,
    options: &ReleaseOptions,
) -> Result<WorkflowResult> {
    let version = release.version.to_string();
    let mut warnings = Vec::new();

    if !repo.is_clean()? {
        return Err(ReleaseError::DirtyWorkingTree);
    }
    debug!("working tree clean");

    if repo.tag_exists(&version)? {
        return Err(ReleaseError::TagExists(version));
    }
    debug!(tag = %version, "tag not found");

    let changelog_path = repo.workdir()?.join(&options.changelog_file);
    let existing = read_changelog(&changelog_path, &mut warnings);

    let document = existing
        .as_deref()
        .unwrap_or(updater.default_document().as_bytes());
    if !has_version_section(document) {
        warnings.push(BoundaryWarning::ChangelogEntryNotInserted {
            path: changelog_path.clone(),
            version: version.clone(),
        });
    }
    for warning in &warnings {
        warn!("{}", warning);
    }

    let changelog = updater.update(existing.as_deref(), &release.version, &release.message);

    if options.dry_run {
        info!(
            path = %changelog_path.display(),
            "dry run: would add section '## {}' with '- {}'",
            version,
            release.message
        );
        return Ok(WorkflowResult {
            version: version.clone(),
            tag: version,
            changelog_path,
            commit: None,
            warnings,
            dry_run: true,
        });
    }

    write_changelog(&changelog_path, &changelog).map_err(|source| {
        ReleaseError::ChangelogWrite {
            path: changelog_path.clone(),
            source,
        }
    })?;
    debug!(path = %changelog_path.display(), "changelog updated");

    repo.stage_path(&options.changelog_file)?;

    let commit_oid = repo.commit(&release.author, &release.message, options.commit_all)?;
    let commit = repo.find_commit(commit_oid)?;
    info!(commit = %commit.short_hash(), "created release commit");

    repo.create_annotated_tag(&version, commit_oid, &release.author, &version)?;
    info!(tag = %version, "created annotated tag");

    Ok(WorkflowResult {
        version: version.clone(),
        tag: version,
        changelog_path,
        commit: Some(commit_oid),
        warnings,
        dry_run: false,
    })
}

/// Read the changelog as raw bytes. Any failure means "start from the default document".
fn read_changelog(path: &Path, warnings: &mut Vec<BoundaryWarning>) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(document) => Some(document),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no changelog yet, using default document");
            None
        }
        Err(e) => {
            warnings.push(BoundaryWarning::ChangelogUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            None
        }
    }
}

/// Write the changelog; a newly created file is readable by its owner only.
fn write_changelog(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    io::Write::write_all(&mut options.open(path)?, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Author, Version};
    use crate::git::MockRepository;
    use tempfile::TempDir;

    fn release(version: &str) -> Release {
        Release {
            message: "Ship it".to_string(),
            version: Version::parse(version).unwrap(),
            author: Author::new("Release Bot", "bot@example.com"),
        }
    }

    #[test]
    fn test_release_with_default_changelog() {
        let dir = TempDir::new().unwrap();
        let repo = MockRepository::new(dir.path());

        let result = run_release_workflow(
            &repo,
            &release("1.2.3"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap();

        let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
        assert!(changelog.contains("\n## 1.2.3\n\n- Ship it\n\n## 1.0.0\n"));
        assert_eq!(repo.staged_paths(), vec![PathBuf::from("CHANGELOG.md")]);

        let tag = repo.tag("1.2.3").unwrap();
        assert_eq!(Some(tag.target), result.commit);
        assert_eq!(tag.message, "1.2.3");
        assert_eq!(tag.tagger, Author::new("Release Bot", "bot@example.com"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_dirty_tree_aborts_before_changelog() {
        let dir = TempDir::new().unwrap();
        let mut repo = MockRepository::new(dir.path());
        repo.set_dirty();

        let err = run_release_workflow(
            &repo,
            &release("1.2.3"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ReleaseError::DirtyWorkingTree));
        assert!(!dir.path().join("CHANGELOG.md").exists());
        assert_eq!(repo.commit_count(), 0);
    }

    #[test]
    fn test_existing_tag_aborts_before_changelog() {
        let dir = TempDir::new().unwrap();
        let mut repo = MockRepository::new(dir.path());
        repo.add_tag("1.2.3", Oid::from_bytes(&[7; 20]).unwrap());

        let err = run_release_workflow(
            &repo,
            &release("1.2.3"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ReleaseError::TagExists(ref t) if t == "1.2.3"));
        assert!(!dir.path().join("CHANGELOG.md").exists());
    }

    #[test]
    fn test_failed_commit_keeps_written_changelog() {
        let dir = TempDir::new().unwrap();
        let mut repo = MockRepository::new(dir.path());
        repo.fail_commits();

        let err = run_release_workflow(
            &repo,
            &release("2.0.0"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ReleaseError::Commit(_)));
        let changelog = fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap();
        assert!(changelog.contains("## 2.0.0"));
        assert!(repo.tag("2.0.0").is_none());
    }

    #[test]
    fn test_changelog_without_sections_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(&path, "# Notes\n\nfree text\n").unwrap();
        let repo = MockRepository::new(dir.path());

        let result = run_release_workflow(
            &repo,
            &release("0.2.0"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# Notes\n\nfree text\n");
        assert_eq!(
            result.warnings,
            vec![BoundaryWarning::ChangelogEntryNotInserted {
                path,
                version: "0.2.0".to_string(),
            }]
        );
        assert!(repo.tag("0.2.0").is_some());
    }

    #[test]
    fn test_failed_tag_keeps_commit() {
        let dir = TempDir::new().unwrap();
        let mut repo = MockRepository::new(dir.path());
        repo.fail_tags();

        let err = run_release_workflow(
            &repo,
            &release("2.1.0"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ReleaseError::Tag(_)));
        assert_eq!(repo.commit_count(), 1);
        assert!(repo.tag("2.1.0").is_none());
        assert!(fs::read_to_string(dir.path().join("CHANGELOG.md"))
            .unwrap()
            .contains("## 2.1.0"));
    }

    #[test]
    fn test_non_utf8_changelog_keeps_existing_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(
            &path,
            b"# My Project\n\nCaf\xE9 notes\n\n## 0.9.0\n\n- Old user entry\n",
        )
        .unwrap();
        let repo = MockRepository::new(dir.path());

        let result = run_release_workflow(
            &repo,
            &release("1.0.0"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap();

        assert!(result.warnings.is_empty());
        assert_eq!(
            fs::read(&path).unwrap(),
            b"# My Project\n\nCaf\xE9 notes\n\n## 1.0.0\n\n- Ship it\n\n## 0.9.0\n\n- Old user entry\n"
        );
        assert!(repo.tag("1.0.0").is_some());
    }

    #[test]
    fn test_unreadable_changelog_is_reported() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file
        let path = dir.path().join("CHANGELOG.md");
        fs::create_dir(&path).unwrap();
        let repo = MockRepository::new(dir.path());
        let options = ReleaseOptions {
            dry_run: true,
            ..ReleaseOptions::default()
        };

        let result = run_release_workflow(
            &repo,
            &release("1.0.1"),
            &ChangelogUpdater::default(),
            &options,
        )
        .unwrap();

        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(
            &result.warnings[0],
            BoundaryWarning::ChangelogUnreadable { path: p, .. } if *p == path
        ));
    }

    #[test]
    fn test_unreadable_changelog_cannot_be_overwritten() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("CHANGELOG.md")).unwrap();
        let repo = MockRepository::new(dir.path());

        let err = run_release_workflow(
            &repo,
            &release("1.0.1"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ReleaseError::ChangelogWrite { .. }));
        assert_eq!(repo.commit_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_only_changelog_falls_back_to_default() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(&path, "# Private\n\n## 0.1.0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o200)).unwrap();
        if fs::read(&path).is_ok() {
            // privileged users read regardless of mode
            return;
        }
        let repo = MockRepository::new(dir.path());

        let result = run_release_workflow(
            &repo,
            &release("0.2.0"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap();

        assert!(matches!(
            result.warnings.as_slice(),
            [BoundaryWarning::ChangelogUnreadable { .. }]
        ));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        let changelog = fs::read_to_string(&path).unwrap();
        assert!(changelog.starts_with("# Changelog\n"));
        assert!(changelog.contains("\n## 0.2.0\n\n- Ship it\n\n## 1.0.0\n"));
        assert!(!changelog.contains("# Private"));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let repo = MockRepository::new(dir.path());
        let options = ReleaseOptions {
            dry_run: true,
            ..ReleaseOptions::default()
        };

        let result = run_release_workflow(
            &repo,
            &release("3.0.0"),
            &ChangelogUpdater::default(),
            &options,
        )
        .unwrap();

        assert!(result.dry_run);
        assert!(result.commit.is_none());
        assert!(!dir.path().join("CHANGELOG.md").exists());
        assert!(repo.staged_paths().is_empty());
        assert!(repo.tag("3.0.0").is_none());
    }

    #[test]
    fn test_custom_changelog_location() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let repo = MockRepository::new(dir.path());
        let options = ReleaseOptions {
            changelog_file: PathBuf::from("docs/HISTORY.md"),
            ..ReleaseOptions::default()
        };

        let result = run_release_workflow(
            &repo,
            &release("1.1.0"),
            &ChangelogUpdater::default(),
            &options,
        )
        .unwrap();

        assert_eq!(result.changelog_path, dir.path().join("docs/HISTORY.md"));
        assert!(fs::read_to_string(dir.path().join("docs/HISTORY.md"))
            .unwrap()
            .contains("## 1.1.0"));
        assert_eq!(repo.staged_paths(), vec![PathBuf::from("docs/HISTORY.md")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_changelog_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let repo = MockRepository::new(dir.path());
        run_release_workflow(
            &repo,
            &release("1.0.1"),
            &ChangelogUpdater::default(),
            &ReleaseOptions::default(),
        )
        .unwrap();

        let mode = fs::metadata(dir.path().join("CHANGELOG.md"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
