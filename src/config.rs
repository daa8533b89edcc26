use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{ChangelogUpdater, CHANGELOG_FILENAME};
use crate::error::{ReleaseError, Result};

/// File name looked up in the repository root
pub const CONFIG_FILENAME: &str = "gitrelease.toml";

/// File name looked up in the user configuration directory
pub const USER_CONFIG_FILENAME: &str = ".gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Every value is optional in the file; missing sections use defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub author: AuthorConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub commit: CommitConfig,
}

/// Fallback identity used when no author flag or environment variable is set.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct AuthorConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Returns the default changelog file name.
fn default_changelog_file() -> PathBuf {
    PathBuf::from(CHANGELOG_FILENAME)
}

/// Where the changelog lives and which document seeds a new one.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    /// Path relative to the repository root
    #[serde(default = "default_changelog_file")]
    pub file: PathBuf,

    /// Optional template file, relative to the repository root
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            file: default_changelog_file(),
            template: None,
        }
    }
}

fn default_commit_all() -> bool {
    true
}

/// Commit behavior.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitConfig {
    /// Also commit modified and deleted tracked files
    #[serde(default = "default_commit_all")]
    pub all: bool,
}

impl Default for CommitConfig {
    fn default() -> Self {
        CommitConfig {
            all: default_commit_all(),
        }
    }
}

impl Config {
    /// Build the changelog updater, reading the template file if one is configured.
    pub fn changelog_updater(&self, repo_root: &Path) -> Result<ChangelogUpdater> {
        match &self.changelog.template {
            Some(template) => {
                let path = repo_root.join(template);
                let document = fs::read_to_string(&path).map_err(|e| {
                    ReleaseError::config(format!(
                        "cannot read changelog template '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(ChangelogUpdater::new(document))
            }
            None => Ok(ChangelogUpdater::default()),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in the repository directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `repo_dir` - Directory the release runs against
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, repo_dir: &Path) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if repo_dir.join(CONFIG_FILENAME).exists() {
        repo_dir.join(CONFIG_FILENAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(USER_CONFIG_FILENAME);
        if user_path.exists() {
            user_path
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");

    let config_str = fs::read_to_string(&path)
        .map_err(|e| ReleaseError::config(format!("cannot read '{}': {}", path.display(), e)))?;
    toml::from_str(&config_str)
        .map_err(|e| ReleaseError::config(format!("cannot parse '{}': {}", path.display(), e)))
}
