//! Helm repository configuration
//!
//! Reads the `repositories.yaml` file maintained by `helm repo add`. Only the
//! fields needed to authenticate against a repository are kept.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RepoError, Result};

/// Helm `repositories.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryFile {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
}

/// One configured repository
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RepositoryEntry {
    #[serde(default)]
    pub name: String,

    pub url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub pass_credentials_all: bool,
}

impl std::fmt::Debug for RepositoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryEntry")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RepositoryFile {
    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: Option<Self> = serde_yaml::from_str(&content)?;
        Ok(file.unwrap_or_default())
    }

    /// Helm's default location
    ///
    /// `$XDG_CONFIG_HOME/helm/repositories.yaml` when set, otherwise the
    /// per-OS directory Helm uses: `~/.config/helm` on Linux,
    /// `~/Library/Preferences/helm` on macOS, `%APPDATA%\helm` on Windows.
    pub fn default_path() -> Result<PathBuf> {
        let helm_dir = helm_config_dir(std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from))
            .ok_or_else(|| RepoError::InvalidConfig {
                message: "Could not determine config directory".to_string(),
            })?;
        Ok(helm_dir.join("repositories.yaml"))
    }

    /// First entry whose URL matches, ignoring one trailing slash on either side
    pub fn find(&self, url: &str) -> Option<&RepositoryEntry> {
        let url = trim_trailing_slash(url);
        self.repositories
            .iter()
            .find(|entry| trim_trailing_slash(&entry.url) == url)
    }
}

fn helm_config_dir(xdg_config_home: Option<PathBuf>) -> Option<PathBuf> {
    xdg_config_home
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(dirs::preference_dir)
        .map(|dir| dir.join("helm"))
}

fn trim_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
