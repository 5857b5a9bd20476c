//! Source location: local directories used in place, Git repositories cloned
//! into a temporary directory

use appset_core::ApplicationSource;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;

use super::tool::{self, Toolchain};
use crate::credentials::Credentials;
use crate::error::{RepoError, Result};

/// Where an Application's `repoURL` points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// `file://` URL or an existing local path
    Local(PathBuf),
    /// Anything else, cloned with git
    Git { url: String, revision: String },
}

impl SourceLocation {
    pub fn resolve(source: &ApplicationSource) -> Self {
        let repo_url = source.repo_url.as_str();

        if let Some(path) = repo_url.strip_prefix("file://") {
            return Self::Local(PathBuf::from(path));
        }
        if !repo_url.contains("://") && Path::new(repo_url).is_dir() {
            return Self::Local(PathBuf::from(repo_url));
        }

        Self::Git {
            url: repo_url.to_string(),
            revision: source.revision().unwrap_or("HEAD").to_string(),
        }
    }
}

/// A source tree ready for rendering; a temporary clone is removed on drop
#[derive(Debug)]
pub struct Checkout {
    root: PathBuf,
    _clone: Option<TempDir>,
}

impl Checkout {
    pub fn fetch(
        tools: &Toolchain,
        source: &ApplicationSource,
        credentials: &Credentials,
    ) -> Result<Self> {
        match SourceLocation::resolve(source) {
            SourceLocation::Local(root) => {
                if !root.is_dir() {
                    return Err(RepoError::SourceNotFound { path: root });
                }
                Ok(Self { root, _clone: None })
            }
            SourceLocation::Git { url, revision } => {
                let clone = tempfile::Builder::new()
                    .prefix("argocd-offline-")
                    .tempdir()?;
                let remote = authenticated_url(&url, credentials)?;

                tracing::debug!(repo = %url, %revision, "cloning repository");
                let dir = clone.path();
                let clone_args = [
                    OsStr::new("clone"),
                    OsStr::new("--quiet"),
                    OsStr::new(&remote),
                    dir.as_os_str(),
                ];
                tool::run(&tools.git, &clone_args, None)?;
                tool::run(&tools.git, &["checkout", "--quiet", revision.as_str()], Some(dir))?;

                Ok(Self {
                    root: dir.to_path_buf(),
                    _clone: Some(clone),
                })
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The Application's `path` inside the checkout; it must exist
    pub fn app_dir(&self, path: Option<&str>) -> Result<PathBuf> {
        let dir = match path.map(|p| p.trim_matches('/')) {
            Some(p) if !p.is_empty() && p != "." => self.root.join(p),
            _ => self.root.clone(),
        };

        if !dir.is_dir() {
            return Err(RepoError::SourceNotFound { path: dir });
        }
        Ok(dir)
    }
}

/// Inject credentials as URL userinfo for http(s) remotes
pub fn authenticated_url(url: &str, credentials: &Credentials) -> Result<String> {
    if credentials.is_empty() || !(url.starts_with("https://") || url.starts_with("http://")) {
        return Ok(url.to_string());
    }

    let mut parsed = Url::parse(url).map_err(|e| RepoError::InvalidRepositoryUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let invalid = |_| RepoError::InvalidRepositoryUrl {
        url: url.to_string(),
        reason: "cannot carry credentials".to_string(),
    };
    if !credentials.username.is_empty() {
        parsed.set_username(&credentials.username).map_err(invalid)?;
    }
    if !credentials.password.is_empty() {
        parsed.set_password(Some(&credentials.password)).map_err(invalid)?;
    }

    Ok(parsed.to_string())
}
