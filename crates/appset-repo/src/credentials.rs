//! Repository credential resolution
//!
//! Username and password are resolved independently, each with the same
//! precedence:
//! 1. `HELM_REPO_USERNAME` / `HELM_REPO_PASSWORD`, when set to a non-blank value
//! 2. the first Helm `repositories.yaml` entry whose URL matches
//! 3. empty string

use std::path::Path;

use crate::config::RepositoryFile;

/// Environment variable overriding the repository username
pub const USERNAME_ENV: &str = "HELM_REPO_USERNAME";

/// Environment variable overriding the repository password
pub const PASSWORD_ENV: &str = "HELM_REPO_PASSWORD";

/// Resolved credentials for one repository URL; empty strings mean "none"
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both username and password are empty
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// Process-level credential overrides, read once at startup
#[derive(Clone, Default)]
pub struct CredentialOverrides {
    username: Option<String>,
    password: Option<String>,
}

impl CredentialOverrides {
    /// Read `HELM_REPO_USERNAME` and `HELM_REPO_PASSWORD`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build overrides from an arbitrary variable lookup
    ///
    /// A value only counts when it is non-empty after trimming; the value
    /// itself is kept as is.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            username: non_blank(USERNAME_ENV),
            password: non_blank(PASSWORD_ENV),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl std::fmt::Debug for CredentialOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialOverrides")
            .field("username", &self.username)
            .field("password", &self.password.as_deref().map(redact))
            .finish()
    }
}

/// Credentials known to the process: overrides plus the Helm repository file
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    repositories: RepositoryFile,
    overrides: CredentialOverrides,
}

impl CredentialStore {
    pub fn new(repositories: RepositoryFile, overrides: CredentialOverrides) -> Self {
        Self {
            repositories,
            overrides,
        }
    }

    /// Load the Helm repository file at `path`
    ///
    /// A missing or unreadable file only logs a warning; file-based lookups
    /// then resolve to empty strings.
    pub fn load(path: &Path, overrides: CredentialOverrides) -> Self {
        let repositories = match RepositoryFile::load_from(path) {
            Ok(file) => {
                tracing::debug!(
                    path = %path.display(),
                    repositories = file.repositories.len(),
                    "loaded helm repository config"
                );
                file
            }
            Err(e) => {
                tracing::warn!(
                    "could not read helm local repository config {}: {}",
                    path.display(),
                    e
                );
                RepositoryFile::default()
            }
        };
        Self::new(repositories, overrides)
    }

    pub fn repositories(&self) -> &RepositoryFile {
        &self.repositories
    }

    /// Resolve credentials for a repository URL
    pub fn resolve(&self, url: &str) -> Credentials {
        let entry = self.repositories.find(url);

        let username = match self.overrides.username() {
            Some(username) => username.to_string(),
            None => entry.map(|e| e.username.clone()).unwrap_or_default(),
        };
        let password = match self.overrides.password() {
            Some(password) => password.to_string(),
            None => entry.map(|e| e.password.clone()).unwrap_or_default(),
        };

        Credentials { username, password }
    }

    /// Whether credentials should also be sent to hosts other than the repository's
    pub fn pass_credentials_all(&self, url: &str) -> bool {
        self.repositories
            .find(url)
            .is_some_and(|entry| entry.pass_credentials_all)
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "<redacted>" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn fixture() -> PathBuf {
        PathBuf::from(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../fixtures/repositories.yaml"
        ))
    }

    fn overrides(vars: &[(&str, &str)]) -> CredentialOverrides {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CredentialOverrides::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_credentials_from_env() {
        let store = CredentialStore::load(
            &fixture(),
            overrides(&[(USERNAME_ENV, "myUsername"), (PASSWORD_ENV, "myPassword")]),
        );

        for url in ["https://dummy", "https://unknown"] {
            let creds = store.resolve(url);
            assert_eq!(creds.username, "myUsername");
            assert_eq!(creds.password, "myPassword");
        }
    }

    #[test]
    fn test_credentials_from_helm_config() {
        let store = CredentialStore::load(&fixture(), CredentialOverrides::default());

        assert_eq!(
            store.resolve("https://dummy"),
            Credentials::new("helmUsername", "helmPassword")
        );
        assert_eq!(
            store.resolve("https://dummy/"),
            Credentials::new("helmUsername", "helmPassword")
        );
        assert!(store.resolve("https://no.defined.in.repositories").is_empty());
    }

    #[test]
    fn test_credentials_none() {
        let store = CredentialStore::load(
            Path::new("no/repositories.yaml"),
            CredentialOverrides::default(),
        );

        assert!(store.repositories().repositories.is_empty());
        assert!(store.resolve("https://dummy").is_empty());
    }

    #[test]
    fn test_username_and_password_resolve_independently() {
        let store = CredentialStore::load(&fixture(), overrides(&[(PASSWORD_ENV, "fromEnv")]));

        let creds = store.resolve("https://dummy");
        assert_eq!(creds.username, "helmUsername");
        assert_eq!(creds.password, "fromEnv");
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let o = overrides(&[(USERNAME_ENV, "   "), (PASSWORD_ENV, "")]);
        assert_eq!(o.username(), None);
        assert_eq!(o.password(), None);

        let o = overrides(&[(USERNAME_ENV, " padded ")]);
        assert_eq!(o.username(), Some(" padded "));
    }

    #[test]
    fn test_debug_never_prints_password() {
        let creds = Credentials::new("user", "s3cret");
        assert!(!format!("{:?}", creds).contains("s3cret"));

        let o = overrides(&[(PASSWORD_ENV, "s3cret")]);
        assert!(!format!("{:?}", o).contains("s3cret"));
    }
}
