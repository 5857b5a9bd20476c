//! Appset Repo - everything an offline preview needs to reach a source
//!
//! - **Credentials**: Helm `repositories.yaml` entries plus
//!   `HELM_REPO_USERNAME` / `HELM_REPO_PASSWORD` overrides
//! - **Rendering**: Helm charts, Kustomize overlays and plain manifest
//!   directories, through the `helm`, `kustomize` and `git` binaries
//! - **Cache**: the manifest cache seam, with a no-op implementation
//!
//! ## Example
//!
//! ```rust,no_run
//! use appset_repo::{
//!     CredentialOverrides, CredentialStore, ManifestRenderer, RenderRequest, ToolchainRenderer,
//! };
//! # use appset_core::Application;
//! # fn example(app: &Application) -> appset_repo::Result<()> {
//! let path = appset_repo::RepositoryFile::default_path()?;
//! let store = CredentialStore::load(&path, CredentialOverrides::from_env());
//!
//! let renderer = ToolchainRenderer::builder().build();
//! let request = RenderRequest::for_application(app, &store);
//! let resources = renderer.render(&request)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod config;
pub mod credentials;
pub mod cache;
pub mod render;

pub use error::{RepoError, Result};
pub use config::{RepositoryEntry, RepositoryFile};
pub use credentials::{CredentialOverrides, CredentialStore, Credentials};
pub use cache::{ManifestCache, NoopCache, cache_key};
pub use render::{ManifestRenderer, RenderRequest, ToolchainRenderer, ToolchainRendererBuilder};
