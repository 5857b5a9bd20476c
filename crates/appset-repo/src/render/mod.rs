//! Manifest rendering
//!
//! An Application's source is located (local path, Git clone, or Helm
//! repository chart), its type detected the way Argo CD does it (Helm, then
//! Kustomize, then a plain directory), and the resulting manifests parsed
//! into [`Resource`]s.

pub mod directory;
pub mod helm;
pub mod kustomize;
pub mod source;
pub mod tool;

use appset_core::{Application, ApplicationSource, Resource};
use std::path::{Path, PathBuf};

use crate::cache::{ManifestCache, NoopCache, cache_key};
use crate::credentials::{CredentialStore, Credentials};
use crate::error::{RepoError, Result};
use helm::ChartLocation;
use source::Checkout;
use tool::Toolchain;

/// Produces the Kubernetes resources of one Application source
pub trait ManifestRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<Vec<Resource>>;
}

/// Everything needed to render one Application
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub app_name: &'a str,
    pub namespace: &'a str,
    pub source: &'a ApplicationSource,
    pub credentials: Credentials,
    pub pass_credentials_all: bool,
}

impl<'a> RenderRequest<'a> {
    /// Request for an Application, with credentials resolved for its `repoURL`
    pub fn for_application(app: &'a Application, store: &CredentialStore) -> Self {
        let source = &app.spec.source;
        Self {
            app_name: app.name(),
            namespace: app.destination_namespace(),
            source,
            credentials: store.resolve(&source.repo_url),
            pass_credentials_all: store.pass_credentials_all(&source.repo_url),
        }
    }

    fn cache_key(&self) -> String {
        let source = serde_json::to_string(self.source).unwrap_or_default();
        cache_key(&[self.app_name, self.namespace, &source])
    }
}

/// How a source directory is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Helm,
    Kustomize,
    Directory,
}

impl SourceType {
    /// Explicit configuration first, then the directory contents
    pub fn detect(source: &ApplicationSource, dir: &Path) -> Self {
        if source.helm.is_some() {
            Self::Helm
        } else if source.kustomize.is_some() {
            Self::Kustomize
        } else if source.directory.is_some() {
            Self::Directory
        } else if dir.join("Chart.yaml").is_file() {
            Self::Helm
        } else if kustomize::is_kustomization(dir) {
            Self::Kustomize
        } else {
            Self::Directory
        }
    }
}

/// Builder for [`ToolchainRenderer`]
pub struct ToolchainRendererBuilder {
    tools: Toolchain,
    cache: Box<dyn ManifestCache>,
}

impl Default for ToolchainRendererBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolchainRendererBuilder {
    pub fn new() -> Self {
        Self {
            tools: Toolchain::default(),
            cache: Box::new(NoopCache),
        }
    }

    pub fn git(mut self, path: impl Into<PathBuf>) -> Self {
        self.tools.git = path.into();
        self
    }

    pub fn helm(mut self, path: impl Into<PathBuf>) -> Self {
        self.tools.helm = path.into();
        self
    }

    pub fn kustomize(mut self, path: impl Into<PathBuf>) -> Self {
        self.tools.kustomize = path.into();
        self
    }

    pub fn cache(mut self, cache: impl ManifestCache + 'static) -> Self {
        self.cache = Box::new(cache);
        self
    }

    pub fn build(self) -> ToolchainRenderer {
        ToolchainRenderer {
            tools: self.tools,
            cache: self.cache,
        }
    }
}

/// Renders sources with the `git`, `helm` and `kustomize` binaries
pub struct ToolchainRenderer {
    tools: Toolchain,
    cache: Box<dyn ManifestCache>,
}

impl Default for ToolchainRenderer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ToolchainRenderer {
    pub fn builder() -> ToolchainRendererBuilder {
        ToolchainRendererBuilder::new()
    }

    pub fn tools(&self) -> &Toolchain {
        &self.tools
    }

    fn generate(&self, request: &RenderRequest<'_>) -> Result<Vec<Resource>> {
        let source = request.source;

        if let Some(chart) = source.chart.as_deref().filter(|c| !c.is_empty()) {
            let location = ChartLocation::Remote {
                repo_url: source.repo_url.clone(),
                chart: chart.to_string(),
            };
            let output = helm::render(&self.tools, request, &location)?;
            return parse_output(request, &output);
        }

        let checkout = Checkout::fetch(&self.tools, source, &request.credentials)?;
        let dir = checkout.app_dir(source.path.as_deref())?;

        let source_type = SourceType::detect(source, &dir);
        tracing::debug!(app = request.app_name, ?source_type, dir = %dir.display(), "rendering");

        match source_type {
            SourceType::Helm => {
                let output = helm::render(&self.tools, request, &ChartLocation::Local(dir))?;
                parse_output(request, &output)
            }
            SourceType::Kustomize => {
                let output = kustomize::build(&self.tools, &dir, source.kustomize.as_ref())?;
                parse_output(request, &output)
            }
            SourceType::Directory => directory::collect(&dir, source.directory.as_ref()),
        }
    }
}

impl ManifestRenderer for ToolchainRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<Vec<Resource>> {
        let key = request.cache_key();

        if let Some(manifests) = self.cache.get(&key) {
            tracing::debug!(app = request.app_name, "manifest cache hit");
            let mut resources = Vec::new();
            for manifest in &manifests {
                resources.extend(Resource::parse_json(manifest).map_err(|source| {
                    RepoError::InvalidManifests {
                        origin: format!("cache entry {}", key),
                        source,
                    }
                })?);
            }
            return Ok(resources);
        }

        let resources = self.generate(request)?;

        let manifests = resources
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.cache.set(&key, &manifests);

        tracing::debug!(
            app = request.app_name,
            resources = resources.len(),
            "rendered manifests"
        );
        Ok(resources)
    }
}

fn parse_output(request: &RenderRequest<'_>, output: &str) -> Result<Vec<Resource>> {
    Resource::parse_manifests(output).map_err(|source| RepoError::InvalidManifests {
        origin: request.app_name.to_string(),
        source,
    })
}
