//! Preview command - render the Kubernetes resources of generated Applications

use appset_engine::Engine;
use appset_repo::{CredentialStore, ManifestRenderer, RenderRequest};
use std::io::Write;
use std::path::Path;

use crate::display::{self, OutputFormat};
use crate::error::{CliError, Result};

/// Every selected Application is rendered before anything is printed
pub fn run(
    engine: &Engine,
    renderer: &dyn ManifestRenderer,
    credentials: &CredentialStore,
    manifest: &Path,
    name: Option<&str>,
    output: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let format: OutputFormat = output.parse()?;

    let apps = super::generate(engine, manifest)?;
    let selected = super::select(&apps, name);

    let mut rendered = Vec::with_capacity(selected.len());
    for app in selected {
        let request = RenderRequest::for_application(app, credentials);
        let resources = renderer
            .render(&request)
            .map_err(|e| CliError::render(app.name(), e))?;
        tracing::debug!(app = app.name(), resources = resources.len(), "rendered Application");
        rendered.push((app.name().to_string(), resources));
    }

    display::write_resources(out, format, rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appset_core::Resource;
    use appset_repo::RepoError;
    use serde_json::json;
    use std::io::Write as _;

    struct StaticRenderer;

    impl ManifestRenderer for StaticRenderer {
        fn render(&self, request: &RenderRequest<'_>) -> appset_repo::Result<Vec<Resource>> {
            if request.app_name == "broken" {
                return Err(RepoError::ToolNotFound {
                    tool: "helm".to_string(),
                });
            }
            Ok(vec![Resource(json!({
                "apiVersion": "v1",
                "kind": "Namespace",
                "metadata": {"name": request.namespace}
            }))])
        }
    }

    fn manifest(clusters: &[&str]) -> tempfile::NamedTempFile {
        let elements: String = clusters
            .iter()
            .map(|c| format!("          - cluster: {}\n", c))
            .collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "apiVersion: argoproj.io/v1alpha1
kind: ApplicationSet
metadata:
  name: clusters
spec:
  generators:
    - list:
        elements:
{}  template:
    metadata:
      name: '{{{{cluster}}}}'
    spec:
      project: default
      source:
        repoURL: https://github.com/org/repo.git
        path: apps
      destination:
        server: https://kubernetes.default.svc
        namespace: 'ns-{{{{cluster}}}}'
",
            elements
        )
        .unwrap();
        file
    }

    fn preview(clusters: &[&str], name: Option<&str>) -> Result<String> {
        let file = manifest(clusters);
        let mut out = Vec::new();
        run(
            &Engine::default(),
            &StaticRenderer,
            &CredentialStore::default(),
            file.path(),
            name,
            "name",
            &mut out,
        )?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_renders_each_selected_application() {
        let output = preview(&["dev", "prod"], None).unwrap();
        insta::assert_snapshot!(output, @r"
        namespace/ns-dev

        namespace/ns-prod
        ");

        let output = preview(&["dev", "prod"], Some("prod")).unwrap();
        assert_eq!(output, "namespace/ns-prod\n");
    }

    #[test]
    fn test_render_failure_prints_nothing() {
        let file = manifest(&["dev", "broken"]);
        let mut out = Vec::new();

        let err = run(
            &Engine::default(),
            &StaticRenderer,
            &CredentialStore::default(),
            file.path(),
            None,
            "name",
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Render { ref app, .. } if app == "broken"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_output_format_checked_first() {
        let mut out = Vec::new();
        let err = run(
            &Engine::default(),
            &StaticRenderer,
            &CredentialStore::default(),
            Path::new("does-not-exist.yaml"),
            None,
            "foo",
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(err, CliError::UnknownOutputFormat { .. }));
    }
}
