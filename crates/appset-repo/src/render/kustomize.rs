//! `kustomize build`, with Application-level options applied through a
//! generated overlay so the source tree is never modified

use appset_core::KustomizeSource;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;

use super::tool::{self, Toolchain};
use crate::error::Result;

const KUSTOMIZATION_FILES: [&str; 3] = ["kustomization.yaml", "kustomization.yml", "Kustomization"];

/// Whether `dir` holds a kustomization
pub fn is_kustomization(dir: &Path) -> bool {
    KUSTOMIZATION_FILES
        .iter()
        .any(|name| dir.join(name).is_file())
}

/// Build `dir`, through an overlay when `options` carry overrides
pub fn build(tools: &Toolchain, dir: &Path, options: Option<&KustomizeSource>) -> Result<String> {
    let Some(options) = options.filter(|o| o.has_overrides()) else {
        return tool::run(&tools.kustomize, &[OsStr::new("build"), dir.as_os_str()], None);
    };

    let overlay_dir = tempfile::Builder::new()
        .prefix("kustomize-overlay-")
        .tempdir()?;
    let source = std::fs::canonicalize(dir)?;
    std::fs::write(
        overlay_dir.path().join("kustomization.yaml"),
        overlay(&source, options)?,
    )?;

    tracing::debug!(source = %source.display(), "building kustomize overlay");
    tool::run(
        &tools.kustomize,
        &[OsStr::new("build"), overlay_dir.path().as_os_str()],
        None,
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Overlay<'a> {
    api_version: &'static str,
    kind: &'static str,
    resources: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    name_prefix: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    name_suffix: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<ImageOverride>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    common_labels: &'a BTreeMap<String, String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    common_annotations: &'a BTreeMap<String, String>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageOverride {
    name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    new_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    new_tag: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    digest: Option<String>,
}

/// Overlay kustomization referencing `source`
fn overlay(source: &Path, options: &KustomizeSource) -> Result<String> {
    let overlay = Overlay {
        api_version: "kustomize.config.k8s.io/v1beta1",
        kind: "Kustomization",
        resources: vec![source.display().to_string()],
        name_prefix: non_empty(&options.name_prefix),
        name_suffix: non_empty(&options.name_suffix),
        namespace: non_empty(&options.namespace),
        images: options.images.iter().map(String::as_str).map(parse_image).collect(),
        common_labels: &options.common_labels,
        common_annotations: &options.common_annotations,
    };
    Ok(serde_yaml::to_string(&overlay)?)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parse an image override: `name[=new-name][:tag|@digest]`
fn parse_image(spec: &str) -> ImageOverride {
    let (name, replacement) = match spec.split_once('=') {
        Some((name, replacement)) => (name.to_string(), Some(replacement)),
        None => (String::new(), None),
    };
    let image = replacement.unwrap_or(spec);

    let (image, digest) = match image.split_once('@') {
        Some((image, digest)) => (image, Some(digest.to_string())),
        None => (image, None),
    };

    // A colon after the last slash separates the tag; earlier ones are registry ports
    let tag_start = image
        .rfind(':')
        .filter(|&colon| image.rfind('/').is_none_or(|slash| colon > slash));
    let (image, tag) = match tag_start {
        Some(colon) => (&image[..colon], Some(image[colon + 1..].to_string())),
        None => (image, None),
    };

    if name.is_empty() {
        ImageOverride {
            name: image.to_string(),
            new_tag: tag,
            digest,
            ..Default::default()
        }
    } else {
        ImageOverride {
            new_name: (image != name).then(|| image.to_string()),
            name,
            new_tag: tag,
            digest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value as JsonValue, json};

    #[test]
    fn test_is_kustomization() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_kustomization(dir.path()));

        std::fs::write(dir.path().join("kustomization.yml"), "resources: []\n").unwrap();
        assert!(is_kustomization(dir.path()));
    }

    #[test]
    fn test_overlay() {
        let options = KustomizeSource {
            name_prefix: Some("dev-".to_string()),
            name_suffix: Some(String::new()),
            namespace: Some("guestbook".to_string()),
            images: vec!["nginx:1.25".to_string()],
            common_labels: [("env".to_string(), "dev".to_string())].into(),
            ..Default::default()
        };

        let yaml = overlay(Path::new("/src/guestbook"), &options).unwrap();
        let parsed: JsonValue = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(
            parsed,
            json!({
                "apiVersion": "kustomize.config.k8s.io/v1beta1",
                "kind": "Kustomization",
                "resources": ["/src/guestbook"],
                "namePrefix": "dev-",
                "namespace": "guestbook",
                "images": [{"name": "nginx", "newTag": "1.25"}],
                "commonLabels": {"env": "dev"}
            })
        );
    }

    #[test]
    fn test_parse_image() {
        assert_eq!(
            parse_image("registry:5000/team/app"),
            ImageOverride {
                name: "registry:5000/team/app".to_string(),
                ..Default::default()
            }
        );
        assert_eq!(
            parse_image("app=registry.example.com/app:v2"),
            ImageOverride {
                name: "app".to_string(),
                new_name: Some("registry.example.com/app".to_string()),
                new_tag: Some("v2".to_string()),
                digest: None,
            }
        );
        assert_eq!(
            parse_image("nginx@sha256:abc"),
            ImageOverride {
                name: "nginx".to_string(),
                digest: Some("sha256:abc".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(parse_image("nginx=nginx:1.0").new_name, None);
    }
}
