//! `helm template` rendering for local charts and repository charts

use appset_core::HelmSource;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::RenderRequest;
use super::tool::{self, Toolchain};
use crate::error::Result;

/// Where the chart comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartLocation {
    /// Chart directory inside a checkout
    Local(PathBuf),
    /// `chart` from a Helm (or OCI) repository at `repoURL`
    Remote { repo_url: String, chart: String },
}

impl ChartLocation {
    /// Chart argument for `helm template`
    fn reference(&self) -> String {
        match self {
            ChartLocation::Local(dir) => dir.display().to_string(),
            ChartLocation::Remote { repo_url, chart } if is_oci(repo_url) => {
                format!("{}/{}", repo_url.trim_end_matches('/'), chart)
            }
            ChartLocation::Remote { chart, .. } => chart.clone(),
        }
    }
}

fn is_oci(repo_url: &str) -> bool {
    repo_url.starts_with("oci://")
}

/// Render a chart with `helm template`
pub fn render(tools: &Toolchain, request: &RenderRequest<'_>, chart: &ChartLocation) -> Result<String> {
    let helm = request.source.helm.as_ref();

    let values = match helm {
        Some(helm) => inline_values(helm)?,
        None => None,
    };
    let inline = match values {
        Some(values) => {
            let mut file = tempfile::Builder::new()
                .prefix("values-")
                .suffix(".yaml")
                .tempfile()?;
            file.write_all(values.as_bytes())?;
            file.flush()?;
            Some(file)
        }
        None => None,
    };

    let args = template_args(request, chart, inline.as_ref().map(|f| f.path()));
    tool::run(&tools.helm, &args, None)
}

/// Inline values, `valuesObject` taking precedence over `values`
fn inline_values(helm: &HelmSource) -> Result<Option<String>> {
    if let Some(object) = helm.values_object.as_ref().filter(|v| !v.is_null()) {
        return Ok(Some(serde_yaml::to_string(object)?));
    }
    Ok(helm
        .values
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string))
}

/// Arguments for `helm template`
pub fn template_args(
    request: &RenderRequest<'_>,
    chart: &ChartLocation,
    inline_values: Option<&Path>,
) -> Vec<String> {
    let default_helm = HelmSource::default();
    let helm = request.source.helm.as_ref().unwrap_or(&default_helm);

    let release_name = helm
        .release_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(request.app_name);

    let mut args = vec![
        "template".to_string(),
        release_name.to_string(),
        chart.reference(),
    ];

    if !request.namespace.is_empty() {
        args.push("--namespace".to_string());
        args.push(request.namespace.to_string());
    }
    if !helm.skip_crds {
        args.push("--include-crds".to_string());
    }

    for file in &helm.value_files {
        args.push("--values".to_string());
        args.push(resolve_value_file(chart, file));
    }
    if let Some(path) = inline_values {
        args.push("--values".to_string());
        args.push(path.display().to_string());
    }

    for parameter in &helm.parameters {
        let flag = if parameter.force_string {
            "--set-string"
        } else {
            "--set"
        };
        args.push(flag.to_string());
        args.push(format!("{}={}", parameter.name, parameter.value));
    }

    if let ChartLocation::Remote { repo_url, .. } = chart {
        if !is_oci(repo_url) {
            args.push("--repo".to_string());
            args.push(repo_url.clone());
        }
        if let Some(version) = request.source.revision() {
            args.push("--version".to_string());
            args.push(version.to_string());
        }

        let credentials = &request.credentials;
        if !credentials.username.is_empty() {
            args.push("--username".to_string());
            args.push(credentials.username.clone());
        }
        if !credentials.password.is_empty() {
            args.push("--password".to_string());
            args.push(credentials.password.clone());
        }
        if helm.pass_credentials || request.pass_credentials_all {
            args.push("--pass-credentials".to_string());
        }
    }

    args
}

/// Value files are relative to a local chart; remote files and URLs are passed through
fn resolve_value_file(chart: &ChartLocation, file: &str) -> String {
    match chart {
        ChartLocation::Local(dir) if !file.contains("://") && !Path::new(file).is_absolute() => {
            dir.join(file).display().to_string()
        }
        _ => file.to_string(),
    }
}
