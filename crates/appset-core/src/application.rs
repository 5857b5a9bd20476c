//! Concrete Argo CD Application objects

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};
use crate::params::render_value;

pub const APPLICATION_API_VERSION: &str = "argoproj.io/v1alpha1";
pub const APPLICATION_KIND: &str = "Application";

/// A fully substituted Application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    pub metadata: ApplicationMeta,

    pub spec: ApplicationSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationMeta {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSpec {
    #[serde(default)]
    pub project: String,

    pub source: ApplicationSource,

    #[serde(default)]
    pub destination: ApplicationDestination,

    /// Fields a preview does not interpret (syncPolicy, ignoreDifferences, ...)
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSource {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_revision: Option<String>,

    /// Helm chart name, for sources pointing at a Helm repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm: Option<HelmSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kustomize: Option<KustomizeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<DirectorySource>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ApplicationSource {
    /// Target revision, with empty strings treated as unset
    pub fn revision(&self) -> Option<&str> {
        self.target_revision.as_deref().filter(|r| !r.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_files: Vec<String>,

    /// Inline values as a YAML string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,

    /// Inline values as a structured object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_object: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<HelmParameter>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_crds: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub pass_credentials: bool,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmParameter {
    pub name: String,

    #[serde(default, deserialize_with = "scalar_string")]
    pub value: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub force_string: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KustomizeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub common_labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub common_annotations: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl KustomizeSource {
    /// Whether any option requires an overlay on top of the source kustomization
    pub fn has_overrides(&self) -> bool {
        self.name_prefix.as_deref().is_some_and(|s| !s.is_empty())
            || self.name_suffix.as_deref().is_some_and(|s| !s.is_empty())
            || self.namespace.as_deref().is_some_and(|s| !s.is_empty())
            || !self.images.is_empty()
            || !self.common_labels.is_empty()
            || !self.common_annotations.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorySource {
    #[serde(default, skip_serializing_if = "is_false")]
    pub recurse: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDestination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Application {
    /// Build an Application from a substituted template tree
    ///
    /// `apiVersion` and `kind` are always set; a missing name is an error.
    pub fn from_template(value: JsonValue) -> Result<Self> {
        let mut app: Self =
            serde_json::from_value(value).map_err(|e| CoreError::InvalidApplication {
                message: e.to_string(),
            })?;

        if app.metadata.name.trim().is_empty() {
            return Err(CoreError::InvalidApplication {
                message: "metadata.name is empty".to_string(),
            });
        }

        app.api_version = APPLICATION_API_VERSION.to_string();
        app.kind = APPLICATION_KIND.to_string();
        Ok(app)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Namespace the Application deploys into
    pub fn destination_namespace(&self) -> &str {
        self.spec.destination.namespace.as_deref().unwrap_or_default()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let value = JsonValue::deserialize(deserializer)?;
    Ok(render_value(&value))
}
