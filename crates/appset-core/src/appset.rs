//! ApplicationSet definition and loading

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::params::ParameterSet;

pub const APPLICATION_SET_KIND: &str = "ApplicationSet";

/// An Argo CD ApplicationSet, reduced to what a preview needs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSet {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: ObjectMeta,

    pub spec: ApplicationSetSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSetSpec {
    /// Go text/template rendering mode (not supported offline)
    #[serde(default)]
    pub go_template: bool,

    /// Generators, evaluated in order
    #[serde(default)]
    pub generators: Vec<GeneratorSpec>,

    /// Application skeleton with `{{placeholder}}` expressions
    pub template: ApplicationTemplate,
}

/// A generator definition, tagged the way Argo CD writes it (`list:`, `matrix:`, `merge:`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeneratorSpec {
    List(ListGenerator),
    Matrix(MatrixGenerator),
    Merge(MergeGenerator),
}

impl GeneratorSpec {
    /// Generator type name as written in manifests
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Matrix(_) => "matrix",
            Self::Merge(_) => "merge",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListGenerator {
    #[serde(default)]
    pub elements: Vec<ParameterSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixGenerator {
    pub generators: Vec<GeneratorSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeGenerator {
    #[serde(default)]
    pub merge_keys: Vec<String>,

    pub generators: Vec<GeneratorSpec>,
}

/// Application template kept as an untyped tree so every string can be substituted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationTemplate(pub JsonValue);

impl ApplicationSet {
    /// Load every ApplicationSet document from a manifest file, in file order
    pub fn load_all(path: &Path) -> Result<Vec<Self>> {
        if !path.exists() {
            return Err(CoreError::ManifestNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let sets = Self::from_yaml_documents(&content)?;
        if sets.is_empty() {
            return Err(CoreError::NoApplicationSet {
                path: path.display().to_string(),
            });
        }
        Ok(sets)
    }

    /// Load the first ApplicationSet of a manifest file
    ///
    /// Additional ApplicationSets are reported as a warning and ignored.
    pub fn load_first(path: &Path) -> Result<Self> {
        let mut sets = Self::load_all(path)?;
        if sets.len() > 1 {
            tracing::warn!(
                "found {} ApplicationSets, only previewing the first entry",
                sets.len()
            );
        }
        Ok(sets.swap_remove(0))
    }

    /// Parse a multi-document YAML stream, keeping only ApplicationSet documents
    pub fn from_yaml_documents(content: &str) -> Result<Vec<Self>> {
        let mut sets = Vec::new();

        for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
            let value = JsonValue::deserialize(document)?;
            if value.is_null() {
                continue;
            }

            let kind = value.get("kind").and_then(JsonValue::as_str);
            if kind != Some(APPLICATION_SET_KIND) {
                tracing::debug!(document = index + 1, ?kind, "skipping non-ApplicationSet document");
                continue;
            }

            let set: Self =
                serde_json::from_value(value).map_err(|e| CoreError::InvalidApplicationSet {
                    document: index + 1,
                    message: e.to_string(),
                })?;
            sets.push(set);
        }

        Ok(sets)
    }
}
