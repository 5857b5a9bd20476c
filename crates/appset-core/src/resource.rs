//! Rendered Kubernetes resources

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// An arbitrary Kubernetes object produced by rendering an Application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(pub JsonValue);

impl Resource {
    pub fn kind(&self) -> &str {
        self.0
            .get("kind")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.0
            .pointer("/metadata/name")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
    }

    /// Kind in lowercase, used as the display group
    pub fn lower_kind(&self) -> String {
        self.kind().to_lowercase()
    }

    /// Parse a multi-document YAML (or JSON) manifest stream
    ///
    /// Empty documents are skipped and `List` objects are flattened into
    /// their items.
    pub fn parse_manifests(content: &str) -> Result<Vec<Self>> {
        let mut resources = Vec::new();

        for document in serde_yaml::Deserializer::from_str(content) {
            let value = JsonValue::deserialize(document)?;
            push_document(value, &mut resources)?;
        }

        Ok(resources)
    }

    /// Parse a single JSON document (object or List)
    pub fn parse_json(content: &str) -> Result<Vec<Self>> {
        let value: JsonValue = serde_json::from_str(content)?;
        let mut resources = Vec::new();
        push_document(value, &mut resources)?;
        Ok(resources)
    }
}

fn push_document(value: JsonValue, resources: &mut Vec<Resource>) -> Result<()> {
    match value {
        JsonValue::Null => Ok(()),
        JsonValue::Object(mut map) => {
            let is_list = map
                .get("kind")
                .and_then(JsonValue::as_str)
                .is_some_and(|kind| kind.ends_with("List"))
                && matches!(map.get("items"), Some(JsonValue::Array(_)));

            if is_list {
                if let Some(JsonValue::Array(items)) = map.remove("items") {
                    for item in items {
                        push_document(item, resources)?;
                    }
                }
            } else {
                resources.push(Resource(JsonValue::Object(map)));
            }
            Ok(())
        }
        other => Err(CoreError::InvalidManifest {
            message: format!("expected a mapping, found {}", other),
        }),
    }
}

/// Group resources by lowercase kind, sorted by kind, keeping render order within a kind
pub fn group_by_kind(resources: Vec<Resource>) -> BTreeMap<String, Vec<Resource>> {
    let mut groups: BTreeMap<String, Vec<Resource>> = BTreeMap::new();
    for resource in resources {
        groups.entry(resource.lower_kind()).or_default().push(resource);
    }
    groups
}
