//! Parameter sets produced by generators

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One bundle of substitution values for a single template instantiation
///
/// Keys are unique. Insertion order is kept so that output stays stable,
/// but it carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(IndexMap<String, JsonValue>);

impl ParameterSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a parameter, replacing any previous value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a top-level parameter by exact key
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Iterate over parameter names
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve a placeholder name against this set
    ///
    /// An exact key wins (`path.basename` may be a literal key). Otherwise the
    /// name is split on `.` and walked through the structure of the value,
    /// longest matching key prefix first. Numeric segments index into arrays.
    pub fn lookup(&self, name: &str) -> Option<&JsonValue> {
        if let Some(value) = self.0.get(name) {
            return Some(value);
        }

        let segments: Vec<&str> = name.split('.').collect();
        for split in (1..segments.len()).rev() {
            let key = segments[..split].join(".");
            if let Some(root) = self.0.get(&key) {
                if let Some(value) = walk(root, &segments[split..]) {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Merge another set into this one, `other` winning on shared keys
    ///
    /// Returns the keys that were present in both sets with different values.
    pub fn merge_from(&mut self, other: &ParameterSet) -> Vec<String> {
        let mut collisions = Vec::new();
        for (key, value) in &other.0 {
            if let Some(previous) = self.0.insert(key.clone(), value.clone()) {
                if &previous != value {
                    collisions.push(key.clone());
                }
            }
        }
        collisions
    }

    /// Get the inner map
    pub fn inner(&self) -> &IndexMap<String, JsonValue> {
        &self.0
    }
}

impl FromIterator<(String, JsonValue)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn walk<'a>(root: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    path.iter().try_fold(root, |current, segment| match current {
        JsonValue::Object(map) => map.get(*segment),
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Text used when a parameter value is substituted into a template
///
/// Strings are inserted verbatim, `null` becomes the empty string, and
/// everything else uses its compact JSON form.
pub fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
