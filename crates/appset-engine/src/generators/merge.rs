//! Merge generator: join two child generators on merge keys

use appset_core::{ParameterSet, render_value};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::error::{EngineError, Result};

/// Merge `other` into `base`
///
/// With merge keys, every set of `base` is emitted once, in order; when a set
/// of `other` carries the same values for all merge keys, its fields override
/// the base set. Sets of `other` without a base partner are dropped.
///
/// Without merge keys the result is `base` followed by `other`, unmerged.
pub fn generate(
    merge_keys: &[String],
    base: Vec<ParameterSet>,
    other: Vec<ParameterSet>,
) -> Result<Vec<ParameterSet>> {
    if merge_keys.is_empty() {
        let mut combined = base;
        combined.extend(other);
        return Ok(combined);
    }

    index_by_merge_key(merge_keys, &base, 1)?;
    let partners = index_by_merge_key(merge_keys, &other, 2)?;

    let merged = base
        .into_iter()
        .map(|mut set| {
            let partner = merge_key_of(&set, merge_keys).and_then(|key| partners.get(&key));
            if let Some(partner) = partner {
                let overridden = set.merge_from(partner);
                if !overridden.is_empty() {
                    tracing::debug!(?overridden, "merge generator: overriding base parameters");
                }
            }
            set
        })
        .collect();

    Ok(merged)
}

/// Substituted text of all merge keys, or `None` when one of them is missing
///
/// Keys compare as the text a placeholder would produce, so `80` and `"80"`
/// join.
fn merge_key_of(set: &ParameterSet, merge_keys: &[String]) -> Option<String> {
    let values = merge_keys
        .iter()
        .map(|key| set.lookup(key).map(|value| JsonValue::String(render_value(value))))
        .collect::<Option<Vec<JsonValue>>>()?;
    Some(JsonValue::Array(values).to_string())
}

fn index_by_merge_key<'a>(
    merge_keys: &[String],
    sets: &'a [ParameterSet],
    child: usize,
) -> Result<HashMap<String, &'a ParameterSet>> {
    let mut index = HashMap::with_capacity(sets.len());
    for set in sets {
        let Some(key) = merge_key_of(set, merge_keys) else {
            continue;
        };
        if index.contains_key(&key) {
            return Err(EngineError::DuplicateMergeKey { child, values: key });
        }
        index.insert(key, set);
    }
    Ok(index)
}
