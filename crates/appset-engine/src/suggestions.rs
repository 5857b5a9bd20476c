//! Fuzzy matching suggestions for unresolved template parameters
//!
//! Uses Levenshtein distance to point at the parameter the user most likely
//! meant when a placeholder does not resolve.

use appset_core::ParameterSet;
use serde_json::Value as JsonValue;

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Parameter names a placeholder could refer to
///
/// Top-level keys, plus one level of nested fields for structured values
/// (`cluster.name`).
pub fn available_parameters(params: &ParameterSet) -> Vec<String> {
    let mut names = Vec::new();
    for (key, value) in params.inner() {
        names.push(key.clone());
        if let JsonValue::Object(fields) = value {
            names.extend(fields.keys().map(|field| format!("{}.{}", key, field)));
        }
    }
    names
}

/// Find closest matches from a list of candidates, best first
pub fn find_closest_matches(input: &str, candidates: &[String], max_results: usize) -> Vec<String> {
    let mut matches: Vec<(usize, &String)> = candidates
        .iter()
        .filter_map(|candidate| {
            let distance = strsim::levenshtein(input, candidate);
            (distance > 0 && distance <= MAX_SUGGESTION_DISTANCE).then_some((distance, candidate))
        })
        .collect();

    matches.sort_by_key(|(distance, _)| *distance);
    matches.truncate(max_results);
    matches.into_iter().map(|(_, name)| name.clone()).collect()
}

/// Suggest corrections for an unresolved parameter
pub fn suggest_parameter(parameter: &str, params: &ParameterSet) -> Option<String> {
    let available = available_parameters(params);

    if parameter.is_empty() {
        return Some(empty_placeholder_help(&available));
    }

    let matches = find_closest_matches(parameter, &available, 3);
    if !matches.is_empty() {
        let quoted: Vec<String> = matches.iter().map(|m| format!("`{}`", m)).collect();
        return Some(format!("Did you mean {}?", quoted.join(" or ")));
    }

    if available.is_empty() {
        Some("The generator produced no parameters for this set".to_string())
    } else {
        Some(format!("Available parameters: {}", available.join(", ")))
    }
}

fn empty_placeholder_help(available: &[String]) -> String {
    if available.is_empty() {
        "Empty placeholder `{{}}`".to_string()
    } else {
        format!(
            "Empty placeholder `{{{{}}}}`; available parameters: {}",
            available.join(", ")
        )
    }
}
