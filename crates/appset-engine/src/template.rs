//! Template expansion: `{{placeholder}}` substitution into Application templates

use appset_core::{Application, ApplicationTemplate, ParameterSet, render_value};
use serde_json::{Map, Value as JsonValue};

use crate::error::{EngineError, Result};
use crate::suggestions::suggest_parameter;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Why substitution into a template tree stopped
#[derive(Debug, Clone, PartialEq, Eq)]
enum TreeError {
    /// A placeholder that did not resolve, with the field it appeared in
    Unresolved { parameter: String, field: String },
    /// Two keys of one mapping substituted to the same text
    DuplicateKey { key: String, field: String },
}

/// Substitute every `{{name}}` in `input`
///
/// Whitespace inside the braces is ignored. Replacement text is inserted
/// literally and never scanned again. Returns the unresolved name on failure.
pub fn substitute(input: &str, params: &ParameterSet) -> std::result::Result<String, String> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        let name = after_open[..end].trim();
        let value = if name.is_empty() {
            None
        } else {
            params.lookup(name)
        };
        let Some(value) = value else {
            return Err(name.to_string());
        };

        output.push_str(&rest[..start]);
        output.push_str(&render_value(value));
        rest = &after_open[end + CLOSE.len()..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Expand the template once per parameter set, in order
///
/// Any unresolved placeholder fails the whole batch.
pub fn expand(template: &ApplicationTemplate, sets: &[ParameterSet]) -> Result<Vec<Application>> {
    sets.iter()
        .enumerate()
        .map(|(index, params)| {
            let set = index + 1;
            let value = substitute_tree(&template.0, params, "").map_err(|err| match err {
                TreeError::Unresolved { parameter, field } => EngineError::UnresolvedParameter {
                    suggestion: suggest_parameter(&parameter, params),
                    parameter,
                    field,
                    set,
                },
                TreeError::DuplicateKey { key, field } => {
                    EngineError::DuplicateTemplateKey { key, field, set }
                }
            })?;

            Application::from_template(value)
                .map_err(|source| EngineError::InvalidApplication { set, source })
        })
        .collect()
}

/// Substitute into every string value and mapping key of a JSON tree
fn substitute_tree(
    value: &JsonValue,
    params: &ParameterSet,
    path: &str,
) -> std::result::Result<JsonValue, TreeError> {
    match value {
        JsonValue::String(text) => substitute(text, params)
            .map(JsonValue::String)
            .map_err(|parameter| TreeError::Unresolved {
                parameter,
                field: display_path(path),
            }),
        JsonValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| substitute_tree(item, params, &format!("{}[{}]", path, i)))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        JsonValue::Object(fields) => {
            let mut substituted = Map::with_capacity(fields.len());
            for (key, field) in fields {
                let field_path = child_path(path, key);
                let key = substitute(key, params).map_err(|parameter| TreeError::Unresolved {
                    parameter,
                    field: field_path.clone(),
                })?;
                if substituted.contains_key(&key) {
                    return Err(TreeError::DuplicateKey {
                        key,
                        field: display_path(path),
                    });
                }
                let value = substitute_tree(field, params, &field_path)?;
                substituted.insert(key, value);
            }
            Ok(JsonValue::Object(substituted))
        }
        other => Ok(other.clone()),
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<template>".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: JsonValue) -> ParameterSet {
        serde_json::from_value(value).unwrap()
    }

    fn template() -> ApplicationTemplate {
        ApplicationTemplate(json!({
            "metadata": {
                "name": "{{cluster}}-guestbook",
                "labels": {"team-{{team}}": "{{ team }}"}
            },
            "spec": {
                "project": "default",
                "source": {
                    "repoURL": "https://github.com/argoproj/argo-cd.git",
                    "targetRevision": "HEAD",
                    "path": "guestbook/{{cluster}}",
                    "helm": {"valueFiles": ["values-{{env.name}}.yaml"]}
                },
                "destination": {"server": "{{url}}", "namespace": "guestbook"}
            }
        }))
    }

    #[test]
    fn test_substitute() {
        let p = params(json!({"cluster": "a", "replicas": 3, "cfg": {"tier": "gold"}}));

        assert_eq!(substitute("app-{{cluster}}", &p).unwrap(), "app-a");
        assert_eq!(substitute("{{ cluster }}/{{cluster}}", &p).unwrap(), "a/a");
        assert_eq!(substitute("n={{replicas}}", &p).unwrap(), "n=3");
        assert_eq!(substitute("{{cfg.tier}}", &p).unwrap(), "gold");
        assert_eq!(substitute("no placeholders", &p).unwrap(), "no placeholders");
        assert_eq!(substitute("open {{ only", &p).unwrap(), "open {{ only");
        assert_eq!(substitute("{{missing}}", &p).unwrap_err(), "missing");
        assert_eq!(substitute("{{ }}", &p).unwrap_err(), "");
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let p = params(json!({"a": "{{b}}", "b": "nope"}));
        assert_eq!(substitute("{{a}}", &p).unwrap(), "{{b}}");
    }

    #[test]
    fn test_expand_one_application_per_set() {
        let sets = vec![
            params(json!({"cluster": "a", "team": "x", "url": "https://a", "env": {"name": "dev"}})),
            params(json!({"cluster": "b", "team": "y", "url": "https://b", "env": {"name": "prod"}})),
        ];

        let apps = expand(&template(), &sets).unwrap();

        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].name(), "a-guestbook");
        assert_eq!(apps[1].name(), "b-guestbook");
        assert_eq!(apps[0].spec.source.path.as_deref(), Some("guestbook/a"));
        assert_eq!(apps[1].spec.destination.server.as_deref(), Some("https://b"));
        assert_eq!(apps[0].metadata.labels.get("team-x").map(String::as_str), Some("x"));
        assert_eq!(
            apps[1].spec.source.helm.as_ref().unwrap().value_files,
            vec!["values-prod.yaml".to_string()]
        );
    }

    #[test]
    fn test_missing_parameter_fails_whole_batch() {
        let sets = vec![
            params(json!({"cluster": "a", "team": "x", "url": "https://a", "env": {"name": "dev"}})),
            params(json!({"cluster": "b", "team": "y", "env": {"name": "prod"}})),
        ];

        let err = expand(&template(), &sets).unwrap_err();
        match err {
            EngineError::UnresolvedParameter {
                parameter,
                field,
                set,
                ..
            } => {
                assert_eq!(parameter, "url");
                assert_eq!(field, "spec.destination.server");
                assert_eq!(set, 2);
            }
            other => panic!("Expected UnresolvedParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_error_message() {
        let sets = vec![params(json!({"clustr": "a"}))];
        let template = ApplicationTemplate(json!({"metadata": {"name": "{{cluster}}"}}));

        let err = expand(&template, &sets).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"unresolved parameter `cluster` in template field `metadata.name` (parameter set #1)"
        );
        match err {
            EngineError::UnresolvedParameter { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("Did you mean `clustr`?"));
            }
            other => panic!("Expected UnresolvedParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_application_after_substitution() {
        let sets = vec![params(json!({"name": ""}))];
        let template = ApplicationTemplate(json!({
            "metadata": {"name": "{{name}}"},
            "spec": {"source": {"repoURL": "https://example.com"}}
        }));

        let err = expand(&template, &sets).unwrap_err();
        assert!(matches!(err, EngineError::InvalidApplication { set: 1, .. }));
    }

    #[test]
    fn test_keys_substituting_to_same_text_are_rejected() {
        let sets = vec![params(json!({"a": "team", "b": "team"}))];
        let template = ApplicationTemplate(json!({
            "metadata": {
                "name": "guestbook",
                "labels": {"{{a}}": "x", "{{b}}": "y"}
            },
            "spec": {"source": {"repoURL": "https://example.com"}}
        }));

        let err = expand(&template, &sets).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"template field `metadata.labels` has more than one key substituting to `team` (parameter set #1)"
        );
    }

    #[test]
    fn test_no_sets_no_applications() {
        assert!(expand(&template(), &[]).unwrap().is_empty());
    }
}
