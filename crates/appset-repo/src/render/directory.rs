//! Plain manifest directories

use appset_core::{DirectorySource, Resource};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

use crate::error::{RepoError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Read every manifest file under `dir`
///
/// Files are visited in path order. Subdirectories are only entered when
/// `recurse` is set; hidden entries are skipped.
pub fn collect(dir: &Path, options: Option<&DirectorySource>) -> Result<Vec<Resource>> {
    let default_options = DirectorySource::default();
    let options = options.unwrap_or(&default_options);

    let include = compile(options.include.as_deref())?;
    let exclude = compile(options.exclude.as_deref())?;

    let mut resources = Vec::new();
    for path in manifest_files(dir, options.recurse)? {
        let relative = path
            .strip_prefix(dir)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        if !include.is_empty() && !matches_any(&include, &relative) {
            continue;
        }
        if matches_any(&exclude, &relative) {
            continue;
        }

        let content = std::fs::read_to_string(&path)?;
        let parsed = if path.extension().is_some_and(|ext| ext == "json") {
            Resource::parse_json(&content)
        } else {
            Resource::parse_manifests(&content)
        };
        let parsed = parsed.map_err(|source| RepoError::InvalidManifests {
            origin: relative.clone(),
            source,
        })?;

        tracing::debug!(file = %relative, resources = parsed.len(), "read manifest file");
        resources.extend(parsed);
    }

    Ok(resources)
}

/// Manifest files below `dir`, following symlinks
///
/// Any entry that cannot be read fails the whole walk.
fn manifest_files(dir: &Path, recurse: bool) -> Result<Vec<PathBuf>> {
    let max_depth = if recurse { usize::MAX } else { 1 };

    let walker = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| RepoError::SourceUnreadable {
            path: source.path().unwrap_or(dir).to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_manifest(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn is_manifest(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        let ext = ext.to_string_lossy().to_lowercase();
        matches!(ext.as_str(), "yaml" | "yml" | "json")
    })
}

fn compile(pattern: Option<&str>) -> Result<Vec<Pattern>> {
    let Some(pattern) = pattern.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(Vec::new());
    };

    expand_braces(pattern)
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| RepoError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

fn matches_any(patterns: &[Pattern], path: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
}

/// Expand `{a,b}` alternations into plain glob patterns
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];

    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| {
            let alternative = &pattern[w[0] + 1..w[1]];
            expand_braces(&format!("{}{}{}", prefix, alternative, suffix))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, path: &str, kind: &str, name: &str) {
        let file = dir.join(path);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(
            file,
            format!("apiVersion: v1\nkind: {}\nmetadata:\n  name: {}\n", kind, name),
        )
        .unwrap();
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "service.yaml", "Service", "web");
        write(dir.path(), "deployment.yml", "Deployment", "web");
        write(dir.path(), "nested/config.yaml", "ConfigMap", "nested");
        write(dir.path(), ".hidden/secret.yaml", "Secret", "hidden");
        std::fs::write(
            dir.path().join("extra.json"),
            r#"{"apiVersion": "v1", "kind": "ConfigMap", "metadata": {"name": "extra"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("README.md"), "# not a manifest\n").unwrap();
        dir
    }

    fn names(resources: &[Resource]) -> Vec<&str> {
        resources.iter().map(Resource::name).collect()
    }

    #[test]
    fn test_top_level_only_by_default() {
        let dir = tree();
        let resources = collect(dir.path(), None).unwrap();
        assert_eq!(names(&resources), vec!["web", "extra", "web"]);
        assert_eq!(resources[0].kind(), "Deployment");
    }

    #[test]
    fn test_recurse() {
        let dir = tree();
        let options = DirectorySource {
            recurse: true,
            ..Default::default()
        };
        let resources = collect(dir.path(), Some(&options)).unwrap();
        assert_eq!(names(&resources), vec!["web", "extra", "nested", "web"]);
    }

    #[test]
    fn test_include_and_exclude() {
        let dir = tree();
        let options = DirectorySource {
            recurse: true,
            include: Some("{*.yaml,nested/*}".to_string()),
            exclude: Some("service.yaml".to_string()),
            ..Default::default()
        };
        let resources = collect(dir.path(), Some(&options)).unwrap();
        assert_eq!(names(&resources), vec!["nested"]);
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let dir = tree();
        let options = DirectorySource {
            recurse: true,
            include: Some("*.yaml".to_string()),
            ..Default::default()
        };
        let resources = collect(dir.path(), Some(&options)).unwrap();
        assert_eq!(names(&resources), vec!["web"]);
    }

    #[test]
    fn test_invalid_manifest_names_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.yaml"), "- just\n- a list\n").unwrap();

        let err = collect(dir.path(), None).unwrap_err();
        match err {
            RepoError::InvalidManifests { origin, .. } => assert_eq!(origin, "bad.yaml"),
            other => panic!("Expected InvalidManifests, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_manifest_is_read() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "common/service.yaml", "Service", "shared");
        write(dir.path(), "app/configmap.yaml", "ConfigMap", "local");
        std::os::unix::fs::symlink("../common/service.yaml", dir.path().join("app/service.yaml"))
            .unwrap();

        let resources = collect(&dir.path().join("app"), None).unwrap();
        assert_eq!(names(&resources), vec!["local", "shared"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_error_is_reported() {
        let dir = tree();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("nested/loop")).unwrap();
        let options = DirectorySource {
            recurse: true,
            ..Default::default()
        };

        let err = collect(dir.path(), Some(&options)).unwrap_err();
        assert!(matches!(err, RepoError::SourceUnreadable { .. }));
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("*.yaml"), vec!["*.yaml"]);
        assert_eq!(
            expand_braces("{config.json,env-usw2/*}"),
            vec!["config.json", "env-usw2/*"]
        );
        assert_eq!(
            expand_braces("app-{a,b}/{x,y}.yaml"),
            vec!["app-a/x.yaml", "app-a/y.yaml", "app-b/x.yaml", "app-b/y.yaml"]
        );
        assert_eq!(expand_braces("{a,{b,c}}"), vec!["a", "b", "c"]);
        assert_eq!(expand_braces("unclosed{a,b"), vec!["unclosed{a,b"]);
    }
}
