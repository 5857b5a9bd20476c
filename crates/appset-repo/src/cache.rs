//! Manifest cache
//!
//! Rendered manifests are keyed by a SHA-256 digest of the render request.
//! Previews always regenerate, so the only implementation shipped here is
//! [`NoopCache`], which accepts every write and never returns a hit.

use sha2::{Digest, Sha256};

/// Storage for rendered manifests (one JSON document per entry)
pub trait ManifestCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<String>>;

    fn set(&self, key: &str, manifests: &[String]);

    fn delete(&self, key: &str);

    fn rename(&self, old_key: &str, new_key: &str);

    /// Register interest in updates of `key`
    fn on_updated(&self, key: &str);

    /// Signal that `key` changed
    fn notify_updated(&self, key: &str);
}

/// Cache that stores nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl ManifestCache for NoopCache {
    fn get(&self, _key: &str) -> Option<Vec<String>> {
        None
    }

    fn set(&self, _key: &str, _manifests: &[String]) {}

    fn delete(&self, _key: &str) {}

    fn rename(&self, _old_key: &str, _new_key: &str) {}

    fn on_updated(&self, _key: &str) {}

    fn notify_updated(&self, _key: &str) {}
}

/// Hex SHA-256 over the given parts, NUL separated
pub fn cache_key(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_cache_never_hits() {
        let cache = NoopCache;
        let manifests = vec![r#"{"kind":"Service"}"#.to_string()];

        cache.set("key", &manifests);
        assert_eq!(cache.get("key"), None);

        cache.rename("key", "other");
        cache.on_updated("other");
        cache.notify_updated("other");
        cache.delete("other");
        assert_eq!(cache.get("other"), None);
    }

    #[test]
    fn test_cache_key() {
        let key = cache_key(&["https://github.com/org/repo.git", "guestbook", "app"]);
        assert_eq!(key.len(), 64);
        assert_eq!(
            key,
            cache_key(&["https://github.com/org/repo.git", "guestbook", "app"])
        );
        assert_ne!(cache_key(&["ab", "c"]), cache_key(&["a", "bc"]));
    }

    #[test]
    fn test_cache_is_object_safe() {
        let cache: Box<dyn ManifestCache> = Box::new(NoopCache);
        assert!(cache.get("anything").is_none());
    }
}
