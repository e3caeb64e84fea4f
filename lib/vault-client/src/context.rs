use dashmap::DashMap;

use crate::models::SecretData;

/// Caching and miss-signalling capability owned by the calling engine.
pub trait LookupContext: Send + Sync {
    /// Remember the full result set for this lookup context.
    fn cache_all(&self, data: &SecretData);

    /// Record that the lookup found nothing at this path.
    fn not_found(&self);
}

/// Context for callers that keep no cache of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl LookupContext for NoCache {
    fn cache_all(&self, _data: &SecretData) {}

    fn not_found(&self) {}
}

/// Process-local cache of lookup results, keyed by caller-chosen strings.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, SecretData>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that caches under `key`.
    pub fn scope(&self, key: impl Into<String>) -> CacheScope<'_> {
        CacheScope {
            cache: self,
            key: key.into(),
        }
    }

    pub fn get(&self, key: &str) -> Option<SecretData> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct CacheScope<'a> {
    cache: &'a MemoryCache,
    key: String,
}

impl LookupContext for CacheScope<'_> {
    fn cache_all(&self, data: &SecretData) {
        self.cache.entries.insert(self.key.clone(), data.clone());
    }

    fn not_found(&self) {
        if self.cache.entries.remove(&self.key).is_some() {
            tracing::debug!(key = %self.key, "Evicted cached secret after miss");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cache_all_then_miss() {
        let cache = MemoryCache::new();
        let data: SecretData = [("password".to_string(), json!("hunter2"))].into();

        cache.scope("db").cache_all(&data);
        assert_eq!(cache.get("db"), Some(data));
        assert_eq!(cache.len(), 1);

        cache.scope("db").not_found();
        assert!(cache.get("db").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_no_cache_accepts_both_signals() {
        let context: &dyn LookupContext = &NoCache;
        context.cache_all(&[("k".to_string(), json!("v"))].into());
        context.not_found();
    }

    #[test]
    fn test_scopes_are_independent() {
        let cache = MemoryCache::new();
        cache.scope("a").cache_all(&[("k".to_string(), json!(1))].into());
        cache.scope("b").not_found();
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
    }
}
