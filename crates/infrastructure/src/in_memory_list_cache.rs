use std::collections::HashMap;

use async_trait::async_trait;
use pharmadex_application::{CacheScope, ListCache};
use pharmadex_core::AppResult;
use serde_json::Value;
use tokio::sync::RwLock;

/// In-memory list cache partitioned by entity type.
#[derive(Default)]
pub struct InMemoryListCache {
    entries: RwLock<HashMap<CacheScope, HashMap<String, Value>>>,
}

impl InMemoryListCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListCache for InMemoryListCache {
    async fn get(&self, scope: CacheScope, key: &str) -> AppResult<Option<Value>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&scope)
            .and_then(|partition| partition.get(key))
            .cloned())
    }

    async fn put(&self, scope: CacheScope, key: String, value: Value) -> AppResult<()> {
        self.entries
            .write()
            .await
            .entry(scope)
            .or_default()
            .insert(key, value);

        Ok(())
    }

    async fn invalidate(&self, scope: CacheScope) -> AppResult<()> {
        self.entries.write().await.remove(&scope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pharmadex_application::{CacheScope, ListCache};
    use serde_json::json;

    use super::InMemoryListCache;

    #[tokio::test]
    async fn invalidate_clears_only_its_partition() {
        let cache = InMemoryListCache::new();

        let stored = cache
            .put(CacheScope::Items, "page=1&size=25".to_owned(), json!({"total_count": 3}))
            .await;
        assert!(stored.is_ok());
        let stored = cache
            .put(
                CacheScope::Customers,
                "page=1&size=25".to_owned(),
                json!({"total_count": 7}),
            )
            .await;
        assert!(stored.is_ok());

        assert!(cache.invalidate(CacheScope::Items).await.is_ok());

        let items = cache.get(CacheScope::Items, "page=1&size=25").await;
        assert!(items.is_ok_and(|value| value.is_none()));

        let customers = cache.get(CacheScope::Customers, "page=1&size=25").await;
        assert!(customers.is_ok_and(|value| value.is_some()));
    }

    #[tokio::test]
    async fn distinct_keys_do_not_collide() {
        let cache = InMemoryListCache::new();

        let stored = cache
            .put(CacheScope::Items, "page=1&size=25".to_owned(), json!(1))
            .await;
        assert!(stored.is_ok());

        let other = cache.get(CacheScope::Items, "page=2&size=25").await;
        assert!(other.is_ok_and(|value| value.is_none()));
    }
}
