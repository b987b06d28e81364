use async_trait::async_trait;
use pharmadex_core::{AppError, AppResult};
use pharmadex_domain::Page;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Cache partition per entity type.
///
/// Every mutation for an entity type invalidates its whole partition, so
/// the next list read is fresh; no other partition is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    /// Item type list results.
    ItemTypes,
    /// Product group list results.
    ProductGroups,
    /// Item list results.
    Items,
    /// Organization list results.
    Organizations,
    /// Customer list results.
    Customers,
    /// Customer address list results.
    CustomerAddresses,
    /// Sales order list results.
    SalesOrders,
    /// Role list results.
    Roles,
    /// Configuration setting list results.
    ConfigSettings,
}

impl CacheScope {
    /// Returns a stable partition name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItemTypes => "item_types",
            Self::ProductGroups => "product_groups",
            Self::Items => "items",
            Self::Organizations => "organizations",
            Self::Customers => "customers",
            Self::CustomerAddresses => "customer_addresses",
            Self::SalesOrders => "sales_orders",
            Self::Roles => "roles",
            Self::ConfigSettings => "config_settings",
        }
    }
}

/// Shared list cache keyed by entity type and serialized query.
#[async_trait]
pub trait ListCache: Send + Sync {
    /// Returns the cached value for one query key.
    async fn get(&self, scope: CacheScope, key: &str) -> AppResult<Option<Value>>;

    /// Stores a value for one query key.
    async fn put(&self, scope: CacheScope, key: String, value: Value) -> AppResult<()>;

    /// Drops every cached key in one partition.
    async fn invalidate(&self, scope: CacheScope) -> AppResult<()>;
}

/// Reads a typed page from the cache; undecodable entries count as misses.
pub async fn read_cached_page<T: DeserializeOwned>(
    cache: &dyn ListCache,
    scope: CacheScope,
    key: &str,
) -> AppResult<Option<Page<T>>> {
    let Some(value) = cache.get(scope, key).await? else {
        return Ok(None);
    };

    match serde_json::from_value(value) {
        Ok(page) => Ok(Some(page)),
        Err(error) => {
            warn!(scope = scope.as_str(), %error, "discarding undecodable cache entry");
            Ok(None)
        }
    }
}

/// Stores a typed page under one query key.
pub async fn write_cached_page<T: Serialize>(
    cache: &dyn ListCache,
    scope: CacheScope,
    key: String,
    page: &Page<T>,
) -> AppResult<()> {
    let value = serde_json::to_value(page)
        .map_err(|error| AppError::Internal(format!("failed to encode cache entry: {error}")))?;

    cache.put(scope, key, value).await
}
