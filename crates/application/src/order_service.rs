use std::sync::Arc;

use pharmadex_core::{AppError, AppResult, RecordId, UserIdentity};
use pharmadex_domain::{ListQuery, Page, Permission, SalesOrder, SalesOrderDraft, SalesOrderUpdate};

use crate::access::AccessPolicy;
use crate::ports::{CacheScope, ListCache, OrderRepository, read_cached_page, write_cached_page};

/// Use cases for sales order headers.
#[derive(Clone)]
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    cache: Arc<dyn ListCache>,
    access: AccessPolicy,
}

impl OrderService {
    /// Creates the service over its repository, cache, and access policy.
    #[must_use]
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        cache: Arc<dyn ListCache>,
        access: AccessPolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            access,
        }
    }

    /// Lists sales orders for a query.
    pub async fn list_sales_orders(
        &self,
        user: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<Page<SalesOrder>> {
        self.access.require(user, Permission::OrderRead).await?;

        let key = query.cache_key();
        if let Some(page) =
            read_cached_page(self.cache.as_ref(), CacheScope::SalesOrders, &key).await?
        {
            return Ok(page);
        }

        let page = self.repository.list_sales_orders(query).await?;
        write_cached_page(self.cache.as_ref(), CacheScope::SalesOrders, key, &page).await?;
        Ok(page)
    }

    /// Fetches one sales order.
    pub async fn get_sales_order(&self, user: &UserIdentity, id: RecordId) -> AppResult<SalesOrder> {
        self.access.require(user, Permission::OrderRead).await?;
        self.repository
            .find_sales_order(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("sales order {id} does not exist")))
    }

    /// Creates a sales order.
    pub async fn create_sales_order(
        &self,
        user: &UserIdentity,
        draft: SalesOrderDraft,
    ) -> AppResult<SalesOrder> {
        self.access.require(user, Permission::OrderWrite).await?;

        let created = self
            .repository
            .create_sales_order(draft, Some(user.subject()))
            .await?;
        self.cache.invalidate(CacheScope::SalesOrders).await?;
        Ok(created)
    }

    /// Applies a partial update to a sales order.
    pub async fn update_sales_order(
        &self,
        user: &UserIdentity,
        id: RecordId,
        update: SalesOrderUpdate,
    ) -> AppResult<SalesOrder> {
        self.access.require(user, Permission::OrderWrite).await?;

        let stored = self
            .repository
            .find_sales_order(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("sales order {id} does not exist")))?;
        let updated = stored.apply_update(update, Some(user.subject()))?;

        let saved = self.repository.update_sales_order(updated).await?;
        self.cache.invalidate(CacheScope::SalesOrders).await?;
        Ok(saved)
    }

    /// Deletes a sales order.
    pub async fn delete_sales_order(&self, user: &UserIdentity, id: RecordId) -> AppResult<()> {
        self.access.require(user, Permission::OrderWrite).await?;

        self.repository.delete_sales_order(id).await?;
        self.cache.invalidate(CacheScope::SalesOrders).await
    }
}
