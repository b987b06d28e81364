use std::sync::Arc;

use pharmadex_core::{AppError, AppResult, RecordId, UserIdentity};
use pharmadex_domain::{
    Item, ItemDraft, ItemType, ItemTypeDraft, ItemTypeUpdate, ItemUpdate, ListQuery, Page,
    Permission, ProductGroup, ProductGroupDraft, ProductGroupUpdate,
};

use crate::access::AccessPolicy;
use crate::ports::{CacheScope, CatalogRepository, ListCache, read_cached_page, write_cached_page};

/// Use cases for the item catalog: item types, product groups, and items.
///
/// List reads are served from the cache when a matching query key exists;
/// every mutation invalidates the entity's cache partition after the write
/// succeeds.
#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn CatalogRepository>,
    cache: Arc<dyn ListCache>,
    access: AccessPolicy,
}

impl CatalogService {
    /// Creates the service over its repository, cache, and access policy.
    #[must_use]
    pub fn new(
        repository: Arc<dyn CatalogRepository>,
        cache: Arc<dyn ListCache>,
        access: AccessPolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            access,
        }
    }

    /// Lists item types for a query.
    pub async fn list_item_types(
        &self,
        user: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<Page<ItemType>> {
        self.access.require(user, Permission::CatalogRead).await?;

        let key = query.cache_key();
        if let Some(page) =
            read_cached_page(self.cache.as_ref(), CacheScope::ItemTypes, &key).await?
        {
            return Ok(page);
        }

        let page = self.repository.list_item_types(query).await?;
        write_cached_page(self.cache.as_ref(), CacheScope::ItemTypes, key, &page).await?;
        Ok(page)
    }

    /// Fetches one item type.
    pub async fn get_item_type(&self, user: &UserIdentity, id: RecordId) -> AppResult<ItemType> {
        self.access.require(user, Permission::CatalogRead).await?;
        self.repository
            .find_item_type(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("item type {id} does not exist")))
    }

    /// Creates an item type.
    pub async fn create_item_type(
        &self,
        user: &UserIdentity,
        draft: ItemTypeDraft,
    ) -> AppResult<ItemType> {
        self.access.require(user, Permission::CatalogWrite).await?;

        let created = self
            .repository
            .create_item_type(draft, Some(user.subject()))
            .await?;
        self.cache.invalidate(CacheScope::ItemTypes).await?;
        Ok(created)
    }

    /// Applies a partial update to an item type.
    pub async fn update_item_type(
        &self,
        user: &UserIdentity,
        id: RecordId,
        update: ItemTypeUpdate,
    ) -> AppResult<ItemType> {
        self.access.require(user, Permission::CatalogWrite).await?;

        let stored = self
            .repository
            .find_item_type(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("item type {id} does not exist")))?;
        let updated = stored.apply_update(update, Some(user.subject()))?;

        let saved = self.repository.update_item_type(updated).await?;
        self.cache.invalidate(CacheScope::ItemTypes).await?;
        Ok(saved)
    }

    /// Deletes an item type.
    pub async fn delete_item_type(&self, user: &UserIdentity, id: RecordId) -> AppResult<()> {
        self.access.require(user, Permission::CatalogWrite).await?;

        self.repository.delete_item_type(id).await?;
        self.cache.invalidate(CacheScope::ItemTypes).await
    }

    /// Lists product groups for a query.
    pub async fn list_product_groups(
        &self,
        user: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<Page<ProductGroup>> {
        self.access.require(user, Permission::CatalogRead).await?;

        let key = query.cache_key();
        if let Some(page) =
            read_cached_page(self.cache.as_ref(), CacheScope::ProductGroups, &key).await?
        {
            return Ok(page);
        }

        let page = self.repository.list_product_groups(query).await?;
        write_cached_page(self.cache.as_ref(), CacheScope::ProductGroups, key, &page).await?;
        Ok(page)
    }

    /// Fetches one product group.
    pub async fn get_product_group(
        &self,
        user: &UserIdentity,
        id: RecordId,
    ) -> AppResult<ProductGroup> {
        self.access.require(user, Permission::CatalogRead).await?;
        self.repository
            .find_product_group(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product group {id} does not exist")))
    }

    /// Creates a product group.
    pub async fn create_product_group(
        &self,
        user: &UserIdentity,
        draft: ProductGroupDraft,
    ) -> AppResult<ProductGroup> {
        self.access.require(user, Permission::CatalogWrite).await?;

        let created = self
            .repository
            .create_product_group(draft, Some(user.subject()))
            .await?;
        self.cache.invalidate(CacheScope::ProductGroups).await?;
        Ok(created)
    }

    /// Applies a partial update to a product group.
    pub async fn update_product_group(
        &self,
        user: &UserIdentity,
        id: RecordId,
        update: ProductGroupUpdate,
    ) -> AppResult<ProductGroup> {
        self.access.require(user, Permission::CatalogWrite).await?;

        let stored = self
            .repository
            .find_product_group(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product group {id} does not exist")))?;
        let updated = stored.apply_update(update, Some(user.subject()))?;

        let saved = self.repository.update_product_group(updated).await?;
        self.cache.invalidate(CacheScope::ProductGroups).await?;
        Ok(saved)
    }

    /// Deletes a product group.
    pub async fn delete_product_group(&self, user: &UserIdentity, id: RecordId) -> AppResult<()> {
        self.access.require(user, Permission::CatalogWrite).await?;

        self.repository.delete_product_group(id).await?;
        self.cache.invalidate(CacheScope::ProductGroups).await
    }

    /// Lists items for a query.
    pub async fn list_items(
        &self,
        user: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<Page<Item>> {
        self.access.require(user, Permission::CatalogRead).await?;

        let key = query.cache_key();
        if let Some(page) = read_cached_page(self.cache.as_ref(), CacheScope::Items, &key).await? {
            return Ok(page);
        }

        let page = self.repository.list_items(query).await?;
        write_cached_page(self.cache.as_ref(), CacheScope::Items, key, &page).await?;
        Ok(page)
    }

    /// Fetches one item.
    pub async fn get_item(&self, user: &UserIdentity, id: RecordId) -> AppResult<Item> {
        self.access.require(user, Permission::CatalogRead).await?;
        self.repository
            .find_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("item {id} does not exist")))
    }

    /// Creates an item.
    pub async fn create_item(&self, user: &UserIdentity, draft: ItemDraft) -> AppResult<Item> {
        self.access.require(user, Permission::CatalogWrite).await?;

        let created = self
            .repository
            .create_item(draft, Some(user.subject()))
            .await?;
        self.cache.invalidate(CacheScope::Items).await?;
        Ok(created)
    }

    /// Applies a partial update to an item.
    pub async fn update_item(
        &self,
        user: &UserIdentity,
        id: RecordId,
        update: ItemUpdate,
    ) -> AppResult<Item> {
        self.access.require(user, Permission::CatalogWrite).await?;

        let stored = self
            .repository
            .find_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("item {id} does not exist")))?;
        let updated = stored.apply_update(update, Some(user.subject()))?;

        let saved = self.repository.update_item(updated).await?;
        self.cache.invalidate(CacheScope::Items).await?;
        Ok(saved)
    }

    /// Deletes an item.
    pub async fn delete_item(&self, user: &UserIdentity, id: RecordId) -> AppResult<()> {
        self.access.require(user, Permission::CatalogWrite).await?;

        self.repository.delete_item(id).await?;
        self.cache.invalidate(CacheScope::Items).await
    }
}

#[cfg(test)]
mod tests;
