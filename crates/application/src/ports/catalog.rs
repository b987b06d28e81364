use async_trait::async_trait;
use pharmadex_core::{AppResult, RecordId};
use pharmadex_domain::{
    Item, ItemDraft, ItemType, ItemTypeDraft, ListQuery, Page, ProductGroup, ProductGroupDraft,
};

/// Repository port for the item catalog: items, item types, and product
/// groups.
///
/// List operations honor the query's search, filters, sort whitelist, and
/// pagination. Create operations assign the identifier and reject duplicate
/// codes with a conflict.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Lists item types for a query.
    async fn list_item_types(&self, query: &ListQuery) -> AppResult<Page<ItemType>>;

    /// Looks up one item type by identifier.
    async fn find_item_type(&self, id: RecordId) -> AppResult<Option<ItemType>>;

    /// Persists a new item type.
    async fn create_item_type(
        &self,
        draft: ItemTypeDraft,
        created_by: Option<&str>,
    ) -> AppResult<ItemType>;

    /// Replaces a stored item type with the provided state.
    async fn update_item_type(&self, item_type: ItemType) -> AppResult<ItemType>;

    /// Deletes one item type by identifier.
    async fn delete_item_type(&self, id: RecordId) -> AppResult<()>;

    /// Lists product groups for a query.
    async fn list_product_groups(&self, query: &ListQuery) -> AppResult<Page<ProductGroup>>;

    /// Looks up one product group by identifier.
    async fn find_product_group(&self, id: RecordId) -> AppResult<Option<ProductGroup>>;

    /// Persists a new product group.
    async fn create_product_group(
        &self,
        draft: ProductGroupDraft,
        created_by: Option<&str>,
    ) -> AppResult<ProductGroup>;

    /// Replaces a stored product group with the provided state.
    async fn update_product_group(&self, product_group: ProductGroup) -> AppResult<ProductGroup>;

    /// Deletes one product group by identifier.
    async fn delete_product_group(&self, id: RecordId) -> AppResult<()>;

    /// Lists items for a query.
    async fn list_items(&self, query: &ListQuery) -> AppResult<Page<Item>>;

    /// Looks up one item by identifier.
    async fn find_item(&self, id: RecordId) -> AppResult<Option<Item>>;

    /// Persists a new item.
    async fn create_item(&self, draft: ItemDraft, created_by: Option<&str>) -> AppResult<Item>;

    /// Replaces a stored item with the provided state.
    async fn update_item(&self, item: Item) -> AppResult<Item>;

    /// Deletes one item by identifier.
    async fn delete_item(&self, id: RecordId) -> AppResult<()>;
}
