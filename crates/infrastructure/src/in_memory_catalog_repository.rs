use std::collections::HashMap;

use async_trait::async_trait;
use pharmadex_application::CatalogRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{
    AuditStamp, Item, ItemDraft, ItemType, ItemTypeDraft, ListQuery, Page, ProductGroup,
    ProductGroupDraft, paginate,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct CatalogState {
    item_types: HashMap<RecordId, ItemType>,
    product_groups: HashMap<RecordId, ProductGroup>,
    items: HashMap<RecordId, Item>,
    next_id: RecordId,
}

impl CatalogState {
    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory catalog adapter used by tests and local tooling.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalogRepository {
    /// Creates an empty catalog store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(search: Option<&str>, code: &str, name: &str) -> bool {
    let Some(term) = search else {
        return true;
    };
    let term = term.to_lowercase();

    code.to_lowercase().contains(&term) || name.to_lowercase().contains(&term)
}

fn sort_item_types(rows: &mut [ItemType], query: &ListQuery) -> AppResult<()> {
    match query.sort_by().unwrap_or("code") {
        "code" => rows.sort_by(|left, right| left.code().cmp(right.code())),
        "name" => rows.sort_by(|left, right| left.name().cmp(right.name())),
        "createdAt" => rows.sort_by_key(|row| row.audit().created_at()),
        other => {
            return Err(AppError::Validation(format!(
                "unsupported sort field '{other}'"
            )));
        }
    }
    if query.sort_descending() {
        rows.reverse();
    }

    Ok(())
}

fn sort_product_groups(rows: &mut [ProductGroup], query: &ListQuery) -> AppResult<()> {
    match query.sort_by().unwrap_or("code") {
        "code" => rows.sort_by(|left, right| left.code().cmp(right.code())),
        "name" => rows.sort_by(|left, right| left.name().cmp(right.name())),
        "createdAt" => rows.sort_by_key(|row| row.audit().created_at()),
        other => {
            return Err(AppError::Validation(format!(
                "unsupported sort field '{other}'"
            )));
        }
    }
    if query.sort_descending() {
        rows.reverse();
    }

    Ok(())
}

fn sort_items(rows: &mut [Item], query: &ListQuery) -> AppResult<()> {
    match query.sort_by().unwrap_or("code") {
        "code" => rows.sort_by(|left, right| left.code().cmp(right.code())),
        "name" => rows.sort_by(|left, right| left.name().cmp(right.name())),
        "unitOfMeasure" => {
            rows.sort_by(|left, right| left.unit_of_measure().cmp(right.unit_of_measure()));
        }
        "createdAt" => rows.sort_by_key(|row| row.audit().created_at()),
        other => {
            return Err(AppError::Validation(format!(
                "unsupported sort field '{other}'"
            )));
        }
    }
    if query.sort_descending() {
        rows.reverse();
    }

    Ok(())
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_item_types(&self, query: &ListQuery) -> AppResult<Page<ItemType>> {
        let is_active = query.bool_filter("isActive")?;
        let parent_type_id = query.id_filter("parentTypeId")?;

        let state = self.state.read().await;
        let mut rows = state
            .item_types
            .values()
            .filter(|row| matches_search(query.search(), row.code(), row.name()))
            .filter(|row| is_active.is_none_or(|wanted| row.is_active() == wanted))
            .filter(|row| parent_type_id.is_none_or(|wanted| row.parent_type_id() == Some(wanted)))
            .cloned()
            .collect::<Vec<_>>();
        drop(state);

        sort_item_types(&mut rows, query)?;
        Ok(paginate(rows, query))
    }

    async fn find_item_type(&self, id: RecordId) -> AppResult<Option<ItemType>> {
        Ok(self.state.read().await.item_types.get(&id).cloned())
    }

    async fn create_item_type(
        &self,
        draft: ItemTypeDraft,
        created_by: Option<&str>,
    ) -> AppResult<ItemType> {
        let mut state = self.state.write().await;
        if state
            .item_types
            .values()
            .any(|row| row.code() == draft.code())
        {
            return Err(AppError::Conflict(format!(
                "item type code '{}' is already taken",
                draft.code()
            )));
        }

        let id = state.allocate_id();
        let created = ItemType::new(id, draft, AuditStamp::created_now(created_by));
        state.item_types.insert(id, created.clone());
        Ok(created)
    }

    async fn update_item_type(&self, item_type: ItemType) -> AppResult<ItemType> {
        let mut state = self.state.write().await;
        if !state.item_types.contains_key(&item_type.id()) {
            return Err(AppError::NotFound(format!(
                "item type {} does not exist",
                item_type.id()
            )));
        }
        if state
            .item_types
            .values()
            .any(|row| row.id() != item_type.id() && row.code() == item_type.code())
        {
            return Err(AppError::Conflict(format!(
                "item type code '{}' is already taken",
                item_type.code()
            )));
        }

        state.item_types.insert(item_type.id(), item_type.clone());
        Ok(item_type)
    }

    async fn delete_item_type(&self, id: RecordId) -> AppResult<()> {
        if self.state.write().await.item_types.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("item type {id} does not exist")));
        }

        Ok(())
    }

    async fn list_product_groups(&self, query: &ListQuery) -> AppResult<Page<ProductGroup>> {
        let is_active = query.bool_filter("isActive")?;

        let state = self.state.read().await;
        let mut rows = state
            .product_groups
            .values()
            .filter(|row| matches_search(query.search(), row.code(), row.name()))
            .filter(|row| is_active.is_none_or(|wanted| row.is_active() == wanted))
            .cloned()
            .collect::<Vec<_>>();
        drop(state);

        sort_product_groups(&mut rows, query)?;
        Ok(paginate(rows, query))
    }

    async fn find_product_group(&self, id: RecordId) -> AppResult<Option<ProductGroup>> {
        Ok(self.state.read().await.product_groups.get(&id).cloned())
    }

    async fn create_product_group(
        &self,
        draft: ProductGroupDraft,
        created_by: Option<&str>,
    ) -> AppResult<ProductGroup> {
        let mut state = self.state.write().await;
        if state
            .product_groups
            .values()
            .any(|row| row.code() == draft.code())
        {
            return Err(AppError::Conflict(format!(
                "product group code '{}' is already taken",
                draft.code()
            )));
        }

        let id = state.allocate_id();
        let created = ProductGroup::new(id, draft, AuditStamp::created_now(created_by));
        state.product_groups.insert(id, created.clone());
        Ok(created)
    }

    async fn update_product_group(&self, product_group: ProductGroup) -> AppResult<ProductGroup> {
        let mut state = self.state.write().await;
        if !state.product_groups.contains_key(&product_group.id()) {
            return Err(AppError::NotFound(format!(
                "product group {} does not exist",
                product_group.id()
            )));
        }
        if state
            .product_groups
            .values()
            .any(|row| row.id() != product_group.id() && row.code() == product_group.code())
        {
            return Err(AppError::Conflict(format!(
                "product group code '{}' is already taken",
                product_group.code()
            )));
        }

        state
            .product_groups
            .insert(product_group.id(), product_group.clone());
        Ok(product_group)
    }

    async fn delete_product_group(&self, id: RecordId) -> AppResult<()> {
        if self.state.write().await.product_groups.remove(&id).is_none() {
            return Err(AppError::NotFound(format!(
                "product group {id} does not exist"
            )));
        }

        Ok(())
    }

    async fn list_items(&self, query: &ListQuery) -> AppResult<Page<Item>> {
        let is_active = query.bool_filter("isActive")?;
        let is_controlled = query.bool_filter("isControlled")?;
        let item_type_id = query.id_filter("itemTypeId")?;
        let product_group_id = query.id_filter("productGroupId")?;

        let state = self.state.read().await;
        let mut rows = state
            .items
            .values()
            .filter(|row| matches_search(query.search(), row.code(), row.name()))
            .filter(|row| is_active.is_none_or(|wanted| row.is_active() == wanted))
            .filter(|row| is_controlled.is_none_or(|wanted| row.is_controlled() == wanted))
            .filter(|row| item_type_id.is_none_or(|wanted| row.item_type_id() == Some(wanted)))
            .filter(|row| {
                product_group_id.is_none_or(|wanted| row.product_group_id() == Some(wanted))
            })
            .cloned()
            .collect::<Vec<_>>();
        drop(state);

        sort_items(&mut rows, query)?;
        Ok(paginate(rows, query))
    }

    async fn find_item(&self, id: RecordId) -> AppResult<Option<Item>> {
        Ok(self.state.read().await.items.get(&id).cloned())
    }

    async fn create_item(&self, draft: ItemDraft, created_by: Option<&str>) -> AppResult<Item> {
        let mut state = self.state.write().await;
        if state.items.values().any(|row| row.code() == draft.code()) {
            return Err(AppError::Conflict(format!(
                "item code '{}' is already taken",
                draft.code()
            )));
        }

        let id = state.allocate_id();
        let created = Item::new(id, draft, AuditStamp::created_now(created_by));
        state.items.insert(id, created.clone());
        Ok(created)
    }

    async fn update_item(&self, item: Item) -> AppResult<Item> {
        let mut state = self.state.write().await;
        if !state.items.contains_key(&item.id()) {
            return Err(AppError::NotFound(format!(
                "item {} does not exist",
                item.id()
            )));
        }
        if state
            .items
            .values()
            .any(|row| row.id() != item.id() && row.code() == item.code())
        {
            return Err(AppError::Conflict(format!(
                "item code '{}' is already taken",
                item.code()
            )));
        }

        state.items.insert(item.id(), item.clone());
        Ok(item)
    }

    async fn delete_item(&self, id: RecordId) -> AppResult<()> {
        if self.state.write().await.items.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("item {id} does not exist")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pharmadex_application::CatalogRepository;
    use pharmadex_domain::{ItemDraft, ItemTypeDraft, ListQuery};

    use super::InMemoryCatalogRepository;

    fn item_type_draft(code: &str, name: &str, is_active: bool) -> ItemTypeDraft {
        ItemTypeDraft::new(code, name, None, None, is_active)
            .unwrap_or_else(|_| unreachable!())
    }

    fn item_draft(code: &str, name: &str) -> ItemDraft {
        ItemDraft::new(code, name, None, None, None, "TAB", None, None, false, true)
            .unwrap_or_else(|_| unreachable!())
    }

    fn query(page: u32, page_size: u32) -> ListQuery {
        ListQuery::new(page, page_size).unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn create_rejects_duplicate_codes() {
        let repository = InMemoryCatalogRepository::new();

        let first = repository
            .create_item_type(item_type_draft("RM", "Raw material", true), Some("alice"))
            .await;
        assert!(first.is_ok());

        let second = repository
            .create_item_type(item_type_draft("RM", "Raw material again", true), None)
            .await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn list_applies_active_filter_and_search() {
        let repository = InMemoryCatalogRepository::new();
        for (code, name, is_active) in [
            ("RM", "Raw material", true),
            ("FG", "Finished good", true),
            ("PKG", "Packaging", false),
        ] {
            let created = repository
                .create_item_type(item_type_draft(code, name, is_active), None)
                .await;
            assert!(created.is_ok());
        }

        let active_only = repository
            .list_item_types(&query(1, 25).with_filter("isActive", "true"))
            .await;
        assert!(active_only.is_ok());
        let Ok(active_only) = active_only else { unreachable!() };
        assert_eq!(active_only.total_count, 2);

        let searched = repository
            .list_item_types(&query(1, 25).with_search(Some("packag".to_owned())))
            .await;
        assert!(searched.is_ok());
        let Ok(searched) = searched else { unreachable!() };
        assert_eq!(searched.total_count, 1);
        assert_eq!(searched.items[0].code(), "PKG");
    }

    #[tokio::test]
    async fn list_rejects_unknown_sort_field() {
        let repository = InMemoryCatalogRepository::new();
        let listed = repository
            .list_items(&query(1, 25).with_sort(Some("secret".to_owned()), false))
            .await;
        assert!(listed.is_err());
    }

    #[tokio::test]
    async fn list_sorts_descending_by_name() {
        let repository = InMemoryCatalogRepository::new();
        for (code, name) in [("A", "Amoxicillin"), ("Z", "Zinc sulfate"), ("P", "Paracetamol")] {
            let created = repository.create_item(item_draft(code, name), None).await;
            assert!(created.is_ok());
        }

        let listed = repository
            .list_items(&query(1, 25).with_sort(Some("name".to_owned()), true))
            .await;
        assert!(listed.is_ok());
        let Ok(listed) = listed else { unreachable!() };
        let names = listed
            .items
            .iter()
            .map(|item| item.name().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Zinc sulfate", "Paracetamol", "Amoxicillin"]);
    }

    #[tokio::test]
    async fn delete_missing_row_is_not_found() {
        let repository = InMemoryCatalogRepository::new();
        assert!(repository.delete_item(42).await.is_err());
    }
}
