use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pharmadex_core::{AppResult, RecordId, UserIdentity};
use pharmadex_domain::{
    AuditStamp, Item, ItemDraft, ItemType, ItemTypeDraft, ListQuery, Page, Permission,
    ProductGroup, ProductGroupDraft, Role, RoleDraft, paginate,
};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::access::AccessPolicy;
use crate::ports::{CacheScope, CatalogRepository, ListCache, SecurityRepository};

use super::CatalogService;

struct FakeRepository {
    item_types: Mutex<Vec<ItemType>>,
    next_id: Mutex<RecordId>,
    list_calls: Mutex<usize>,
}

impl FakeRepository {
    fn new() -> Self {
        Self {
            item_types: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
            list_calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl CatalogRepository for FakeRepository {
    async fn list_item_types(&self, query: &ListQuery) -> AppResult<Page<ItemType>> {
        *self.list_calls.lock().await += 1;
        let rows = self.item_types.lock().await.clone();
        Ok(paginate(rows, query))
    }

    async fn find_item_type(&self, id: RecordId) -> AppResult<Option<ItemType>> {
        let rows = self.item_types.lock().await;
        Ok(rows.iter().find(|stored| stored.id() == id).cloned())
    }

    async fn create_item_type(
        &self,
        draft: ItemTypeDraft,
        created_by: Option<&str>,
    ) -> AppResult<ItemType> {
        let mut next_id = self.next_id.lock().await;
        *next_id += 1;
        let created = ItemType::new(*next_id, draft, AuditStamp::created_now(created_by));
        self.item_types.lock().await.push(created.clone());
        Ok(created)
    }

    async fn update_item_type(&self, item_type: ItemType) -> AppResult<ItemType> {
        let mut rows = self.item_types.lock().await;
        rows.retain(|stored| stored.id() != item_type.id());
        rows.push(item_type.clone());
        Ok(item_type)
    }

    async fn delete_item_type(&self, id: RecordId) -> AppResult<()> {
        self.item_types.lock().await.retain(|stored| stored.id() != id);
        Ok(())
    }

    async fn list_product_groups(&self, _query: &ListQuery) -> AppResult<Page<ProductGroup>> {
        unreachable!()
    }

    async fn find_product_group(&self, _id: RecordId) -> AppResult<Option<ProductGroup>> {
        unreachable!()
    }

    async fn create_product_group(
        &self,
        _draft: ProductGroupDraft,
        _created_by: Option<&str>,
    ) -> AppResult<ProductGroup> {
        unreachable!()
    }

    async fn update_product_group(&self, _product_group: ProductGroup) -> AppResult<ProductGroup> {
        unreachable!()
    }

    async fn delete_product_group(&self, _id: RecordId) -> AppResult<()> {
        unreachable!()
    }

    async fn list_items(&self, _query: &ListQuery) -> AppResult<Page<Item>> {
        unreachable!()
    }

    async fn find_item(&self, _id: RecordId) -> AppResult<Option<Item>> {
        unreachable!()
    }

    async fn create_item(&self, _draft: ItemDraft, _created_by: Option<&str>) -> AppResult<Item> {
        unreachable!()
    }

    async fn update_item(&self, _item: Item) -> AppResult<Item> {
        unreachable!()
    }

    async fn delete_item(&self, _id: RecordId) -> AppResult<()> {
        unreachable!()
    }
}

struct FakeCache {
    entries: Mutex<HashMap<(CacheScope, String), Value>>,
}

impl FakeCache {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    async fn contains(&self, scope: CacheScope) -> bool {
        self.entries
            .lock()
            .await
            .keys()
            .any(|(stored, _)| *stored == scope)
    }
}

#[async_trait]
impl ListCache for FakeCache {
    async fn get(&self, scope: CacheScope, key: &str) -> AppResult<Option<Value>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(&(scope, key.to_owned())).cloned())
    }

    async fn put(&self, scope: CacheScope, key: String, value: Value) -> AppResult<()> {
        self.entries.lock().await.insert((scope, key), value);
        Ok(())
    }

    async fn invalidate(&self, scope: CacheScope) -> AppResult<()> {
        self.entries
            .lock()
            .await
            .retain(|(stored, _), _| *stored != scope);
        Ok(())
    }
}

struct FixedRoles {
    roles: Vec<Role>,
}

#[async_trait]
impl SecurityRepository for FixedRoles {
    async fn list_roles(&self, query: &ListQuery) -> AppResult<Page<Role>> {
        Ok(Page::new(
            self.roles.clone(),
            self.roles.len() as u64,
            query.page_size(),
        ))
    }

    async fn find_role(&self, id: RecordId) -> AppResult<Option<Role>> {
        Ok(self.roles.iter().find(|role| role.id() == id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self.roles.iter().find(|role| role.name() == name).cloned())
    }

    async fn create_role(
        &self,
        _draft: RoleDraft,
        _is_system: bool,
        _created_by: Option<&str>,
    ) -> AppResult<Role> {
        unreachable!()
    }

    async fn update_role(&self, _role: Role) -> AppResult<Role> {
        unreachable!()
    }

    async fn delete_role(&self, _id: RecordId) -> AppResult<()> {
        unreachable!()
    }
}

struct Fixture {
    service: CatalogService,
    repository: Arc<FakeRepository>,
    cache: Arc<FakeCache>,
}

fn fixture(permissions: &[Permission]) -> Fixture {
    let draft = RoleDraft::new("tester", None, permissions.iter().copied().collect())
        .unwrap_or_else(|_| unreachable!());
    let role = Role::new(1, draft, false, AuditStamp::created_now(None));
    let access = AccessPolicy::new(Arc::new(FixedRoles { roles: vec![role] }));

    let repository = Arc::new(FakeRepository::new());
    let cache = Arc::new(FakeCache::new());
    let service = CatalogService::new(repository.clone(), cache.clone(), access);

    Fixture {
        service,
        repository,
        cache,
    }
}

fn user() -> UserIdentity {
    UserIdentity::new("u-1", "Asha", None, vec!["tester".to_owned()])
}

fn query() -> ListQuery {
    ListQuery::new(1, 25).unwrap_or_else(|_| unreachable!())
}

fn item_type_draft(code: &str) -> ItemTypeDraft {
    ItemTypeDraft::new(code, "Raw Material", None, None, true)
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn read_only_user_can_list_but_not_create() {
    let fixture = fixture(&[Permission::CatalogRead]);
    let user = user();

    let listed = fixture.service.list_item_types(&user, &query()).await;
    assert!(listed.is_ok());

    let created = fixture
        .service
        .create_item_type(&user, item_type_draft("RM"))
        .await;
    assert!(created.is_err());
}

#[tokio::test]
async fn create_then_list_returns_the_record_exactly_once() {
    let fixture = fixture(&[Permission::CatalogRead, Permission::CatalogWrite]);
    let user = user();

    // Prime the cache with the empty result.
    let before = fixture.service.list_item_types(&user, &query()).await;
    assert!(before.is_ok());

    let created = fixture
        .service
        .create_item_type(&user, item_type_draft("RM"))
        .await;
    assert!(created.is_ok());

    let after = fixture.service.list_item_types(&user, &query()).await;
    assert!(after.is_ok());
    let Ok(after) = after else { unreachable!() };
    let matches = after
        .items
        .iter()
        .filter(|item_type| item_type.code() == "RM")
        .count();
    assert_eq!(matches, 1);
}

#[tokio::test]
async fn repeated_list_is_served_from_the_cache() {
    let fixture = fixture(&[Permission::CatalogRead]);
    let user = user();

    let first = fixture.service.list_item_types(&user, &query()).await;
    assert!(first.is_ok());
    let second = fixture.service.list_item_types(&user, &query()).await;
    assert!(second.is_ok());

    assert_eq!(*fixture.repository.list_calls.lock().await, 1);
}

#[tokio::test]
async fn mutations_leave_other_cache_partitions_alone() {
    let fixture = fixture(&[Permission::CatalogRead, Permission::CatalogWrite]);
    let user = user();

    fixture
        .cache
        .put(
            CacheScope::Items,
            "page=1".to_owned(),
            serde_json::json!({"items": []}),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let created = fixture
        .service
        .create_item_type(&user, item_type_draft("RM"))
        .await;
    assert!(created.is_ok());

    assert!(!fixture.cache.contains(CacheScope::ItemTypes).await);
    assert!(fixture.cache.contains(CacheScope::Items).await);
}
