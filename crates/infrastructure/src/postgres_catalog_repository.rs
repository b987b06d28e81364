use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use pharmadex_application::CatalogRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{
    AuditStamp, Item, ItemDraft, ItemType, ItemTypeDraft, ListQuery, Page, ProductGroup,
    ProductGroupDraft,
};

use crate::postgres_list_helpers::{conflict_on_unique, internal, sort_direction};

/// PostgreSQL-backed catalog repository.
#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ItemTypeRow {
    id: i64,
    code: String,
    name: String,
    description: Option<String>,
    parent_type_id: Option<i64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

#[derive(Debug, FromRow)]
struct ProductGroupRow {
    id: i64,
    code: String,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    code: String,
    name: String,
    description: Option<String>,
    item_type_id: Option<i64>,
    product_group_id: Option<i64>,
    unit_of_measure: String,
    strength: Option<String>,
    shelf_life_months: Option<i64>,
    is_controlled: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

impl TryFrom<ItemTypeRow> for ItemType {
    type Error = AppError;

    fn try_from(row: ItemTypeRow) -> Result<Self, Self::Error> {
        let draft = ItemTypeDraft::new(
            row.code,
            row.name,
            row.description,
            row.parent_type_id,
            row.is_active,
        )
        .map_err(|error| {
            AppError::Internal(format!("stored item type {} is invalid: {error}", row.id))
        })?;

        Ok(Self::new(
            row.id,
            draft,
            AuditStamp::from_parts(row.created_at, row.created_by, row.updated_at, row.updated_by),
        ))
    }
}

impl TryFrom<ProductGroupRow> for ProductGroup {
    type Error = AppError;

    fn try_from(row: ProductGroupRow) -> Result<Self, Self::Error> {
        let draft = ProductGroupDraft::new(row.code, row.name, row.description, row.is_active)
            .map_err(|error| {
                AppError::Internal(format!(
                    "stored product group {} is invalid: {error}",
                    row.id
                ))
            })?;

        Ok(Self::new(
            row.id,
            draft,
            AuditStamp::from_parts(row.created_at, row.created_by, row.updated_at, row.updated_by),
        ))
    }
}

impl TryFrom<ItemRow> for Item {
    type Error = AppError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let draft = ItemDraft::new(
            row.code,
            row.name,
            row.description,
            row.item_type_id,
            row.product_group_id,
            row.unit_of_measure,
            row.strength,
            row.shelf_life_months,
            row.is_controlled,
            row.is_active,
        )
        .map_err(|error| {
            AppError::Internal(format!("stored item {} is invalid: {error}", row.id))
        })?;

        Ok(Self::new(
            row.id,
            draft,
            AuditStamp::from_parts(row.created_at, row.created_by, row.updated_at, row.updated_by),
        ))
    }
}

const ITEM_TYPE_COLUMNS: &str = "id, code, name, description, parent_type_id, is_active, \
     created_at, created_by, updated_at, updated_by";

const PRODUCT_GROUP_COLUMNS: &str =
    "id, code, name, description, is_active, created_at, created_by, updated_at, updated_by";

const ITEM_COLUMNS: &str = "id, code, name, description, item_type_id, product_group_id, \
     unit_of_measure, strength, shelf_life_months, is_controlled, is_active, \
     created_at, created_by, updated_at, updated_by";

fn code_name_sort_column(sort_by: Option<&str>) -> AppResult<&'static str> {
    match sort_by.unwrap_or("code") {
        "code" => Ok("code"),
        "name" => Ok("name"),
        "createdAt" => Ok("created_at"),
        other => Err(AppError::Validation(format!(
            "unsupported sort field '{other}'"
        ))),
    }
}

fn item_sort_column(sort_by: Option<&str>) -> AppResult<&'static str> {
    match sort_by.unwrap_or("code") {
        "code" => Ok("code"),
        "name" => Ok("name"),
        "unitOfMeasure" => Ok("unit_of_measure"),
        "createdAt" => Ok("created_at"),
        other => Err(AppError::Validation(format!(
            "unsupported sort field '{other}'"
        ))),
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn list_item_types(&self, query: &ListQuery) -> AppResult<Page<ItemType>> {
        let is_active = query.bool_filter("isActive")?;
        let parent_type_id = query.id_filter("parentTypeId")?;
        let column = code_name_sort_column(query.sort_by())?;
        let direction = sort_direction(query.sort_descending());

        let where_clause = "WHERE ($1::text IS NULL OR code ILIKE '%' || $1 || '%' OR name ILIKE '%' || $1 || '%') \
             AND ($2::boolean IS NULL OR is_active = $2) \
             AND ($3::bigint IS NULL OR parent_type_id = $3)";

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM item_types {where_clause}"
        ))
        .bind(query.search())
        .bind(is_active)
        .bind(parent_type_id)
        .fetch_one(&self.pool)
        .await
        .map_err(internal("failed to count item types"))?;

        let rows = sqlx::query_as::<_, ItemTypeRow>(&format!(
            "SELECT {ITEM_TYPE_COLUMNS} FROM item_types {where_clause} \
             ORDER BY {column} {direction}, id LIMIT $4 OFFSET $5"
        ))
        .bind(query.search())
        .bind(is_active)
        .bind(parent_type_id)
        .bind(query.limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to list item types"))?;

        let items = rows
            .into_iter()
            .map(ItemType::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(items, total_count as u64, query.page_size()))
    }

    async fn find_item_type(&self, id: RecordId) -> AppResult<Option<ItemType>> {
        let row = sqlx::query_as::<_, ItemTypeRow>(&format!(
            "SELECT {ITEM_TYPE_COLUMNS} FROM item_types WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load item type"))?;

        row.map(ItemType::try_from).transpose()
    }

    async fn create_item_type(
        &self,
        draft: ItemTypeDraft,
        created_by: Option<&str>,
    ) -> AppResult<ItemType> {
        // The database assigns the identifier; the staged value only carries
        // the validated fields into the insert.
        let staged = ItemType::new(0, draft, AuditStamp::created_now(created_by));
        let conflict = format!("item type code '{}' is already taken", staged.code());

        let row = sqlx::query_as::<_, ItemTypeRow>(&format!(
            "INSERT INTO item_types (code, name, description, parent_type_id, is_active, created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ITEM_TYPE_COLUMNS}"
        ))
        .bind(staged.code())
        .bind(staged.name())
        .bind(staged.description())
        .bind(staged.parent_type_id())
        .bind(staged.is_active())
        .bind(staged.audit().created_at())
        .bind(staged.audit().created_by())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to create item type"))?;

        ItemType::try_from(row)
    }

    async fn update_item_type(&self, item_type: ItemType) -> AppResult<ItemType> {
        let conflict = format!("item type code '{}' is already taken", item_type.code());

        let row = sqlx::query_as::<_, ItemTypeRow>(&format!(
            "UPDATE item_types \
             SET code = $2, name = $3, description = $4, parent_type_id = $5, is_active = $6, \
                 updated_at = $7, updated_by = $8 \
             WHERE id = $1 \
             RETURNING {ITEM_TYPE_COLUMNS}"
        ))
        .bind(item_type.id())
        .bind(item_type.code())
        .bind(item_type.name())
        .bind(item_type.description())
        .bind(item_type.parent_type_id())
        .bind(item_type.is_active())
        .bind(item_type.audit().updated_at())
        .bind(item_type.audit().updated_by())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to update item type"))?
        .ok_or_else(|| {
            AppError::NotFound(format!("item type {} does not exist", item_type.id()))
        })?;

        ItemType::try_from(row)
    }

    async fn delete_item_type(&self, id: RecordId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM item_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("failed to delete item type"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("item type {id} does not exist")));
        }

        Ok(())
    }

    async fn list_product_groups(&self, query: &ListQuery) -> AppResult<Page<ProductGroup>> {
        let is_active = query.bool_filter("isActive")?;
        let column = code_name_sort_column(query.sort_by())?;
        let direction = sort_direction(query.sort_descending());

        let where_clause = "WHERE ($1::text IS NULL OR code ILIKE '%' || $1 || '%' OR name ILIKE '%' || $1 || '%') \
             AND ($2::boolean IS NULL OR is_active = $2)";

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM product_groups {where_clause}"
        ))
        .bind(query.search())
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(internal("failed to count product groups"))?;

        let rows = sqlx::query_as::<_, ProductGroupRow>(&format!(
            "SELECT {PRODUCT_GROUP_COLUMNS} FROM product_groups {where_clause} \
             ORDER BY {column} {direction}, id LIMIT $3 OFFSET $4"
        ))
        .bind(query.search())
        .bind(is_active)
        .bind(query.limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to list product groups"))?;

        let items = rows
            .into_iter()
            .map(ProductGroup::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(items, total_count as u64, query.page_size()))
    }

    async fn find_product_group(&self, id: RecordId) -> AppResult<Option<ProductGroup>> {
        let row = sqlx::query_as::<_, ProductGroupRow>(&format!(
            "SELECT {PRODUCT_GROUP_COLUMNS} FROM product_groups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load product group"))?;

        row.map(ProductGroup::try_from).transpose()
    }

    async fn create_product_group(
        &self,
        draft: ProductGroupDraft,
        created_by: Option<&str>,
    ) -> AppResult<ProductGroup> {
        let staged = ProductGroup::new(0, draft, AuditStamp::created_now(created_by));
        let conflict = format!("product group code '{}' is already taken", staged.code());

        let row = sqlx::query_as::<_, ProductGroupRow>(&format!(
            "INSERT INTO product_groups (code, name, description, is_active, created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PRODUCT_GROUP_COLUMNS}"
        ))
        .bind(staged.code())
        .bind(staged.name())
        .bind(staged.description())
        .bind(staged.is_active())
        .bind(staged.audit().created_at())
        .bind(staged.audit().created_by())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to create product group"))?;

        ProductGroup::try_from(row)
    }

    async fn update_product_group(&self, product_group: ProductGroup) -> AppResult<ProductGroup> {
        let conflict = format!(
            "product group code '{}' is already taken",
            product_group.code()
        );

        let row = sqlx::query_as::<_, ProductGroupRow>(&format!(
            "UPDATE product_groups \
             SET code = $2, name = $3, description = $4, is_active = $5, \
                 updated_at = $6, updated_by = $7 \
             WHERE id = $1 \
             RETURNING {PRODUCT_GROUP_COLUMNS}"
        ))
        .bind(product_group.id())
        .bind(product_group.code())
        .bind(product_group.name())
        .bind(product_group.description())
        .bind(product_group.is_active())
        .bind(product_group.audit().updated_at())
        .bind(product_group.audit().updated_by())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to update product group"))?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "product group {} does not exist",
                product_group.id()
            ))
        })?;

        ProductGroup::try_from(row)
    }

    async fn delete_product_group(&self, id: RecordId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM product_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("failed to delete product group"))?
            .rows_affected();

        if rows_affected == 0 {
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
        let column = item_sort_column(query.sort_by())?;
        let direction = sort_direction(query.sort_descending());

        let where_clause = "WHERE ($1::text IS NULL OR code ILIKE '%' || $1 || '%' OR name ILIKE '%' || $1 || '%') \
             AND ($2::boolean IS NULL OR is_active = $2) \
             AND ($3::boolean IS NULL OR is_controlled = $3) \
             AND ($4::bigint IS NULL OR item_type_id = $4) \
             AND ($5::bigint IS NULL OR product_group_id = $5)";

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM items {where_clause}"
        ))
        .bind(query.search())
        .bind(is_active)
        .bind(is_controlled)
        .bind(item_type_id)
        .bind(product_group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(internal("failed to count items"))?;

        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items {where_clause} \
             ORDER BY {column} {direction}, id LIMIT $6 OFFSET $7"
        ))
        .bind(query.search())
        .bind(is_active)
        .bind(is_controlled)
        .bind(item_type_id)
        .bind(product_group_id)
        .bind(query.limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to list items"))?;

        let items = rows
            .into_iter()
            .map(Item::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(items, total_count as u64, query.page_size()))
    }

    async fn find_item(&self, id: RecordId) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load item"))?;

        row.map(Item::try_from).transpose()
    }

    async fn create_item(&self, draft: ItemDraft, created_by: Option<&str>) -> AppResult<Item> {
        let staged = Item::new(0, draft, AuditStamp::created_now(created_by));
        let conflict = format!("item code '{}' is already taken", staged.code());

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "INSERT INTO items (code, name, description, item_type_id, product_group_id, \
                 unit_of_measure, strength, shelf_life_months, is_controlled, is_active, \
                 created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(staged.code())
        .bind(staged.name())
        .bind(staged.description())
        .bind(staged.item_type_id())
        .bind(staged.product_group_id())
        .bind(staged.unit_of_measure())
        .bind(staged.strength())
        .bind(staged.shelf_life_months())
        .bind(staged.is_controlled())
        .bind(staged.is_active())
        .bind(staged.audit().created_at())
        .bind(staged.audit().created_by())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to create item"))?;

        Item::try_from(row)
    }

    async fn update_item(&self, item: Item) -> AppResult<Item> {
        let conflict = format!("item code '{}' is already taken", item.code());

        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "UPDATE items \
             SET code = $2, name = $3, description = $4, item_type_id = $5, \
                 product_group_id = $6, unit_of_measure = $7, strength = $8, \
                 shelf_life_months = $9, is_controlled = $10, is_active = $11, \
                 updated_at = $12, updated_by = $13 \
             WHERE id = $1 \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(item.id())
        .bind(item.code())
        .bind(item.name())
        .bind(item.description())
        .bind(item.item_type_id())
        .bind(item.product_group_id())
        .bind(item.unit_of_measure())
        .bind(item.strength())
        .bind(item.shelf_life_months())
        .bind(item.is_controlled())
        .bind(item.is_active())
        .bind(item.audit().updated_at())
        .bind(item.audit().updated_by())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to update item"))?
        .ok_or_else(|| AppError::NotFound(format!("item {} does not exist", item.id())))?;

        Item::try_from(row)
    }

    async fn delete_item(&self, id: RecordId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("failed to delete item"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("item {id} does not exist")));
        }

        Ok(())
    }
}
