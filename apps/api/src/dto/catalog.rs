use pharmadex_core::{AppError, RecordId};
use pharmadex_domain::{
    DEFAULT_PAGE_SIZE, Item, ItemDraft, ItemType, ItemTypeDraft, ItemTypeUpdate, ItemUpdate,
    ListQuery, ProductGroup, ProductGroupDraft, ProductGroupUpdate,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of an item type.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/item-type-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypeResponse {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_type_id: Option<RecordId>,
    pub is_active: bool,
    pub created_at: String,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// Request payload for creating an item type.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-item-type-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemTypeRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_type_id: Option<RecordId>,
    /// Defaults to active when omitted.
    pub is_active: Option<bool>,
}

/// Request payload for partially updating an item type.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-item-type-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemTypeRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_type_id: Option<RecordId>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing item types.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypeListParams {
    #[serde(alias = "pageNumber")]
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub is_active: Option<bool>,
    pub parent_type_id: Option<RecordId>,
}

impl ItemTypeListParams {
    /// Builds the validated list query for this request.
    pub fn into_query(self) -> Result<ListQuery, AppError> {
        let mut query = ListQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .with_search(self.search)
        .with_sort(self.sort_by, self.sort_descending.unwrap_or(false));

        if let Some(is_active) = self.is_active {
            query = query.with_filter("isActive", is_active.to_string());
        }
        if let Some(parent_type_id) = self.parent_type_id {
            query = query.with_filter("parentTypeId", parent_type_id.to_string());
        }

        Ok(query)
    }
}

impl From<ItemType> for ItemTypeResponse {
    fn from(value: ItemType) -> Self {
        Self {
            id: value.id(),
            code: value.code().to_owned(),
            name: value.name().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            parent_type_id: value.parent_type_id(),
            is_active: value.is_active(),
            created_at: value.audit().created_at().to_rfc3339(),
            created_by: value.audit().created_by().map(ToOwned::to_owned),
            updated_at: value.audit().updated_at().map(|at| at.to_rfc3339()),
            updated_by: value.audit().updated_by().map(ToOwned::to_owned),
        }
    }
}

impl TryFrom<CreateItemTypeRequest> for ItemTypeDraft {
    type Error = AppError;

    fn try_from(value: CreateItemTypeRequest) -> Result<Self, Self::Error> {
        Self::new(
            value.code,
            value.name,
            value.description,
            value.parent_type_id,
            value.is_active.unwrap_or(true),
        )
    }
}

impl From<UpdateItemTypeRequest> for ItemTypeUpdate {
    fn from(value: UpdateItemTypeRequest) -> Self {
        Self {
            code: value.code,
            name: value.name,
            description: value.description,
            parent_type_id: value.parent_type_id,
            is_active: value.is_active,
        }
    }
}

/// API representation of a product group.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/product-group-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroupResponse {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// Request payload for creating a product group.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-product-group-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductGroupRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// Defaults to active when omitted.
    pub is_active: Option<bool>,
}

/// Request payload for partially updating a product group.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-product-group-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductGroupRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing product groups.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGroupListParams {
    #[serde(alias = "pageNumber")]
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub is_active: Option<bool>,
}

impl ProductGroupListParams {
    /// Builds the validated list query for this request.
    pub fn into_query(self) -> Result<ListQuery, AppError> {
        let mut query = ListQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .with_search(self.search)
        .with_sort(self.sort_by, self.sort_descending.unwrap_or(false));

        if let Some(is_active) = self.is_active {
            query = query.with_filter("isActive", is_active.to_string());
        }

        Ok(query)
    }
}

impl From<ProductGroup> for ProductGroupResponse {
    fn from(value: ProductGroup) -> Self {
        Self {
            id: value.id(),
            code: value.code().to_owned(),
            name: value.name().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            is_active: value.is_active(),
            created_at: value.audit().created_at().to_rfc3339(),
            created_by: value.audit().created_by().map(ToOwned::to_owned),
            updated_at: value.audit().updated_at().map(|at| at.to_rfc3339()),
            updated_by: value.audit().updated_by().map(ToOwned::to_owned),
        }
    }
}

impl TryFrom<CreateProductGroupRequest> for ProductGroupDraft {
    type Error = AppError;

    fn try_from(value: CreateProductGroupRequest) -> Result<Self, Self::Error> {
        Self::new(
            value.code,
            value.name,
            value.description,
            value.is_active.unwrap_or(true),
        )
    }
}

impl From<UpdateProductGroupRequest> for ProductGroupUpdate {
    fn from(value: UpdateProductGroupRequest) -> Self {
        Self {
            code: value.code,
            name: value.name,
            description: value.description,
            is_active: value.is_active,
        }
    }
}

/// API representation of an item.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/item-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub item_type_id: Option<RecordId>,
    pub product_group_id: Option<RecordId>,
    pub unit_of_measure: String,
    pub strength: Option<String>,
    pub shelf_life_months: Option<i64>,
    pub is_controlled: bool,
    pub is_active: bool,
    pub created_at: String,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// Request payload for creating an item.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-item-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub item_type_id: Option<RecordId>,
    pub product_group_id: Option<RecordId>,
    pub unit_of_measure: String,
    pub strength: Option<String>,
    pub shelf_life_months: Option<i64>,
    /// Defaults to uncontrolled when omitted.
    pub is_controlled: Option<bool>,
    /// Defaults to active when omitted.
    pub is_active: Option<bool>,
}

/// Request payload for partially updating an item.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-item-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub item_type_id: Option<RecordId>,
    pub product_group_id: Option<RecordId>,
    pub unit_of_measure: Option<String>,
    pub strength: Option<String>,
    pub shelf_life_months: Option<i64>,
    pub is_controlled: Option<bool>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing items.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemListParams {
    #[serde(alias = "pageNumber")]
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub is_active: Option<bool>,
    pub is_controlled: Option<bool>,
    pub item_type_id: Option<RecordId>,
    pub product_group_id: Option<RecordId>,
}

impl ItemListParams {
    /// Builds the validated list query for this request.
    pub fn into_query(self) -> Result<ListQuery, AppError> {
        let mut query = ListQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .with_search(self.search)
        .with_sort(self.sort_by, self.sort_descending.unwrap_or(false));

        if let Some(is_active) = self.is_active {
            query = query.with_filter("isActive", is_active.to_string());
        }
        if let Some(is_controlled) = self.is_controlled {
            query = query.with_filter("isControlled", is_controlled.to_string());
        }
        if let Some(item_type_id) = self.item_type_id {
            query = query.with_filter("itemTypeId", item_type_id.to_string());
        }
        if let Some(product_group_id) = self.product_group_id {
            query = query.with_filter("productGroupId", product_group_id.to_string());
        }

        Ok(query)
    }
}

impl From<Item> for ItemResponse {
    fn from(value: Item) -> Self {
        Self {
            id: value.id(),
            code: value.code().to_owned(),
            name: value.name().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            item_type_id: value.item_type_id(),
            product_group_id: value.product_group_id(),
            unit_of_measure: value.unit_of_measure().to_owned(),
            strength: value.strength().map(ToOwned::to_owned),
            shelf_life_months: value.shelf_life_months(),
            is_controlled: value.is_controlled(),
            is_active: value.is_active(),
            created_at: value.audit().created_at().to_rfc3339(),
            created_by: value.audit().created_by().map(ToOwned::to_owned),
            updated_at: value.audit().updated_at().map(|at| at.to_rfc3339()),
            updated_by: value.audit().updated_by().map(ToOwned::to_owned),
        }
    }
}

impl TryFrom<CreateItemRequest> for ItemDraft {
    type Error = AppError;

    fn try_from(value: CreateItemRequest) -> Result<Self, Self::Error> {
        Self::new(
            value.code,
            value.name,
            value.description,
            value.item_type_id,
            value.product_group_id,
            value.unit_of_measure,
            value.strength,
            value.shelf_life_months,
            value.is_controlled.unwrap_or(false),
            value.is_active.unwrap_or(true),
        )
    }
}

impl From<UpdateItemRequest> for ItemUpdate {
    fn from(value: UpdateItemRequest) -> Self {
        Self {
            code: value.code,
            name: value.name,
            description: value.description,
            item_type_id: value.item_type_id,
            product_group_id: value.product_group_id,
            unit_of_measure: value.unit_of_measure,
            strength: value.strength,
            shelf_life_months: value.shelf_life_months,
            is_controlled: value.is_controlled,
            is_active: value.is_active,
        }
    }
}
