use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use pharmadex_core::{RecordId, UserIdentity};
use pharmadex_domain::{ItemDraft, ItemTypeDraft, ProductGroupDraft};

use crate::dto::{
    CreateItemRequest, CreateItemTypeRequest, CreateProductGroupRequest, ItemListParams,
    ItemResponse, ItemTypeListParams, ItemTypeResponse, PageResponse, ProductGroupListParams,
    ProductGroupResponse, UpdateItemRequest, UpdateItemTypeRequest, UpdateProductGroupRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_item_types_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ItemTypeListParams>,
) -> ApiResult<Json<PageResponse<ItemTypeResponse>>> {
    let query = params.into_query()?;
    let page = state.catalog_service.list_item_types(&user, &query).await?;
    Ok(Json(page.into()))
}

pub async fn get_item_type_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<ItemTypeResponse>> {
    let item_type = state.catalog_service.get_item_type(&user, id).await?;
    Ok(Json(item_type.into()))
}

pub async fn create_item_type_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateItemTypeRequest>,
) -> ApiResult<(StatusCode, Json<ItemTypeResponse>)> {
    let draft = ItemTypeDraft::try_from(payload)?;
    let created = state.catalog_service.create_item_type(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_item_type_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
    Json(payload): Json<UpdateItemTypeRequest>,
) -> ApiResult<Json<ItemTypeResponse>> {
    let updated = state
        .catalog_service
        .update_item_type(&user, id, payload.into())
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_item_type_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    state.catalog_service.delete_item_type(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_product_groups_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ProductGroupListParams>,
) -> ApiResult<Json<PageResponse<ProductGroupResponse>>> {
    let query = params.into_query()?;
    let page = state
        .catalog_service
        .list_product_groups(&user, &query)
        .await?;
    Ok(Json(page.into()))
}

pub async fn get_product_group_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<ProductGroupResponse>> {
    let group = state.catalog_service.get_product_group(&user, id).await?;
    Ok(Json(group.into()))
}

pub async fn create_product_group_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateProductGroupRequest>,
) -> ApiResult<(StatusCode, Json<ProductGroupResponse>)> {
    let draft = ProductGroupDraft::try_from(payload)?;
    let created = state
        .catalog_service
        .create_product_group(&user, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_product_group_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
    Json(payload): Json<UpdateProductGroupRequest>,
) -> ApiResult<Json<ProductGroupResponse>> {
    let updated = state
        .catalog_service
        .update_product_group(&user, id, payload.into())
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_product_group_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    state.catalog_service.delete_product_group(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_items_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ItemListParams>,
) -> ApiResult<Json<PageResponse<ItemResponse>>> {
    let query = params.into_query()?;
    let page = state.catalog_service.list_items(&user, &query).await?;
    Ok(Json(page.into()))
}

pub async fn get_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<ItemResponse>> {
    let item = state.catalog_service.get_item(&user, id).await?;
    Ok(Json(item.into()))
}

pub async fn create_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse>)> {
    let draft = ItemDraft::try_from(payload)?;
    let created = state.catalog_service.create_item(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
    Json(payload): Json<UpdateItemRequest>,
) -> ApiResult<Json<ItemResponse>> {
    let updated = state
        .catalog_service
        .update_item(&user, id, payload.into())
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_item_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    state.catalog_service.delete_item(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
