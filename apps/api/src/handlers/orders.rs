use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use pharmadex_core::{RecordId, UserIdentity};
use pharmadex_domain::{SalesOrderDraft, SalesOrderUpdate};

use crate::dto::{
    CreateSalesOrderRequest, PageResponse, SalesOrderListParams, SalesOrderResponse,
    UpdateSalesOrderRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_sales_orders_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<SalesOrderListParams>,
) -> ApiResult<Json<PageResponse<SalesOrderResponse>>> {
    let query = params.into_query()?;
    let page = state.order_service.list_sales_orders(&user, &query).await?;
    Ok(Json(page.into()))
}

pub async fn get_sales_order_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<SalesOrderResponse>> {
    let order = state.order_service.get_sales_order(&user, id).await?;
    Ok(Json(order.into()))
}

pub async fn create_sales_order_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateSalesOrderRequest>,
) -> ApiResult<(StatusCode, Json<SalesOrderResponse>)> {
    let draft = SalesOrderDraft::try_from(payload)?;
    let created = state.order_service.create_sales_order(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_sales_order_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
    Json(payload): Json<UpdateSalesOrderRequest>,
) -> ApiResult<Json<SalesOrderResponse>> {
    let update = SalesOrderUpdate::try_from(payload)?;
    let updated = state
        .order_service
        .update_sales_order(&user, id, update)
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_sales_order_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    state.order_service.delete_sales_order(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
