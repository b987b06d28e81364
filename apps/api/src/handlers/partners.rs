use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use pharmadex_core::{RecordId, UserIdentity};
use pharmadex_domain::{CustomerDraft, OrganizationDraft};

use crate::dto::{
    CreateCustomerAddressRequest, CreateCustomerRequest, CreateOrganizationRequest,
    CustomerAddressListParams, CustomerAddressResponse, CustomerResponse, OrganizationResponse,
    PageResponse, PartnerListParams, UpdateCustomerAddressRequest, UpdateCustomerRequest,
    UpdateOrganizationRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_organizations_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<PartnerListParams>,
) -> ApiResult<Json<PageResponse<OrganizationResponse>>> {
    let query = params.into_query()?;
    let page = state
        .partner_service
        .list_organizations(&user, &query)
        .await?;
    Ok(Json(page.into()))
}

pub async fn get_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = state.partner_service.get_organization(&user, id).await?;
    Ok(Json(organization.into()))
}

pub async fn create_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<OrganizationResponse>)> {
    let draft = OrganizationDraft::try_from(payload)?;
    let created = state
        .partner_service
        .create_organization(&user, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> ApiResult<Json<OrganizationResponse>> {
    let updated = state
        .partner_service
        .update_organization(&user, id, payload.into())
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_organization_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    state.partner_service.delete_organization(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_customers_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<PartnerListParams>,
) -> ApiResult<Json<PageResponse<CustomerResponse>>> {
    let query = params.into_query()?;
    let page = state.partner_service.list_customers(&user, &query).await?;
    Ok(Json(page.into()))
}

pub async fn get_customer_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<CustomerResponse>> {
    let customer = state.partner_service.get_customer(&user, id).await?;
    Ok(Json(customer.into()))
}

pub async fn create_customer_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<CustomerResponse>)> {
    let draft = CustomerDraft::try_from(payload)?;
    let created = state.partner_service.create_customer(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_customer_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> ApiResult<Json<CustomerResponse>> {
    let updated = state
        .partner_service
        .update_customer(&user, id, payload.into())
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    state.partner_service.delete_customer(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_customer_addresses_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(customer_id): Path<RecordId>,
    Query(params): Query<CustomerAddressListParams>,
) -> ApiResult<Json<PageResponse<CustomerAddressResponse>>> {
    let query = params.into_query()?;
    let page = state
        .partner_service
        .list_customer_addresses(&user, customer_id, &query)
        .await?;
    Ok(Json(page.into()))
}

pub async fn get_customer_address_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((customer_id, address_id)): Path<(RecordId, RecordId)>,
) -> ApiResult<Json<CustomerAddressResponse>> {
    let address = state
        .partner_service
        .get_customer_address(&user, customer_id, address_id)
        .await?;
    Ok(Json(address.into()))
}

pub async fn create_customer_address_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(customer_id): Path<RecordId>,
    Json(payload): Json<CreateCustomerAddressRequest>,
) -> ApiResult<(StatusCode, Json<CustomerAddressResponse>)> {
    let draft = payload.into_draft(customer_id)?;
    let created = state
        .partner_service
        .create_customer_address(&user, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_customer_address_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((customer_id, address_id)): Path<(RecordId, RecordId)>,
    Json(payload): Json<UpdateCustomerAddressRequest>,
) -> ApiResult<Json<CustomerAddressResponse>> {
    let updated = state
        .partner_service
        .update_customer_address(&user, customer_id, address_id, payload.into())
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_customer_address_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((customer_id, address_id)): Path<(RecordId, RecordId)>,
) -> ApiResult<StatusCode> {
    state
        .partner_service
        .delete_customer_address(&user, customer_id, address_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
