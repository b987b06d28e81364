use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use pharmadex_core::{RecordId, UserIdentity};
use pharmadex_domain::{RoleDraft, RoleUpdate};

use crate::dto::{
    CreateRoleRequest, PageResponse, RoleListParams, RoleResponse, UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<RoleListParams>,
) -> ApiResult<Json<PageResponse<RoleResponse>>> {
    let query = params.into_query()?;
    let page = state
        .security_admin_service
        .list_roles(&user, &query)
        .await?;
    Ok(Json(page.into()))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state.security_admin_service.get_role(&user, id).await?;
    Ok(Json(role.into()))
}

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<String>>> {
    let permissions = state
        .security_admin_service
        .list_permissions(&user)
        .await?
        .iter()
        .map(|permission| permission.as_str().to_owned())
        .collect();
    Ok(Json(permissions))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let draft = RoleDraft::try_from(payload)?;
    let created = state
        .security_admin_service
        .create_role(&user, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let update = RoleUpdate::try_from(payload)?;
    let updated = state
        .security_admin_service
        .update_role(&user, id, update)
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    state.security_admin_service.delete_role(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
