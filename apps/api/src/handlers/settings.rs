use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use pharmadex_core::{RecordId, UserIdentity};
use pharmadex_domain::ConfigSettingDraft;

use crate::dto::{
    ConfigSettingListParams, ConfigSettingResponse, CreateConfigSettingRequest, PageResponse,
    UpdateConfigSettingRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_settings_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<ConfigSettingListParams>,
) -> ApiResult<Json<PageResponse<ConfigSettingResponse>>> {
    let query = params.into_query()?;
    let page = state.settings_service.list_settings(&user, &query).await?;
    Ok(Json(page.into()))
}

pub async fn get_setting_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<Json<ConfigSettingResponse>> {
    let setting = state.settings_service.get_setting(&user, id).await?;
    Ok(Json(setting.into()))
}

pub async fn create_setting_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateConfigSettingRequest>,
) -> ApiResult<(StatusCode, Json<ConfigSettingResponse>)> {
    let draft = ConfigSettingDraft::try_from(payload)?;
    let created = state.settings_service.create_setting(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_setting_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
    Json(payload): Json<UpdateConfigSettingRequest>,
) -> ApiResult<Json<ConfigSettingResponse>> {
    let updated = state
        .settings_service
        .update_setting(&user, id, payload.into())
        .await?;
    Ok(Json(updated.into()))
}

pub async fn delete_setting_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(id): Path<RecordId>,
) -> ApiResult<StatusCode> {
    state.settings_service.delete_setting(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
