use pharmadex_core::{AppError, RecordId};
use pharmadex_domain::{
    ConfigSetting, ConfigSettingDraft, ConfigSettingUpdate, DEFAULT_PAGE_SIZE, ListQuery,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a configuration setting.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/config-setting-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSettingResponse {
    pub id: RecordId,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub created_at: String,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// Request payload for creating a configuration setting.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-config-setting-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigSettingRequest {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

/// Request payload for partially updating a configuration setting.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-config-setting-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigSettingRequest {
    pub key: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
}

/// Query parameters for listing configuration settings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSettingListParams {
    #[serde(alias = "pageNumber")]
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
}

impl ConfigSettingListParams {
    /// Builds the validated list query for this request.
    pub fn into_query(self) -> Result<ListQuery, AppError> {
        Ok(ListQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .with_search(self.search)
        .with_sort(self.sort_by, self.sort_descending.unwrap_or(false)))
    }
}

impl From<ConfigSetting> for ConfigSettingResponse {
    fn from(value: ConfigSetting) -> Self {
        Self {
            id: value.id(),
            key: value.key().to_owned(),
            value: value.value().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            created_at: value.audit().created_at().to_rfc3339(),
            created_by: value.audit().created_by().map(ToOwned::to_owned),
            updated_at: value.audit().updated_at().map(|at| at.to_rfc3339()),
            updated_by: value.audit().updated_by().map(ToOwned::to_owned),
        }
    }
}

impl TryFrom<CreateConfigSettingRequest> for ConfigSettingDraft {
    type Error = AppError;

    fn try_from(value: CreateConfigSettingRequest) -> Result<Self, Self::Error> {
        Self::new(value.key, value.value, value.description)
    }
}

impl From<UpdateConfigSettingRequest> for ConfigSettingUpdate {
    fn from(value: UpdateConfigSettingRequest) -> Self {
        Self {
            key: value.key,
            value: value.value,
            description: value.description,
        }
    }
}
