use async_trait::async_trait;
use pharmadex_core::{AppResult, RecordId};
use pharmadex_domain::{ConfigSetting, ConfigSettingDraft, ListQuery, Page};

/// Repository port for configuration settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Lists configuration settings for a query.
    async fn list_settings(&self, query: &ListQuery) -> AppResult<Page<ConfigSetting>>;

    /// Looks up one setting by identifier.
    async fn find_setting(&self, id: RecordId) -> AppResult<Option<ConfigSetting>>;

    /// Looks up one setting by its unique key.
    async fn find_setting_by_key(&self, key: &str) -> AppResult<Option<ConfigSetting>>;

    /// Persists a new setting.
    async fn create_setting(
        &self,
        draft: ConfigSettingDraft,
        created_by: Option<&str>,
    ) -> AppResult<ConfigSetting>;

    /// Replaces a stored setting with the provided state.
    async fn update_setting(&self, setting: ConfigSetting) -> AppResult<ConfigSetting>;

    /// Deletes one setting by identifier.
    async fn delete_setting(&self, id: RecordId) -> AppResult<()>;
}
