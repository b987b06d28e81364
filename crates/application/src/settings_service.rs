use std::sync::Arc;

use pharmadex_core::{AppError, AppResult, RecordId, UserIdentity};
use pharmadex_domain::{
    ConfigSetting, ConfigSettingDraft, ConfigSettingUpdate, ListQuery, Page, Permission,
};

use crate::access::AccessPolicy;
use crate::ports::{CacheScope, ListCache, SettingsRepository, read_cached_page, write_cached_page};

/// Use cases for configuration settings.
#[derive(Clone)]
pub struct SettingsService {
    repository: Arc<dyn SettingsRepository>,
    cache: Arc<dyn ListCache>,
    access: AccessPolicy,
}

impl SettingsService {
    /// Creates the service over its repository, cache, and access policy.
    #[must_use]
    pub fn new(
        repository: Arc<dyn SettingsRepository>,
        cache: Arc<dyn ListCache>,
        access: AccessPolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            access,
        }
    }

    /// Lists configuration settings for a query.
    pub async fn list_settings(
        &self,
        user: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<Page<ConfigSetting>> {
        self.access.require(user, Permission::SettingsRead).await?;

        let key = query.cache_key();
        if let Some(page) =
            read_cached_page(self.cache.as_ref(), CacheScope::ConfigSettings, &key).await?
        {
            return Ok(page);
        }

        let page = self.repository.list_settings(query).await?;
        write_cached_page(self.cache.as_ref(), CacheScope::ConfigSettings, key, &page).await?;
        Ok(page)
    }

    /// Fetches one setting.
    pub async fn get_setting(&self, user: &UserIdentity, id: RecordId) -> AppResult<ConfigSetting> {
        self.access.require(user, Permission::SettingsRead).await?;
        self.repository
            .find_setting(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("setting {id} does not exist")))
    }

    /// Creates a setting with a unique key.
    pub async fn create_setting(
        &self,
        user: &UserIdentity,
        draft: ConfigSettingDraft,
    ) -> AppResult<ConfigSetting> {
        self.access.require(user, Permission::SettingsWrite).await?;

        if let Some(existing) = self.repository.find_setting_by_key(draft.key()).await? {
            return Err(AppError::Conflict(format!(
                "setting key '{}' is already taken",
                existing.key()
            )));
        }

        let created = self
            .repository
            .create_setting(draft, Some(user.subject()))
            .await?;
        self.cache.invalidate(CacheScope::ConfigSettings).await?;
        Ok(created)
    }

    /// Applies a partial update to a setting.
    pub async fn update_setting(
        &self,
        user: &UserIdentity,
        id: RecordId,
        update: ConfigSettingUpdate,
    ) -> AppResult<ConfigSetting> {
        self.access.require(user, Permission::SettingsWrite).await?;

        let stored = self
            .repository
            .find_setting(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("setting {id} does not exist")))?;
        let updated = stored.apply_update(update, Some(user.subject()))?;

        // A key rename must not collide with another setting.
        if updated.key() != stored.key()
            && let Some(existing) = self.repository.find_setting_by_key(updated.key()).await?
            && existing.id() != id
        {
            return Err(AppError::Conflict(format!(
                "setting key '{}' is already taken",
                existing.key()
            )));
        }

        let saved = self.repository.update_setting(updated).await?;
        self.cache.invalidate(CacheScope::ConfigSettings).await?;
        Ok(saved)
    }

    /// Deletes a setting.
    pub async fn delete_setting(&self, user: &UserIdentity, id: RecordId) -> AppResult<()> {
        self.access.require(user, Permission::SettingsWrite).await?;

        self.repository.delete_setting(id).await?;
        self.cache.invalidate(CacheScope::ConfigSettings).await
    }
}
