use std::collections::HashMap;

use async_trait::async_trait;
use pharmadex_application::SettingsRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{AuditStamp, ConfigSetting, ConfigSettingDraft, ListQuery, Page, paginate};
use tokio::sync::RwLock;

#[derive(Default)]
struct SettingsState {
    settings: HashMap<RecordId, ConfigSetting>,
    next_id: RecordId,
}

/// In-memory configuration setting adapter used by tests and local tooling.
#[derive(Default)]
pub struct InMemorySettingsRepository {
    state: RwLock<SettingsState>,
}

impl InMemorySettingsRepository {
    /// Creates an empty settings store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(search: Option<&str>, setting: &ConfigSetting) -> bool {
    let Some(term) = search else {
        return true;
    };
    let term = term.to_lowercase();

    setting.key().to_lowercase().contains(&term)
        || setting.value().to_lowercase().contains(&term)
}

fn sort_settings(rows: &mut [ConfigSetting], query: &ListQuery) -> AppResult<()> {
    match query.sort_by().unwrap_or("key") {
        "key" => rows.sort_by(|left, right| left.key().cmp(right.key())),
        "createdAt" => rows.sort_by_key(|row| row.audit().created_at()),
        other => {
            return Err(AppError::Validation(format!(
                "unsupported sort field '{other}'"
            )));
        }
    }
    if query.sort_descending() {
        rows.reverse();
    }

    Ok(())
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn list_settings(&self, query: &ListQuery) -> AppResult<Page<ConfigSetting>> {
        let state = self.state.read().await;
        let mut rows = state
            .settings
            .values()
            .filter(|row| matches_search(query.search(), row))
            .cloned()
            .collect::<Vec<_>>();
        drop(state);

        sort_settings(&mut rows, query)?;
        Ok(paginate(rows, query))
    }

    async fn find_setting(&self, id: RecordId) -> AppResult<Option<ConfigSetting>> {
        Ok(self.state.read().await.settings.get(&id).cloned())
    }

    async fn find_setting_by_key(&self, key: &str) -> AppResult<Option<ConfigSetting>> {
        Ok(self
            .state
            .read()
            .await
            .settings
            .values()
            .find(|row| row.key() == key)
            .cloned())
    }

    async fn create_setting(
        &self,
        draft: ConfigSettingDraft,
        created_by: Option<&str>,
    ) -> AppResult<ConfigSetting> {
        let mut state = self.state.write().await;
        if state.settings.values().any(|row| row.key() == draft.key()) {
            return Err(AppError::Conflict(format!(
                "setting key '{}' is already taken",
                draft.key()
            )));
        }

        state.next_id += 1;
        let id = state.next_id;
        let created = ConfigSetting::new(id, draft, AuditStamp::created_now(created_by));
        state.settings.insert(id, created.clone());
        Ok(created)
    }

    async fn update_setting(&self, setting: ConfigSetting) -> AppResult<ConfigSetting> {
        let mut state = self.state.write().await;
        if !state.settings.contains_key(&setting.id()) {
            return Err(AppError::NotFound(format!(
                "setting {} does not exist",
                setting.id()
            )));
        }
        if state
            .settings
            .values()
            .any(|row| row.id() != setting.id() && row.key() == setting.key())
        {
            return Err(AppError::Conflict(format!(
                "setting key '{}' is already taken",
                setting.key()
            )));
        }

        state.settings.insert(setting.id(), setting.clone());
        Ok(setting)
    }

    async fn delete_setting(&self, id: RecordId) -> AppResult<()> {
        if self.state.write().await.settings.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("setting {id} does not exist")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pharmadex_application::SettingsRepository;
    use pharmadex_domain::{ConfigSettingDraft, ListQuery};

    use super::InMemorySettingsRepository;

    fn setting_draft(key: &str, value: &str) -> ConfigSettingDraft {
        ConfigSettingDraft::new(key, value, None).unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn keys_are_unique() {
        let repository = InMemorySettingsRepository::new();

        let first = repository
            .create_setting(setting_draft("orders.default_currency", "EUR"), None)
            .await;
        assert!(first.is_ok());

        let duplicate = repository
            .create_setting(setting_draft("orders.default_currency", "USD"), None)
            .await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn search_covers_keys_and_values() {
        let repository = InMemorySettingsRepository::new();
        for (key, value) in [
            ("orders.default_currency", "EUR"),
            ("catalog.default_uom", "TAB"),
        ] {
            let created = repository.create_setting(setting_draft(key, value), None).await;
            assert!(created.is_ok());
        }

        let listed = ListQuery::new(1, 25)
            .map(|query| query.with_search(Some("eur".to_owned())))
            .unwrap_or_else(|_| unreachable!());
        let page = repository.list_settings(&listed).await;
        assert!(page.is_ok());
        let Ok(page) = page else { unreachable!() };
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].key(), "orders.default_currency");
    }
}
