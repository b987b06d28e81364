use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use pharmadex_application::SettingsRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{AuditStamp, ConfigSetting, ConfigSettingDraft, ListQuery, Page};

use crate::postgres_list_helpers::{conflict_on_unique, internal, sort_direction};

/// PostgreSQL-backed configuration setting repository.
#[derive(Clone)]
pub struct PostgresSettingsRepository {
    pool: PgPool,
}

impl PostgresSettingsRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ConfigSettingRow {
    id: i64,
    key: String,
    value: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

impl TryFrom<ConfigSettingRow> for ConfigSetting {
    type Error = AppError;

    fn try_from(row: ConfigSettingRow) -> Result<Self, Self::Error> {
        let draft =
            ConfigSettingDraft::new(row.key, row.value, row.description).map_err(|error| {
                AppError::Internal(format!("stored setting {} is invalid: {error}", row.id))
            })?;

        Ok(Self::new(
            row.id,
            draft,
            AuditStamp::from_parts(row.created_at, row.created_by, row.updated_at, row.updated_by),
        ))
    }
}

const SETTING_COLUMNS: &str =
    "id, key, value, description, created_at, created_by, updated_at, updated_by";

fn setting_sort_column(sort_by: Option<&str>) -> AppResult<&'static str> {
    match sort_by.unwrap_or("key") {
        "key" => Ok("key"),
        "createdAt" => Ok("created_at"),
        other => Err(AppError::Validation(format!(
            "unsupported sort field '{other}'"
        ))),
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepository {
    async fn list_settings(&self, query: &ListQuery) -> AppResult<Page<ConfigSetting>> {
        let column = setting_sort_column(query.sort_by())?;
        let direction = sort_direction(query.sort_descending());

        let where_clause =
            "WHERE ($1::text IS NULL OR key ILIKE '%' || $1 || '%' OR value ILIKE '%' || $1 || '%')";

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM config_settings {where_clause}"
        ))
        .bind(query.search())
        .fetch_one(&self.pool)
        .await
        .map_err(internal("failed to count settings"))?;

        let rows = sqlx::query_as::<_, ConfigSettingRow>(&format!(
            "SELECT {SETTING_COLUMNS} FROM config_settings {where_clause} \
             ORDER BY {column} {direction}, id LIMIT $2 OFFSET $3"
        ))
        .bind(query.search())
        .bind(query.limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to list settings"))?;

        let items = rows
            .into_iter()
            .map(ConfigSetting::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(items, total_count as u64, query.page_size()))
    }

    async fn find_setting(&self, id: RecordId) -> AppResult<Option<ConfigSetting>> {
        let row = sqlx::query_as::<_, ConfigSettingRow>(&format!(
            "SELECT {SETTING_COLUMNS} FROM config_settings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load setting"))?;

        row.map(ConfigSetting::try_from).transpose()
    }

    async fn find_setting_by_key(&self, key: &str) -> AppResult<Option<ConfigSetting>> {
        let row = sqlx::query_as::<_, ConfigSettingRow>(&format!(
            "SELECT {SETTING_COLUMNS} FROM config_settings WHERE key = $1 LIMIT 1"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load setting"))?;

        row.map(ConfigSetting::try_from).transpose()
    }

    async fn create_setting(
        &self,
        draft: ConfigSettingDraft,
        created_by: Option<&str>,
    ) -> AppResult<ConfigSetting> {
        let staged = ConfigSetting::new(0, draft, AuditStamp::created_now(created_by));
        let conflict = format!("setting key '{}' is already taken", staged.key());

        let row = sqlx::query_as::<_, ConfigSettingRow>(&format!(
            "INSERT INTO config_settings (key, value, description, created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SETTING_COLUMNS}"
        ))
        .bind(staged.key())
        .bind(staged.value())
        .bind(staged.description())
        .bind(staged.audit().created_at())
        .bind(staged.audit().created_by())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to create setting"))?;

        ConfigSetting::try_from(row)
    }

    async fn update_setting(&self, setting: ConfigSetting) -> AppResult<ConfigSetting> {
        let conflict = format!("setting key '{}' is already taken", setting.key());

        let row = sqlx::query_as::<_, ConfigSettingRow>(&format!(
            "UPDATE config_settings \
             SET key = $2, value = $3, description = $4, updated_at = $5, updated_by = $6 \
             WHERE id = $1 \
             RETURNING {SETTING_COLUMNS}"
        ))
        .bind(setting.id())
        .bind(setting.key())
        .bind(setting.value())
        .bind(setting.description())
        .bind(setting.audit().updated_at())
        .bind(setting.audit().updated_by())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to update setting"))?
        .ok_or_else(|| {
            AppError::NotFound(format!("setting {} does not exist", setting.id()))
        })?;

        ConfigSetting::try_from(row)
    }

    async fn delete_setting(&self, id: RecordId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM config_settings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("failed to delete setting"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("setting {id} does not exist")));
        }

        Ok(())
    }
}
