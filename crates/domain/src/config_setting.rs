use pharmadex_core::{AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::audit::AuditStamp;
use crate::schema::TextRule;

const KEY: TextRule = TextRule::new("setting key", 100);
const VALUE: TextRule = TextRule::new("setting value", 1000);
const DESCRIPTION: TextRule = TextRule::new("setting description", 500);

/// One keyed configuration entry from the administration console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSetting {
    id: RecordId,
    key: String,
    value: String,
    description: Option<String>,
    audit: AuditStamp,
}

/// Validated field values for a new configuration setting.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSettingDraft {
    key: String,
    value: String,
    description: Option<String>,
}

impl ConfigSettingDraft {
    /// Validates field values for a new configuration setting.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            key: KEY.require(key)?,
            value: VALUE.require(value)?,
            description: DESCRIPTION.optional(description)?,
        })
    }

    /// Returns the unique key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }
}

/// Partial update for a configuration setting; `None` preserves the stored
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSettingUpdate {
    /// New key, when provided.
    pub key: Option<String>,
    /// New value, when provided.
    pub value: Option<String>,
    /// New description, when provided.
    pub description: Option<String>,
}

impl ConfigSetting {
    /// Assembles a setting from an identifier, validated draft, and audit
    /// stamp.
    #[must_use]
    pub fn new(id: RecordId, draft: ConfigSettingDraft, audit: AuditStamp) -> Self {
        Self {
            id,
            key: draft.key,
            value: draft.value,
            description: draft.description,
            audit,
        }
    }

    /// Returns a copy with the update applied; unspecified fields keep
    /// their stored values.
    pub fn apply_update(
        &self,
        update: ConfigSettingUpdate,
        updated_by: Option<&str>,
    ) -> AppResult<Self> {
        let draft = ConfigSettingDraft::new(
            update.key.unwrap_or_else(|| self.key.clone()),
            update.value.unwrap_or_else(|| self.value.clone()),
            update.description.or_else(|| self.description.clone()),
        )?;

        Ok(Self::new(self.id, draft, self.audit.touched(updated_by)))
    }

    /// Returns the persistence-assigned identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the unique key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the stored value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the audit stamp.
    #[must_use]
    pub fn audit(&self) -> &AuditStamp {
        &self.audit
    }
}

#[cfg(test)]
mod tests {
    use crate::audit::AuditStamp;

    use super::{ConfigSetting, ConfigSettingDraft, ConfigSettingUpdate};

    #[test]
    fn draft_requires_key_and_value() {
        assert!(ConfigSettingDraft::new("", "14", None).is_err());
        assert!(ConfigSettingDraft::new("order.lead-days", " ", None).is_err());
    }

    #[test]
    fn update_replaces_only_provided_fields() {
        let draft = ConfigSettingDraft::new("order.lead-days", "14", Some("Default lead".to_owned()))
            .unwrap_or_else(|_| unreachable!());
        let setting = ConfigSetting::new(6, draft, AuditStamp::created_now(None));

        let updated = setting.apply_update(
            ConfigSettingUpdate {
                value: Some("21".to_owned()),
                ..ConfigSettingUpdate::default()
            },
            None,
        );

        assert!(updated.is_ok());
        let Ok(updated) = updated else { unreachable!() };
        assert_eq!(updated.key(), "order.lead-days");
        assert_eq!(updated.value(), "21");
        assert_eq!(updated.description(), Some("Default lead"));
    }
}
