use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation and last-update attribution carried by every persisted entity.
///
/// Creator and updater subjects are display-only references to a user; no
/// referential check is enforced on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

impl AuditStamp {
    /// Creates a stamp for a freshly created entity.
    #[must_use]
    pub fn created_now(created_by: Option<&str>) -> Self {
        Self {
            created_at: Utc::now(),
            created_by: created_by.map(str::to_owned),
            updated_at: None,
            updated_by: None,
        }
    }

    /// Restores a stamp from stored values.
    #[must_use]
    pub fn from_parts(
        created_at: DateTime<Utc>,
        created_by: Option<String>,
        updated_at: Option<DateTime<Utc>>,
        updated_by: Option<String>,
    ) -> Self {
        Self {
            created_at,
            created_by,
            updated_at,
            updated_by,
        }
    }

    /// Returns a stamp with the update attribution set and creation
    /// attribution preserved unchanged.
    #[must_use]
    pub fn touched(&self, updated_by: Option<&str>) -> Self {
        Self {
            created_at: self.created_at,
            created_by: self.created_by.clone(),
            updated_at: Some(Utc::now()),
            updated_by: updated_by.map(str::to_owned),
        }
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the creator subject, if recorded.
    #[must_use]
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Returns the last-update timestamp, if the entity was ever updated.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the last updater subject, if recorded.
    #[must_use]
    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::AuditStamp;

    #[test]
    fn touched_preserves_creation_attribution() {
        let stamp = AuditStamp::created_now(Some("alice"));
        let touched = stamp.touched(Some("bob"));

        assert_eq!(touched.created_at(), stamp.created_at());
        assert_eq!(touched.created_by(), Some("alice"));
        assert_eq!(touched.updated_by(), Some("bob"));
        assert!(touched.updated_at().is_some());
    }

    #[test]
    fn fresh_stamp_has_no_update_attribution() {
        let stamp = AuditStamp::created_now(None);
        assert!(stamp.updated_at().is_none());
        assert!(stamp.updated_by().is_none());
    }
}
