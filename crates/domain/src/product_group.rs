use pharmadex_core::{AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::audit::AuditStamp;
use crate::schema::TextRule;

const CODE: TextRule = TextRule::new("product group code", 32);
const NAME: TextRule = TextRule::new("product group name", 200);
const DESCRIPTION: TextRule = TextRule::new("product group description", 500);

/// Commercial grouping for items, e.g. antibiotics or analgesics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    id: RecordId,
    code: String,
    name: String,
    description: Option<String>,
    is_active: bool,
    audit: AuditStamp,
}

/// Validated field values for a new product group.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductGroupDraft {
    code: String,
    name: String,
    description: Option<String>,
    is_active: bool,
}

impl ProductGroupDraft {
    /// Validates field values for a new product group.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        is_active: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            code: CODE.require(code)?,
            name: NAME.require(name)?,
            description: DESCRIPTION.optional(description)?,
            is_active,
        })
    }

    /// Returns the unique code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Partial update for a product group; `None` preserves the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductGroupUpdate {
    /// New code, when provided.
    pub code: Option<String>,
    /// New display name, when provided.
    pub name: Option<String>,
    /// New description, when provided.
    pub description: Option<String>,
    /// New active flag, when provided.
    pub is_active: Option<bool>,
}

impl ProductGroup {
    /// Assembles a product group from an identifier, validated draft, and
    /// audit stamp.
    #[must_use]
    pub fn new(id: RecordId, draft: ProductGroupDraft, audit: AuditStamp) -> Self {
        Self {
            id,
            code: draft.code,
            name: draft.name,
            description: draft.description,
            is_active: draft.is_active,
            audit,
        }
    }

    /// Returns a copy with the update applied; unspecified fields keep
    /// their stored values.
    pub fn apply_update(
        &self,
        update: ProductGroupUpdate,
        updated_by: Option<&str>,
    ) -> AppResult<Self> {
        let draft = ProductGroupDraft::new(
            update.code.unwrap_or_else(|| self.code.clone()),
            update.name.unwrap_or_else(|| self.name.clone()),
            update.description.or_else(|| self.description.clone()),
            update.is_active.unwrap_or(self.is_active),
        )?;

        Ok(Self::new(self.id, draft, self.audit.touched(updated_by)))
    }

    /// Returns the persistence-assigned identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the unique code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the product group is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
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

    use super::{ProductGroup, ProductGroupDraft, ProductGroupUpdate};

    #[test]
    fn draft_requires_code() {
        assert!(ProductGroupDraft::new("", "Antibiotics", None, true).is_err());
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let draft = ProductGroupDraft::new("ABX", "Antibiotics", Some("Systemic".to_owned()), true)
            .unwrap_or_else(|_| unreachable!());
        let group = ProductGroup::new(4, draft, AuditStamp::created_now(None));

        let updated = group.apply_update(
            ProductGroupUpdate {
                name: Some("Antibiotics (systemic)".to_owned()),
                ..ProductGroupUpdate::default()
            },
            None,
        );

        assert!(updated.is_ok());
        let Ok(updated) = updated else { unreachable!() };
        assert_eq!(updated.code(), "ABX");
        assert_eq!(updated.name(), "Antibiotics (systemic)");
        assert_eq!(updated.description(), Some("Systemic"));
    }
}
