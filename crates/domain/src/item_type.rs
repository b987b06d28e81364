use pharmadex_core::{AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::audit::AuditStamp;
use crate::schema::{TextRule, validate_reference_id};

const CODE: TextRule = TextRule::new("item type code", 32);
const NAME: TextRule = TextRule::new("item type name", 200);
const DESCRIPTION: TextRule = TextRule::new("item type description", 500);

/// Classification entry for items, e.g. raw material or finished good.
///
/// `parent_type_id` forms a shallow, non-enforced hierarchy; no cycle or
/// depth check is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    id: RecordId,
    code: String,
    name: String,
    description: Option<String>,
    parent_type_id: Option<RecordId>,
    is_active: bool,
    audit: AuditStamp,
}

/// Validated field values for a new item type.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTypeDraft {
    code: String,
    name: String,
    description: Option<String>,
    parent_type_id: Option<RecordId>,
    is_active: bool,
}

impl ItemTypeDraft {
    /// Validates field values for a new item type.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        parent_type_id: Option<RecordId>,
        is_active: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            code: CODE.require(code)?,
            name: NAME.require(name)?,
            description: DESCRIPTION.optional(description)?,
            parent_type_id: parent_type_id
                .map(|id| validate_reference_id("parent type id", id))
                .transpose()?,
            is_active,
        })
    }

    /// Returns the unique code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Partial update for an item type; `None` preserves the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTypeUpdate {
    /// New code, when provided.
    pub code: Option<String>,
    /// New display name, when provided.
    pub name: Option<String>,
    /// New description, when provided.
    pub description: Option<String>,
    /// New parent reference, when provided.
    pub parent_type_id: Option<RecordId>,
    /// New active flag, when provided.
    pub is_active: Option<bool>,
}

impl ItemType {
    /// Assembles an item type from an identifier, validated draft, and audit
    /// stamp.
    #[must_use]
    pub fn new(id: RecordId, draft: ItemTypeDraft, audit: AuditStamp) -> Self {
        Self {
            id,
            code: draft.code,
            name: draft.name,
            description: draft.description,
            parent_type_id: draft.parent_type_id,
            is_active: draft.is_active,
            audit,
        }
    }

    /// Returns a copy with the update applied.
    ///
    /// Unspecified fields keep their stored values; the identifier and
    /// creation attribution are never overwritten.
    pub fn apply_update(
        &self,
        update: ItemTypeUpdate,
        updated_by: Option<&str>,
    ) -> AppResult<Self> {
        let draft = ItemTypeDraft::new(
            update.code.unwrap_or_else(|| self.code.clone()),
            update.name.unwrap_or_else(|| self.name.clone()),
            update.description.or_else(|| self.description.clone()),
            update.parent_type_id.or(self.parent_type_id),
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

    /// Returns the parent type reference.
    #[must_use]
    pub fn parent_type_id(&self) -> Option<RecordId> {
        self.parent_type_id
    }

    /// Returns whether the item type is active.
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

    use super::{ItemType, ItemTypeDraft, ItemTypeUpdate};

    fn raw_material() -> ItemType {
        let draft = ItemTypeDraft::new("RM", "Raw Material", None, None, true)
            .unwrap_or_else(|_| unreachable!());
        ItemType::new(1, draft, AuditStamp::created_now(Some("alice")))
    }

    #[test]
    fn draft_requires_code_and_name() {
        assert!(ItemTypeDraft::new("", "Raw Material", None, None, true).is_err());
        assert!(ItemTypeDraft::new("RM", " ", None, None, true).is_err());
    }

    #[test]
    fn draft_rejects_non_positive_parent_reference() {
        assert!(ItemTypeDraft::new("RM", "Raw Material", None, Some(0), true).is_err());
    }

    #[test]
    fn update_preserves_unspecified_fields() {
        let item_type = raw_material();
        let updated = item_type.apply_update(
            ItemTypeUpdate {
                is_active: Some(false),
                ..ItemTypeUpdate::default()
            },
            Some("bob"),
        );

        assert!(updated.is_ok());
        let Ok(updated) = updated else { unreachable!() };
        assert_eq!(updated.code(), "RM");
        assert_eq!(updated.name(), "Raw Material");
        assert!(!updated.is_active());
        assert_eq!(updated.audit().created_by(), Some("alice"));
        assert_eq!(updated.audit().updated_by(), Some("bob"));
    }

    #[test]
    fn update_never_moves_the_identifier() {
        let item_type = raw_material();
        let updated = item_type.apply_update(
            ItemTypeUpdate {
                code: Some("FG".to_owned()),
                ..ItemTypeUpdate::default()
            },
            None,
        );

        assert!(updated.is_ok());
        assert_eq!(updated.map(|value| value.id()).unwrap_or_default(), 1);
    }

    #[test]
    fn update_revalidates_through_field_rules() {
        let item_type = raw_material();
        let updated = item_type.apply_update(
            ItemTypeUpdate {
                code: Some("  ".to_owned()),
                ..ItemTypeUpdate::default()
            },
            None,
        );
        assert!(updated.is_err());
    }
}
