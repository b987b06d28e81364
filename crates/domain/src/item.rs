use pharmadex_core::{AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::audit::AuditStamp;
use crate::schema::{IntRule, TextRule, validate_reference_id};

const CODE: TextRule = TextRule::new("item code", 64);
const NAME: TextRule = TextRule::new("item name", 200);
const DESCRIPTION: TextRule = TextRule::new("item description", 1000);
const UNIT_OF_MEASURE: TextRule = TextRule::new("unit of measure", 16);
const STRENGTH: TextRule = TextRule::new("strength", 64);
const SHELF_LIFE: IntRule = IntRule::new("shelf life months", 0, 600);

/// Item master record for one pharmaceutical material or product.
///
/// Type and group references are display-level links; referential integrity
/// is not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: RecordId,
    code: String,
    name: String,
    description: Option<String>,
    item_type_id: Option<RecordId>,
    product_group_id: Option<RecordId>,
    unit_of_measure: String,
    strength: Option<String>,
    shelf_life_months: Option<i64>,
    is_controlled: bool,
    is_active: bool,
    audit: AuditStamp,
}

/// Validated field values for a new item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    code: String,
    name: String,
    description: Option<String>,
    item_type_id: Option<RecordId>,
    product_group_id: Option<RecordId>,
    unit_of_measure: String,
    strength: Option<String>,
    shelf_life_months: Option<i64>,
    is_controlled: bool,
    is_active: bool,
}

impl ItemDraft {
    /// Validates field values for a new item.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        item_type_id: Option<RecordId>,
        product_group_id: Option<RecordId>,
        unit_of_measure: impl Into<String>,
        strength: Option<String>,
        shelf_life_months: Option<i64>,
        is_controlled: bool,
        is_active: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            code: CODE.require(code)?,
            name: NAME.require(name)?,
            description: DESCRIPTION.optional(description)?,
            item_type_id: item_type_id
                .map(|id| validate_reference_id("item type id", id))
                .transpose()?,
            product_group_id: product_group_id
                .map(|id| validate_reference_id("product group id", id))
                .transpose()?,
            unit_of_measure: UNIT_OF_MEASURE.require(unit_of_measure)?,
            strength: STRENGTH.optional(strength)?,
            shelf_life_months: SHELF_LIFE.optional(shelf_life_months)?,
            is_controlled,
            is_active,
        })
    }

    /// Returns the unique code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Partial update for an item; `None` preserves the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    /// New code, when provided.
    pub code: Option<String>,
    /// New display name, when provided.
    pub name: Option<String>,
    /// New description, when provided.
    pub description: Option<String>,
    /// New item type reference, when provided.
    pub item_type_id: Option<RecordId>,
    /// New product group reference, when provided.
    pub product_group_id: Option<RecordId>,
    /// New unit of measure, when provided.
    pub unit_of_measure: Option<String>,
    /// New strength, when provided.
    pub strength: Option<String>,
    /// New shelf life in months, when provided.
    pub shelf_life_months: Option<i64>,
    /// New controlled-substance flag, when provided.
    pub is_controlled: Option<bool>,
    /// New active flag, when provided.
    pub is_active: Option<bool>,
}

impl Item {
    /// Assembles an item from an identifier, validated draft, and audit
    /// stamp.
    #[must_use]
    pub fn new(id: RecordId, draft: ItemDraft, audit: AuditStamp) -> Self {
        Self {
            id,
            code: draft.code,
            name: draft.name,
            description: draft.description,
            item_type_id: draft.item_type_id,
            product_group_id: draft.product_group_id,
            unit_of_measure: draft.unit_of_measure,
            strength: draft.strength,
            shelf_life_months: draft.shelf_life_months,
            is_controlled: draft.is_controlled,
            is_active: draft.is_active,
            audit,
        }
    }

    /// Returns a copy with the update applied; unspecified fields keep
    /// their stored values.
    pub fn apply_update(&self, update: ItemUpdate, updated_by: Option<&str>) -> AppResult<Self> {
        let draft = ItemDraft::new(
            update.code.unwrap_or_else(|| self.code.clone()),
            update.name.unwrap_or_else(|| self.name.clone()),
            update.description.or_else(|| self.description.clone()),
            update.item_type_id.or(self.item_type_id),
            update.product_group_id.or(self.product_group_id),
            update
                .unit_of_measure
                .unwrap_or_else(|| self.unit_of_measure.clone()),
            update.strength.or_else(|| self.strength.clone()),
            update.shelf_life_months.or(self.shelf_life_months),
            update.is_controlled.unwrap_or(self.is_controlled),
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

    /// Returns the item type reference.
    #[must_use]
    pub fn item_type_id(&self) -> Option<RecordId> {
        self.item_type_id
    }

    /// Returns the product group reference.
    #[must_use]
    pub fn product_group_id(&self) -> Option<RecordId> {
        self.product_group_id
    }

    /// Returns the unit of measure.
    #[must_use]
    pub fn unit_of_measure(&self) -> &str {
        self.unit_of_measure.as_str()
    }

    /// Returns the strength designation, e.g. `500 mg`.
    #[must_use]
    pub fn strength(&self) -> Option<&str> {
        self.strength.as_deref()
    }

    /// Returns the shelf life in months.
    #[must_use]
    pub fn shelf_life_months(&self) -> Option<i64> {
        self.shelf_life_months
    }

    /// Returns whether the item is a controlled substance.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.is_controlled
    }

    /// Returns whether the item is active.
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

    use super::{Item, ItemDraft, ItemUpdate};

    fn paracetamol() -> Item {
        let draft = ItemDraft::new(
            "PARA-500",
            "Paracetamol 500mg",
            None,
            Some(1),
            Some(2),
            "TAB",
            Some("500 mg".to_owned()),
            Some(36),
            false,
            true,
        )
        .unwrap_or_else(|_| unreachable!());

        Item::new(10, draft, AuditStamp::created_now(Some("alice")))
    }

    #[test]
    fn draft_requires_unit_of_measure() {
        let draft = ItemDraft::new(
            "PARA-500",
            "Paracetamol",
            None,
            None,
            None,
            "",
            None,
            None,
            false,
            true,
        );
        assert!(draft.is_err());
    }

    #[test]
    fn draft_bounds_shelf_life() {
        let draft = ItemDraft::new(
            "PARA-500",
            "Paracetamol",
            None,
            None,
            None,
            "TAB",
            None,
            Some(601),
            false,
            true,
        );
        assert!(draft.is_err());
    }

    #[test]
    fn update_preserves_unspecified_optional_fields() {
        let item = paracetamol();
        let updated = item.apply_update(
            ItemUpdate {
                name: Some("Paracetamol 500mg Tablets".to_owned()),
                ..ItemUpdate::default()
            },
            Some("bob"),
        );

        assert!(updated.is_ok());
        let Ok(updated) = updated else { unreachable!() };
        assert_eq!(updated.strength(), Some("500 mg"));
        assert_eq!(updated.shelf_life_months(), Some(36));
        assert_eq!(updated.item_type_id(), Some(1));
        assert_eq!(updated.audit().created_by(), Some("alice"));
    }
}
