use chrono::NaiveDate;
use pharmadex_core::{AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::audit::AuditStamp;
use crate::schema::{NumberRule, TextRule, validate_reference_id};

const ORDER_NUMBER: TextRule = TextRule::new("order number", 32);
const NOTES: TextRule = TextRule::new("order notes", 2000);
const TOTAL_AMOUNT: NumberRule = NumberRule::new("total amount", 0.0, 1_000_000_000.0);

/// Sales order header.
///
/// The customer reference is display-level only; orders carry no state
/// machine, and concurrent edits resolve as last write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrder {
    id: RecordId,
    order_number: String,
    customer_id: RecordId,
    order_date: NaiveDate,
    total_amount: Option<f64>,
    notes: Option<String>,
    audit: AuditStamp,
}

/// Validated field values for a new sales order.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesOrderDraft {
    order_number: String,
    customer_id: RecordId,
    order_date: NaiveDate,
    total_amount: Option<f64>,
    notes: Option<String>,
}

impl SalesOrderDraft {
    /// Validates field values for a new sales order.
    pub fn new(
        order_number: impl Into<String>,
        customer_id: RecordId,
        order_date: NaiveDate,
        total_amount: Option<f64>,
        notes: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            order_number: ORDER_NUMBER.require(order_number)?,
            customer_id: validate_reference_id("customer id", customer_id)?,
            order_date,
            total_amount: TOTAL_AMOUNT.optional(total_amount)?,
            notes: NOTES.optional(notes)?,
        })
    }

    /// Returns the unique order number.
    #[must_use]
    pub fn order_number(&self) -> &str {
        self.order_number.as_str()
    }
}

/// Partial update for a sales order; `None` preserves the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesOrderUpdate {
    /// New order number, when provided.
    pub order_number: Option<String>,
    /// New customer reference, when provided.
    pub customer_id: Option<RecordId>,
    /// New order date, when provided.
    pub order_date: Option<NaiveDate>,
    /// New total amount, when provided.
    pub total_amount: Option<f64>,
    /// New notes, when provided.
    pub notes: Option<String>,
}

impl SalesOrder {
    /// Assembles a sales order from an identifier, validated draft, and
    /// audit stamp.
    #[must_use]
    pub fn new(id: RecordId, draft: SalesOrderDraft, audit: AuditStamp) -> Self {
        Self {
            id,
            order_number: draft.order_number,
            customer_id: draft.customer_id,
            order_date: draft.order_date,
            total_amount: draft.total_amount,
            notes: draft.notes,
            audit,
        }
    }

    /// Returns a copy with the update applied; unspecified fields keep
    /// their stored values.
    pub fn apply_update(
        &self,
        update: SalesOrderUpdate,
        updated_by: Option<&str>,
    ) -> AppResult<Self> {
        let draft = SalesOrderDraft::new(
            update
                .order_number
                .unwrap_or_else(|| self.order_number.clone()),
            update.customer_id.unwrap_or(self.customer_id),
            update.order_date.unwrap_or(self.order_date),
            update.total_amount.or(self.total_amount),
            update.notes.or_else(|| self.notes.clone()),
        )?;

        Ok(Self::new(self.id, draft, self.audit.touched(updated_by)))
    }

    /// Returns the persistence-assigned identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the unique order number.
    #[must_use]
    pub fn order_number(&self) -> &str {
        self.order_number.as_str()
    }

    /// Returns the customer reference.
    #[must_use]
    pub fn customer_id(&self) -> RecordId {
        self.customer_id
    }

    /// Returns the order date.
    #[must_use]
    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }

    /// Returns the order total.
    #[must_use]
    pub fn total_amount(&self) -> Option<f64> {
        self.total_amount
    }

    /// Returns free-form notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the audit stamp.
    #[must_use]
    pub fn audit(&self) -> &AuditStamp {
        &self.audit
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::audit::AuditStamp;

    use super::{SalesOrder, SalesOrderDraft, SalesOrderUpdate};

    fn order_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap_or_default()
    }

    #[test]
    fn draft_requires_customer_reference() {
        assert!(SalesOrderDraft::new("SO-1001", 0, order_date(), None, None).is_err());
    }

    #[test]
    fn draft_rejects_negative_total() {
        assert!(SalesOrderDraft::new("SO-1001", 5, order_date(), Some(-10.0), None).is_err());
    }

    #[test]
    fn update_keeps_total_when_unspecified() {
        let draft = SalesOrderDraft::new("SO-1001", 5, order_date(), Some(120.5), None)
            .unwrap_or_else(|_| unreachable!());
        let order = SalesOrder::new(9, draft, AuditStamp::created_now(None));

        let updated = order.apply_update(
            SalesOrderUpdate {
                notes: Some("rush delivery".to_owned()),
                ..SalesOrderUpdate::default()
            },
            None,
        );

        assert!(updated.is_ok());
        let Ok(updated) = updated else { unreachable!() };
        assert_eq!(updated.total_amount(), Some(120.5));
        assert_eq!(updated.notes(), Some("rush delivery"));
    }
}
