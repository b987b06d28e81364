use pharmadex_core::{AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::audit::AuditStamp;
use crate::schema::{NumberRule, TextRule, validate_email, validate_reference_id};

const CODE: TextRule = TextRule::new("customer code", 32);
const NAME: TextRule = TextRule::new("customer name", 200);
const PHONE: TextRule = TextRule::new("customer phone", 32);
const CREDIT_LIMIT: NumberRule = NumberRule::new("credit limit", 0.0, 1_000_000_000.0);

const ADDRESS_LINE: TextRule = TextRule::new("address line", 200);
const CITY: TextRule = TextRule::new("city", 100);
const POSTAL_CODE: TextRule = TextRule::new("postal code", 20);
const COUNTRY: TextRule = TextRule::new("country", 100);

/// Customer master record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: RecordId,
    code: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    credit_limit: Option<f64>,
    is_active: bool,
    audit: AuditStamp,
}

/// Validated field values for a new customer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDraft {
    code: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    credit_limit: Option<f64>,
    is_active: bool,
}

impl CustomerDraft {
    /// Validates field values for a new customer.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
        credit_limit: Option<f64>,
        is_active: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            code: CODE.require(code)?,
            name: NAME.require(name)?,
            email: validate_email(email)?,
            phone: PHONE.optional(phone)?,
            credit_limit: CREDIT_LIMIT.optional(credit_limit)?,
            is_active,
        })
    }

    /// Returns the unique code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Partial update for a customer; `None` preserves the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerUpdate {
    /// New code, when provided.
    pub code: Option<String>,
    /// New display name, when provided.
    pub name: Option<String>,
    /// New email, when provided.
    pub email: Option<String>,
    /// New phone, when provided.
    pub phone: Option<String>,
    /// New credit limit, when provided.
    pub credit_limit: Option<f64>,
    /// New active flag, when provided.
    pub is_active: Option<bool>,
}

impl Customer {
    /// Assembles a customer from an identifier, validated draft, and audit
    /// stamp.
    #[must_use]
    pub fn new(id: RecordId, draft: CustomerDraft, audit: AuditStamp) -> Self {
        Self {
            id,
            code: draft.code,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            credit_limit: draft.credit_limit,
            is_active: draft.is_active,
            audit,
        }
    }

    /// Returns a copy with the update applied; unspecified fields keep
    /// their stored values.
    pub fn apply_update(
        &self,
        update: CustomerUpdate,
        updated_by: Option<&str>,
    ) -> AppResult<Self> {
        let draft = CustomerDraft::new(
            update.code.unwrap_or_else(|| self.code.clone()),
            update.name.unwrap_or_else(|| self.name.clone()),
            update.email.or_else(|| self.email.clone()),
            update.phone.or_else(|| self.phone.clone()),
            update.credit_limit.or(self.credit_limit),
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

    /// Returns the contact email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the contact phone.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the credit limit.
    #[must_use]
    pub fn credit_limit(&self) -> Option<f64> {
        self.credit_limit
    }

    /// Returns whether the customer is active.
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

/// Delivery or billing address nested under one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAddress {
    id: RecordId,
    customer_id: RecordId,
    line1: String,
    line2: Option<String>,
    city: String,
    postal_code: String,
    country: String,
    is_primary: bool,
    audit: AuditStamp,
}

/// Validated field values for a new customer address.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerAddressDraft {
    customer_id: RecordId,
    line1: String,
    line2: Option<String>,
    city: String,
    postal_code: String,
    country: String,
    is_primary: bool,
}

impl CustomerAddressDraft {
    /// Validates field values for a new customer address.
    pub fn new(
        customer_id: RecordId,
        line1: impl Into<String>,
        line2: Option<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
        is_primary: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            customer_id: validate_reference_id("customer id", customer_id)?,
            line1: ADDRESS_LINE.require(line1)?,
            line2: ADDRESS_LINE.optional(line2)?,
            city: CITY.require(city)?,
            postal_code: POSTAL_CODE.require(postal_code)?,
            country: COUNTRY.require(country)?,
            is_primary,
        })
    }

    /// Returns the owning customer reference.
    #[must_use]
    pub fn customer_id(&self) -> RecordId {
        self.customer_id
    }
}

/// Partial update for a customer address; `None` preserves the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerAddressUpdate {
    /// New first address line, when provided.
    pub line1: Option<String>,
    /// New second address line, when provided.
    pub line2: Option<String>,
    /// New city, when provided.
    pub city: Option<String>,
    /// New postal code, when provided.
    pub postal_code: Option<String>,
    /// New country, when provided.
    pub country: Option<String>,
    /// New primary flag, when provided.
    pub is_primary: Option<bool>,
}

impl CustomerAddress {
    /// Assembles an address from an identifier, validated draft, and audit
    /// stamp.
    #[must_use]
    pub fn new(id: RecordId, draft: CustomerAddressDraft, audit: AuditStamp) -> Self {
        Self {
            id,
            customer_id: draft.customer_id,
            line1: draft.line1,
            line2: draft.line2,
            city: draft.city,
            postal_code: draft.postal_code,
            country: draft.country,
            is_primary: draft.is_primary,
            audit,
        }
    }

    /// Returns a copy with the update applied; unspecified fields keep
    /// their stored values. The owning customer never changes.
    pub fn apply_update(
        &self,
        update: CustomerAddressUpdate,
        updated_by: Option<&str>,
    ) -> AppResult<Self> {
        let draft = CustomerAddressDraft::new(
            self.customer_id,
            update.line1.unwrap_or_else(|| self.line1.clone()),
            update.line2.or_else(|| self.line2.clone()),
            update.city.unwrap_or_else(|| self.city.clone()),
            update.postal_code.unwrap_or_else(|| self.postal_code.clone()),
            update.country.unwrap_or_else(|| self.country.clone()),
            update.is_primary.unwrap_or(self.is_primary),
        )?;

        Ok(Self::new(self.id, draft, self.audit.touched(updated_by)))
    }

    /// Returns the persistence-assigned identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the owning customer reference.
    #[must_use]
    pub fn customer_id(&self) -> RecordId {
        self.customer_id
    }

    /// Returns the first address line.
    #[must_use]
    pub fn line1(&self) -> &str {
        self.line1.as_str()
    }

    /// Returns the second address line.
    #[must_use]
    pub fn line2(&self) -> Option<&str> {
        self.line2.as_deref()
    }

    /// Returns the city.
    #[must_use]
    pub fn city(&self) -> &str {
        self.city.as_str()
    }

    /// Returns the postal code.
    #[must_use]
    pub fn postal_code(&self) -> &str {
        self.postal_code.as_str()
    }

    /// Returns the country.
    #[must_use]
    pub fn country(&self) -> &str {
        self.country.as_str()
    }

    /// Returns whether this is the primary address.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.is_primary
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

    use super::{
        Customer, CustomerAddress, CustomerAddressDraft, CustomerAddressUpdate, CustomerDraft,
        CustomerUpdate,
    };

    #[test]
    fn draft_rejects_negative_credit_limit() {
        let draft = CustomerDraft::new("CUST-01", "Acme Pharma", None, None, Some(-50.0), true);
        assert!(draft.is_err());
    }

    #[test]
    fn update_keeps_credit_limit_when_unspecified() {
        let draft = CustomerDraft::new("CUST-01", "Acme Pharma", None, None, Some(2500.0), true)
            .unwrap_or_else(|_| unreachable!());
        let customer = Customer::new(8, draft, AuditStamp::created_now(None));

        let updated = customer.apply_update(
            CustomerUpdate {
                is_active: Some(false),
                ..CustomerUpdate::default()
            },
            None,
        );

        assert!(updated.is_ok());
        let Ok(updated) = updated else { unreachable!() };
        assert_eq!(updated.credit_limit(), Some(2500.0));
        assert!(!updated.is_active());
    }

    #[test]
    fn address_requires_positive_customer_reference() {
        let draft = CustomerAddressDraft::new(0, "Main St 1", None, "Berlin", "10115", "DE", true);
        assert!(draft.is_err());
    }

    #[test]
    fn address_update_never_moves_between_customers() {
        let draft = CustomerAddressDraft::new(8, "Main St 1", None, "Berlin", "10115", "DE", true)
            .unwrap_or_else(|_| unreachable!());
        let address = CustomerAddress::new(2, draft, AuditStamp::created_now(None));

        let updated = address.apply_update(
            CustomerAddressUpdate {
                city: Some("Hamburg".to_owned()),
                ..CustomerAddressUpdate::default()
            },
            None,
        );

        assert!(updated.is_ok());
        let Ok(updated) = updated else { unreachable!() };
        assert_eq!(updated.customer_id(), 8);
        assert_eq!(updated.city(), "Hamburg");
        assert_eq!(updated.line1(), "Main St 1");
    }
}
