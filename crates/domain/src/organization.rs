use pharmadex_core::{AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::audit::AuditStamp;
use crate::schema::{TextRule, validate_email};

const CODE: TextRule = TextRule::new("organization code", 32);
const NAME: TextRule = TextRule::new("organization name", 200);
const PHONE: TextRule = TextRule::new("organization phone", 32);

/// Internal or partner organization, e.g. a site or supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    id: RecordId,
    code: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    is_active: bool,
    audit: AuditStamp,
}

/// Validated field values for a new organization.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationDraft {
    code: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    is_active: bool,
}

impl OrganizationDraft {
    /// Validates field values for a new organization.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
        is_active: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            code: CODE.require(code)?,
            name: NAME.require(name)?,
            email: validate_email(email)?,
            phone: PHONE.optional(phone)?,
            is_active,
        })
    }

    /// Returns the unique code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Partial update for an organization; `None` preserves the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationUpdate {
    /// New code, when provided.
    pub code: Option<String>,
    /// New display name, when provided.
    pub name: Option<String>,
    /// New email, when provided.
    pub email: Option<String>,
    /// New phone, when provided.
    pub phone: Option<String>,
    /// New active flag, when provided.
    pub is_active: Option<bool>,
}

impl Organization {
    /// Assembles an organization from an identifier, validated draft, and
    /// audit stamp.
    #[must_use]
    pub fn new(id: RecordId, draft: OrganizationDraft, audit: AuditStamp) -> Self {
        Self {
            id,
            code: draft.code,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            is_active: draft.is_active,
            audit,
        }
    }

    /// Returns a copy with the update applied; unspecified fields keep
    /// their stored values.
    pub fn apply_update(
        &self,
        update: OrganizationUpdate,
        updated_by: Option<&str>,
    ) -> AppResult<Self> {
        let draft = OrganizationDraft::new(
            update.code.unwrap_or_else(|| self.code.clone()),
            update.name.unwrap_or_else(|| self.name.clone()),
            update.email.or_else(|| self.email.clone()),
            update.phone.or_else(|| self.phone.clone()),
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

    /// Returns whether the organization is active.
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

    use super::{Organization, OrganizationDraft, OrganizationUpdate};

    #[test]
    fn draft_rejects_malformed_email() {
        let draft = OrganizationDraft::new(
            "SITE-01",
            "Berlin Plant",
            Some("not-an-address".to_owned()),
            None,
            true,
        );
        assert!(draft.is_err());
    }

    #[test]
    fn update_keeps_contact_details_when_unspecified() {
        let draft = OrganizationDraft::new(
            "SITE-01",
            "Berlin Plant",
            Some("plant@pharma.example".to_owned()),
            Some("+49 30 1234".to_owned()),
            true,
        )
        .unwrap_or_else(|_| unreachable!());
        let organization = Organization::new(3, draft, AuditStamp::created_now(None));

        let updated = organization.apply_update(
            OrganizationUpdate {
                name: Some("Berlin Plant North".to_owned()),
                ..OrganizationUpdate::default()
            },
            None,
        );

        assert!(updated.is_ok());
        let Ok(updated) = updated else { unreachable!() };
        assert_eq!(updated.email(), Some("plant@pharma.example"));
        assert_eq!(updated.phone(), Some("+49 30 1234"));
    }
}
