use std::collections::BTreeSet;
use std::str::FromStr;

use pharmadex_core::{AppError, AppResult, RecordId};
use serde::{Deserialize, Serialize};

use crate::audit::AuditStamp;
use crate::schema::TextRule;

const ROLE_NAME: TextRule = TextRule::new("role name", 64);
const ROLE_DESCRIPTION: TextRule = TextRule::new("role description", 500);

/// Names of the seeded roles that cannot be edited or deleted.
pub const SYSTEM_ROLES: &[&str] = &["administrator", "editor", "viewer"];

/// Permissions enforced by application policy checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows reading items, item types, and product groups.
    CatalogRead,
    /// Allows mutating items, item types, and product groups.
    CatalogWrite,
    /// Allows reading organizations, customers, and addresses.
    PartnerRead,
    /// Allows mutating organizations, customers, and addresses.
    PartnerWrite,
    /// Allows reading sales orders.
    OrderRead,
    /// Allows mutating sales orders.
    OrderWrite,
    /// Allows reading configuration settings.
    SettingsRead,
    /// Allows mutating configuration settings.
    SettingsWrite,
    /// Allows reading roles and the permission catalog.
    SecurityRoleRead,
    /// Allows managing roles and their grants.
    SecurityRoleManage,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatalogRead => "catalog.read",
            Self::CatalogWrite => "catalog.write",
            Self::PartnerRead => "partner.read",
            Self::PartnerWrite => "partner.write",
            Self::OrderRead => "order.read",
            Self::OrderWrite => "order.write",
            Self::SettingsRead => "settings.read",
            Self::SettingsWrite => "settings.write",
            Self::SecurityRoleRead => "security.role.read",
            Self::SecurityRoleManage => "security.role.manage",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::CatalogRead,
            Permission::CatalogWrite,
            Permission::PartnerRead,
            Permission::PartnerWrite,
            Permission::OrderRead,
            Permission::OrderWrite,
            Permission::SettingsRead,
            Permission::SettingsWrite,
            Permission::SecurityRoleRead,
            Permission::SecurityRoleManage,
        ];

        ALL
    }

    /// Returns the read-only subset of the catalog.
    #[must_use]
    pub fn read_only() -> &'static [Self] {
        const READ_ONLY: &[Permission] = &[
            Permission::CatalogRead,
            Permission::PartnerRead,
            Permission::OrderRead,
            Permission::SettingsRead,
            Permission::SecurityRoleRead,
        ];

        READ_ONLY
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "catalog.read" => Ok(Self::CatalogRead),
            "catalog.write" => Ok(Self::CatalogWrite),
            "partner.read" => Ok(Self::PartnerRead),
            "partner.write" => Ok(Self::PartnerWrite),
            "order.read" => Ok(Self::OrderRead),
            "order.write" => Ok(Self::OrderWrite),
            "settings.read" => Ok(Self::SettingsRead),
            "settings.write" => Ok(Self::SettingsWrite),
            "security.role.read" => Ok(Self::SecurityRoleRead),
            "security.role.manage" => Ok(Self::SecurityRoleManage),
            _ => Err(AppError::Validation(format!(
                "unknown permission value '{value}'"
            ))),
        }
    }
}

/// Named set of permission grants assignable to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    id: RecordId,
    name: String,
    description: Option<String>,
    permissions: BTreeSet<Permission>,
    is_system: bool,
    audit: AuditStamp,
}

/// Validated field values for a new role.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleDraft {
    name: String,
    description: Option<String>,
    permissions: BTreeSet<Permission>,
}

impl RoleDraft {
    /// Validates field values for a new role.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        permissions: BTreeSet<Permission>,
    ) -> AppResult<Self> {
        Ok(Self {
            name: ROLE_NAME.require(name)?,
            description: ROLE_DESCRIPTION.optional(description)?,
            permissions,
        })
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Partial update for a role; `None` preserves the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleUpdate {
    /// New role name, when provided.
    pub name: Option<String>,
    /// New description, when provided.
    pub description: Option<String>,
    /// Replacement permission set, when provided.
    pub permissions: Option<BTreeSet<Permission>>,
}

impl Role {
    /// Assembles a role from an identifier, validated draft, and audit
    /// stamp.
    #[must_use]
    pub fn new(id: RecordId, draft: RoleDraft, is_system: bool, audit: AuditStamp) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            permissions: draft.permissions,
            is_system,
            audit,
        }
    }

    /// Returns a copy with the update applied; unspecified fields keep
    /// their stored values. System roles refuse updates.
    pub fn apply_update(&self, update: RoleUpdate, updated_by: Option<&str>) -> AppResult<Self> {
        if self.is_system {
            return Err(AppError::Conflict(format!(
                "system role '{}' cannot be modified",
                self.name
            )));
        }

        let draft = RoleDraft::new(
            update.name.unwrap_or_else(|| self.name.clone()),
            update.description.or_else(|| self.description.clone()),
            update.permissions.unwrap_or_else(|| self.permissions.clone()),
        )?;

        Ok(Self::new(
            self.id,
            draft,
            false,
            self.audit.touched(updated_by),
        ))
    }

    /// Returns the persistence-assigned identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Returns whether this is a seeded, immutable role.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// Returns whether the role grants one permission.
    #[must_use]
    pub fn grants(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Returns the audit stamp.
    #[must_use]
    pub fn audit(&self) -> &AuditStamp {
        &self.audit
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::str::FromStr;

    use crate::audit::AuditStamp;

    use super::{Permission, Role, RoleDraft, RoleUpdate};

    #[test]
    fn permission_roundtrip_storage_value() {
        for permission in Permission::all() {
            let restored = Permission::from_str(permission.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(Permission::CatalogRead), *permission);
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        assert!(Permission::from_str("catalog.unknown").is_err());
    }

    #[test]
    fn system_role_refuses_updates() {
        let draft = RoleDraft::new(
            "administrator",
            None,
            Permission::all().iter().copied().collect(),
        )
        .unwrap_or_else(|_| unreachable!());
        let role = Role::new(1, draft, true, AuditStamp::created_now(None));

        let updated = role.apply_update(RoleUpdate::default(), None);
        assert!(updated.is_err());
    }

    #[test]
    fn custom_role_update_replaces_grants() {
        let draft = RoleDraft::new(
            "warehouse",
            None,
            BTreeSet::from([Permission::CatalogRead]),
        )
        .unwrap_or_else(|_| unreachable!());
        let role = Role::new(5, draft, false, AuditStamp::created_now(None));

        let updated = role.apply_update(
            RoleUpdate {
                permissions: Some(BTreeSet::from([
                    Permission::CatalogRead,
                    Permission::OrderRead,
                ])),
                ..RoleUpdate::default()
            },
            None,
        );

        assert!(updated.is_ok());
        let Ok(updated) = updated else { unreachable!() };
        assert!(updated.grants(Permission::OrderRead));
        assert!(!updated.grants(Permission::OrderWrite));
    }
}
