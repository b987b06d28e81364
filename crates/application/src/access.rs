use std::collections::BTreeSet;
use std::sync::Arc;

use pharmadex_core::{AppError, AppResult, UserIdentity};
use pharmadex_domain::Permission;

use crate::ports::SecurityRepository;

/// Resolves the permissions of an authenticated user from role grants and
/// enforces them before each service operation.
#[derive(Clone)]
pub struct AccessPolicy {
    security: Arc<dyn SecurityRepository>,
}

impl AccessPolicy {
    /// Creates a policy backed by the role store.
    #[must_use]
    pub fn new(security: Arc<dyn SecurityRepository>) -> Self {
        Self { security }
    }

    /// Returns the union of permissions granted by the user's roles.
    ///
    /// Role names the store does not know are skipped; a user whose roles
    /// all vanished simply holds no permissions.
    pub async fn permissions_for(&self, user: &UserIdentity) -> AppResult<BTreeSet<Permission>> {
        let mut granted = BTreeSet::new();
        for role_name in user.roles() {
            if let Some(role) = self.security.find_role_by_name(role_name).await? {
                granted.extend(role.permissions().iter().copied());
            }
        }

        Ok(granted)
    }

    /// Fails with a forbidden error unless the user holds the permission.
    pub async fn require(&self, user: &UserIdentity, permission: Permission) -> AppResult<()> {
        if self.permissions_for(user).await?.contains(&permission) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' lacks permission '{}'",
            user.subject(),
            permission.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use async_trait::async_trait;
    use pharmadex_core::{AppResult, RecordId, UserIdentity};
    use pharmadex_domain::{
        AuditStamp, ListQuery, Page, Permission, Role, RoleDraft,
    };

    use crate::ports::SecurityRepository;

    use super::AccessPolicy;

    struct FixedRoles {
        roles: Vec<Role>,
    }

    #[async_trait]
    impl SecurityRepository for FixedRoles {
        async fn list_roles(&self, query: &ListQuery) -> AppResult<Page<Role>> {
            Ok(Page::new(
                self.roles.clone(),
                self.roles.len() as u64,
                query.page_size(),
            ))
        }

        async fn find_role(&self, id: RecordId) -> AppResult<Option<Role>> {
            Ok(self.roles.iter().find(|role| role.id() == id).cloned())
        }

        async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
            Ok(self.roles.iter().find(|role| role.name() == name).cloned())
        }

        async fn create_role(
            &self,
            _draft: RoleDraft,
            _is_system: bool,
            _created_by: Option<&str>,
        ) -> AppResult<Role> {
            unreachable!()
        }

        async fn update_role(&self, _role: Role) -> AppResult<Role> {
            unreachable!()
        }

        async fn delete_role(&self, _id: RecordId) -> AppResult<()> {
            unreachable!()
        }
    }

    fn role(id: RecordId, name: &str, permissions: &[Permission]) -> Role {
        let draft = RoleDraft::new(name, None, permissions.iter().copied().collect())
            .unwrap_or_else(|_| unreachable!());
        Role::new(id, draft, false, AuditStamp::created_now(None))
    }

    fn policy(roles: Vec<Role>) -> AccessPolicy {
        AccessPolicy::new(Arc::new(FixedRoles { roles }))
    }

    #[tokio::test]
    async fn permissions_are_unioned_across_roles() {
        let policy = policy(vec![
            role(1, "catalog", &[Permission::CatalogRead, Permission::CatalogWrite]),
            role(2, "orders", &[Permission::OrderRead]),
        ]);
        let user = UserIdentity::new(
            "u-1",
            "Asha",
            None,
            vec!["catalog".to_owned(), "orders".to_owned()],
        );

        let granted = policy.permissions_for(&user).await;
        assert!(granted.is_ok());
        assert_eq!(
            granted.unwrap_or_default(),
            BTreeSet::from([
                Permission::CatalogRead,
                Permission::CatalogWrite,
                Permission::OrderRead,
            ])
        );
    }

    #[tokio::test]
    async fn unknown_role_names_grant_nothing() {
        let policy = policy(vec![role(1, "catalog", &[Permission::CatalogRead])]);
        let user = UserIdentity::new("u-2", "Noor", None, vec!["ghost".to_owned()]);

        let result = policy.require(&user, Permission::CatalogRead).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn require_passes_for_granted_permission() {
        let policy = policy(vec![role(1, "catalog", &[Permission::CatalogRead])]);
        let user = UserIdentity::new("u-3", "Leni", None, vec!["catalog".to_owned()]);

        assert!(policy.require(&user, Permission::CatalogRead).await.is_ok());
        assert!(policy.require(&user, Permission::CatalogWrite).await.is_err());
    }
}
