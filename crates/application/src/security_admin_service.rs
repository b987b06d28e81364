use std::sync::Arc;

use pharmadex_core::{AppError, AppResult, RecordId, UserIdentity};
use pharmadex_domain::{ListQuery, Page, Permission, Role, RoleDraft, RoleUpdate};

use crate::access::AccessPolicy;
use crate::ports::{CacheScope, ListCache, SecurityRepository, read_cached_page, write_cached_page};

/// Use cases for role administration and the permission catalog.
///
/// The seeded system roles can be read but never changed or removed.
#[derive(Clone)]
pub struct SecurityAdminService {
    repository: Arc<dyn SecurityRepository>,
    cache: Arc<dyn ListCache>,
    access: AccessPolicy,
}

impl SecurityAdminService {
    /// Creates the service over its repository, cache, and access policy.
    #[must_use]
    pub fn new(
        repository: Arc<dyn SecurityRepository>,
        cache: Arc<dyn ListCache>,
        access: AccessPolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            access,
        }
    }

    /// Lists roles for a query.
    pub async fn list_roles(
        &self,
        user: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<Page<Role>> {
        self.access.require(user, Permission::SecurityRoleRead).await?;

        let key = query.cache_key();
        if let Some(page) = read_cached_page(self.cache.as_ref(), CacheScope::Roles, &key).await? {
            return Ok(page);
        }

        let page = self.repository.list_roles(query).await?;
        write_cached_page(self.cache.as_ref(), CacheScope::Roles, key, &page).await?;
        Ok(page)
    }

    /// Fetches one role.
    pub async fn get_role(&self, user: &UserIdentity, id: RecordId) -> AppResult<Role> {
        self.access.require(user, Permission::SecurityRoleRead).await?;
        self.repository
            .find_role(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role {id} does not exist")))
    }

    /// Returns the fixed permission catalog.
    pub async fn list_permissions(&self, user: &UserIdentity) -> AppResult<&'static [Permission]> {
        self.access.require(user, Permission::SecurityRoleRead).await?;
        Ok(Permission::all())
    }

    /// Creates a custom role with a unique name.
    pub async fn create_role(&self, user: &UserIdentity, draft: RoleDraft) -> AppResult<Role> {
        self.access
            .require(user, Permission::SecurityRoleManage)
            .await?;

        if self.repository.find_role_by_name(draft.name()).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "role name '{}' is already taken",
                draft.name()
            )));
        }

        let created = self
            .repository
            .create_role(draft, false, Some(user.subject()))
            .await?;
        self.cache.invalidate(CacheScope::Roles).await?;
        Ok(created)
    }

    /// Applies a partial update to a custom role.
    pub async fn update_role(
        &self,
        user: &UserIdentity,
        id: RecordId,
        update: RoleUpdate,
    ) -> AppResult<Role> {
        self.access
            .require(user, Permission::SecurityRoleManage)
            .await?;

        let stored = self
            .repository
            .find_role(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role {id} does not exist")))?;
        let updated = stored.apply_update(update, Some(user.subject()))?;

        if updated.name() != stored.name()
            && let Some(existing) = self.repository.find_role_by_name(updated.name()).await?
            && existing.id() != id
        {
            return Err(AppError::Conflict(format!(
                "role name '{}' is already taken",
                existing.name()
            )));
        }

        let saved = self.repository.update_role(updated).await?;
        self.cache.invalidate(CacheScope::Roles).await?;
        Ok(saved)
    }

    /// Deletes a custom role; system roles are refused.
    pub async fn delete_role(&self, user: &UserIdentity, id: RecordId) -> AppResult<()> {
        self.access
            .require(user, Permission::SecurityRoleManage)
            .await?;

        let stored = self
            .repository
            .find_role(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role {id} does not exist")))?;
        if stored.is_system() {
            return Err(AppError::Conflict(format!(
                "system role '{}' cannot be deleted",
                stored.name()
            )));
        }

        self.repository.delete_role(id).await?;
        self.cache.invalidate(CacheScope::Roles).await
    }
}
