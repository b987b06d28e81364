use async_trait::async_trait;
use pharmadex_core::{AppResult, RecordId};
use pharmadex_domain::{ListQuery, Page, Role, RoleDraft};

/// Repository port for roles and their permission grants.
#[async_trait]
pub trait SecurityRepository: Send + Sync {
    /// Lists roles for a query.
    async fn list_roles(&self, query: &ListQuery) -> AppResult<Page<Role>>;

    /// Looks up one role by identifier.
    async fn find_role(&self, id: RecordId) -> AppResult<Option<Role>>;

    /// Looks up one role by its unique name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Persists a new role.
    async fn create_role(
        &self,
        draft: RoleDraft,
        is_system: bool,
        created_by: Option<&str>,
    ) -> AppResult<Role>;

    /// Replaces a stored role with the provided state.
    async fn update_role(&self, role: Role) -> AppResult<Role>;

    /// Deletes one role by identifier.
    async fn delete_role(&self, id: RecordId) -> AppResult<()>;
}
