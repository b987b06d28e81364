use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use pharmadex_application::SecurityRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{
    AuditStamp, ListQuery, Page, Permission, Role, RoleDraft, SYSTEM_ROLES, paginate,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct SecurityState {
    roles: HashMap<RecordId, Role>,
    next_id: RecordId,
}

/// In-memory role adapter used by tests and local tooling.
#[derive(Default)]
pub struct InMemorySecurityRepository {
    state: RwLock<SecurityState>,
}

impl InMemorySecurityRepository {
    /// Creates an empty role store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a role store preloaded with the immutable system roles.
    pub fn seeded() -> AppResult<Self> {
        let mut state = SecurityState::default();
        for (name, permissions) in system_role_grants() {
            state.next_id += 1;
            let draft = RoleDraft::new(name, None, permissions)?;
            state
                .roles
                .insert(state.next_id, Role::new(state.next_id, draft, true, AuditStamp::created_now(None)));
        }

        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

fn system_role_grants() -> Vec<(&'static str, BTreeSet<Permission>)> {
    SYSTEM_ROLES
        .iter()
        .map(|name| {
            let permissions = match *name {
                "viewer" => Permission::read_only().iter().copied().collect(),
                "editor" => Permission::all()
                    .iter()
                    .copied()
                    .filter(|permission| *permission != Permission::SecurityRoleManage)
                    .collect(),
                _ => Permission::all().iter().copied().collect(),
            };

            (*name, permissions)
        })
        .collect()
}

fn sort_roles(rows: &mut [Role], query: &ListQuery) -> AppResult<()> {
    match query.sort_by().unwrap_or("name") {
        "name" => rows.sort_by(|left, right| left.name().cmp(right.name())),
        "createdAt" => rows.sort_by_key(|row| row.audit().created_at()),
        other => {
            return Err(AppError::Validation(format!(
                "unsupported sort field '{other}'"
            )));
        }
    }
    if query.sort_descending() {
        rows.reverse();
    }

    Ok(())
}

#[async_trait]
impl SecurityRepository for InMemorySecurityRepository {
    async fn list_roles(&self, query: &ListQuery) -> AppResult<Page<Role>> {
        let is_system = query.bool_filter("isSystem")?;

        let state = self.state.read().await;
        let mut rows = state
            .roles
            .values()
            .filter(|row| {
                query
                    .search()
                    .is_none_or(|term| row.name().to_lowercase().contains(&term.to_lowercase()))
            })
            .filter(|row| is_system.is_none_or(|wanted| row.is_system() == wanted))
            .cloned()
            .collect::<Vec<_>>();
        drop(state);

        sort_roles(&mut rows, query)?;
        Ok(paginate(rows, query))
    }

    async fn find_role(&self, id: RecordId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .read()
            .await
            .roles
            .values()
            .find(|row| row.name() == name)
            .cloned())
    }

    async fn create_role(
        &self,
        draft: RoleDraft,
        is_system: bool,
        created_by: Option<&str>,
    ) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state.roles.values().any(|row| row.name() == draft.name()) {
            return Err(AppError::Conflict(format!(
                "role name '{}' is already taken",
                draft.name()
            )));
        }

        state.next_id += 1;
        let id = state.next_id;
        let created = Role::new(id, draft, is_system, AuditStamp::created_now(created_by));
        state.roles.insert(id, created.clone());
        Ok(created)
    }

    async fn update_role(&self, role: Role) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role.id()) {
            return Err(AppError::NotFound(format!(
                "role {} does not exist",
                role.id()
            )));
        }
        if state
            .roles
            .values()
            .any(|row| row.id() != role.id() && row.name() == role.name())
        {
            return Err(AppError::Conflict(format!(
                "role name '{}' is already taken",
                role.name()
            )));
        }

        state.roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn delete_role(&self, id: RecordId) -> AppResult<()> {
        if self.state.write().await.roles.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("role {id} does not exist")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pharmadex_application::SecurityRepository;
    use pharmadex_domain::{ListQuery, Permission, SYSTEM_ROLES};

    use super::InMemorySecurityRepository;

    #[tokio::test]
    async fn seeded_store_contains_every_system_role() {
        let repository = InMemorySecurityRepository::seeded();
        assert!(repository.is_ok());
        let Ok(repository) = repository else { unreachable!() };

        for name in SYSTEM_ROLES {
            let found = repository.find_role_by_name(name).await;
            assert!(found.is_ok());
            let Ok(found) = found else { unreachable!() };
            assert!(found.is_some_and(|role| role.is_system()));
        }
    }

    #[tokio::test]
    async fn viewer_holds_only_read_permissions() {
        let repository = InMemorySecurityRepository::seeded();
        assert!(repository.is_ok());
        let Ok(repository) = repository else { unreachable!() };

        let viewer = repository.find_role_by_name("viewer").await;
        assert!(viewer.is_ok());
        let Ok(Some(viewer)) = viewer else { unreachable!() };
        assert!(viewer.grants(Permission::CatalogRead));
        assert!(!viewer.grants(Permission::CatalogWrite));
        assert!(!viewer.grants(Permission::SecurityRoleManage));
    }

    #[tokio::test]
    async fn system_filter_separates_custom_roles() {
        let repository = InMemorySecurityRepository::seeded();
        assert!(repository.is_ok());
        let Ok(repository) = repository else { unreachable!() };

        let draft = pharmadex_domain::RoleDraft::new(
            "warehouse",
            None,
            [Permission::CatalogRead].into_iter().collect(),
        );
        assert!(draft.is_ok());
        let Ok(draft) = draft else { unreachable!() };
        assert!(repository.create_role(draft, false, None).await.is_ok());

        let listed = ListQuery::new(1, 25)
            .map(|query| query.with_filter("isSystem", "false"))
            .unwrap_or_else(|_| unreachable!());
        let page = repository.list_roles(&listed).await;
        assert!(page.is_ok());
        let Ok(page) = page else { unreachable!() };
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].name(), "warehouse");
    }
}
