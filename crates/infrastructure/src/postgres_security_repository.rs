use std::collections::BTreeSet;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use pharmadex_application::SecurityRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{AuditStamp, ListQuery, Page, Permission, Role, RoleDraft};

use crate::postgres_list_helpers::{conflict_on_unique, internal, sort_direction};

/// PostgreSQL-backed role repository.
///
/// Permission grants live in a separate `role_grants` table; reads stitch
/// them back onto their roles.
#[derive(Clone)]
pub struct PostgresSecurityRepository {
    pool: PgPool,
}

impl PostgresSecurityRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn grants_for(&self, role_ids: &[i64]) -> AppResult<Vec<(i64, Permission)>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            "SELECT role_id, permission FROM role_grants WHERE role_id = ANY($1) \
             ORDER BY role_id, permission",
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to load role grants"))?;

        rows.into_iter()
            .map(|row| {
                let permission = Permission::from_str(row.permission.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "invalid stored permission for role {}: {error}",
                        row.role_id
                    ))
                })?;

                Ok((row.role_id, permission))
            })
            .collect()
    }

    async fn assemble(&self, rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
        let role_ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();
        let grants = self.grants_for(&role_ids).await?;

        rows.into_iter()
            .map(|row| {
                let permissions = grants
                    .iter()
                    .filter(|(role_id, _)| *role_id == row.id)
                    .map(|(_, permission)| *permission)
                    .collect::<BTreeSet<_>>();

                row.into_role(permissions)
            })
            .collect()
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    description: Option<String>,
    is_system: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

#[derive(Debug, FromRow)]
struct GrantRow {
    role_id: i64,
    permission: String,
}

impl RoleRow {
    fn into_role(self, permissions: BTreeSet<Permission>) -> AppResult<Role> {
        let draft = RoleDraft::new(self.name, self.description, permissions).map_err(|error| {
            AppError::Internal(format!("stored role {} is invalid: {error}", self.id))
        })?;

        Ok(Role::new(
            self.id,
            draft,
            self.is_system,
            AuditStamp::from_parts(
                self.created_at,
                self.created_by,
                self.updated_at,
                self.updated_by,
            ),
        ))
    }
}

const ROLE_COLUMNS: &str =
    "id, name, description, is_system, created_at, created_by, updated_at, updated_by";

fn role_sort_column(sort_by: Option<&str>) -> AppResult<&'static str> {
    match sort_by.unwrap_or("name") {
        "name" => Ok("name"),
        "createdAt" => Ok("created_at"),
        other => Err(AppError::Validation(format!(
            "unsupported sort field '{other}'"
        ))),
    }
}

async fn replace_grants(
    transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    role_id: i64,
    permissions: &BTreeSet<Permission>,
) -> AppResult<()> {
    sqlx::query("DELETE FROM role_grants WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut **transaction)
        .await
        .map_err(internal("failed to clear role grants"))?;

    for permission in permissions {
        sqlx::query(
            "INSERT INTO role_grants (role_id, permission) VALUES ($1, $2) \
             ON CONFLICT (role_id, permission) DO NOTHING",
        )
        .bind(role_id)
        .bind(permission.as_str())
        .execute(&mut **transaction)
        .await
        .map_err(internal("failed to persist role grants"))?;
    }

    Ok(())
}

#[async_trait]
impl SecurityRepository for PostgresSecurityRepository {
    async fn list_roles(&self, query: &ListQuery) -> AppResult<Page<Role>> {
        let is_system = query.bool_filter("isSystem")?;
        let column = role_sort_column(query.sort_by())?;
        let direction = sort_direction(query.sort_descending());

        let where_clause = "WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
             AND ($2::boolean IS NULL OR is_system = $2)";

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM roles {where_clause}"
        ))
        .bind(query.search())
        .bind(is_system)
        .fetch_one(&self.pool)
        .await
        .map_err(internal("failed to count roles"))?;

        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles {where_clause} \
             ORDER BY {column} {direction}, id LIMIT $3 OFFSET $4"
        ))
        .bind(query.search())
        .bind(is_system)
        .bind(query.limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to list roles"))?;

        let roles = self.assemble(rows).await?;
        Ok(Page::new(roles, total_count as u64, query.page_size()))
    }

    async fn find_role(&self, id: RecordId) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load role"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        self.assemble(vec![row]).await.map(|mut roles| roles.pop())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE name = $1 LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load role"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        self.assemble(vec![row]).await.map(|mut roles| roles.pop())
    }

    async fn create_role(
        &self,
        draft: RoleDraft,
        is_system: bool,
        created_by: Option<&str>,
    ) -> AppResult<Role> {
        let staged = Role::new(0, draft, is_system, AuditStamp::created_now(created_by));
        let conflict = format!("role name '{}' is already taken", staged.name());

        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(internal("failed to begin transaction"))?;

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "INSERT INTO roles (name, description, is_system, created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(staged.name())
        .bind(staged.description())
        .bind(staged.is_system())
        .bind(staged.audit().created_at())
        .bind(staged.audit().created_by())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to create role"))?;

        replace_grants(&mut transaction, row.id, staged.permissions()).await?;

        transaction
            .commit()
            .await
            .map_err(internal("failed to commit transaction"))?;

        row.into_role(staged.permissions().clone())
    }

    async fn update_role(&self, role: Role) -> AppResult<Role> {
        let conflict = format!("role name '{}' is already taken", role.name());

        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(internal("failed to begin transaction"))?;

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "UPDATE roles \
             SET name = $2, description = $3, updated_at = $4, updated_by = $5 \
             WHERE id = $1 \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(role.id())
        .bind(role.name())
        .bind(role.description())
        .bind(role.audit().updated_at())
        .bind(role.audit().updated_by())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to update role"))?
        .ok_or_else(|| AppError::NotFound(format!("role {} does not exist", role.id())))?;

        replace_grants(&mut transaction, row.id, role.permissions()).await?;

        transaction
            .commit()
            .await
            .map_err(internal("failed to commit transaction"))?;

        row.into_role(role.permissions().clone())
    }

    async fn delete_role(&self, id: RecordId) -> AppResult<()> {
        // Grants go with the role via ON DELETE CASCADE.
        let rows_affected = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("failed to delete role"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("role {id} does not exist")));
        }

        Ok(())
    }
}
