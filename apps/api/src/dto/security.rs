use std::collections::BTreeSet;
use std::str::FromStr;

use pharmadex_core::{AppError, RecordId};
use pharmadex_domain::{DEFAULT_PAGE_SIZE, ListQuery, Permission, Role, RoleDraft, RoleUpdate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a role and its grants.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub is_system: bool,
    pub created_at: String,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// Request payload for creating a custom role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

/// Request payload for partially updating a custom role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Replacement grant set, when provided.
    pub permissions: Option<Vec<String>>,
}

/// Query parameters for listing roles.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListParams {
    #[serde(alias = "pageNumber")]
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub is_system: Option<bool>,
}

impl RoleListParams {
    /// Builds the validated list query for this request.
    pub fn into_query(self) -> Result<ListQuery, AppError> {
        let mut query = ListQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .with_search(self.search)
        .with_sort(self.sort_by, self.sort_descending.unwrap_or(false));

        if let Some(is_system) = self.is_system {
            query = query.with_filter("isSystem", is_system.to_string());
        }

        Ok(query)
    }
}

fn parse_permissions(values: Vec<String>) -> Result<BTreeSet<Permission>, AppError> {
    values
        .iter()
        .map(|value| Permission::from_str(value.as_str()))
        .collect()
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            id: value.id(),
            name: value.name().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            permissions: value
                .permissions()
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            is_system: value.is_system(),
            created_at: value.audit().created_at().to_rfc3339(),
            created_by: value.audit().created_by().map(ToOwned::to_owned),
            updated_at: value.audit().updated_at().map(|at| at.to_rfc3339()),
            updated_by: value.audit().updated_by().map(ToOwned::to_owned),
        }
    }
}

impl TryFrom<CreateRoleRequest> for RoleDraft {
    type Error = AppError;

    fn try_from(value: CreateRoleRequest) -> Result<Self, Self::Error> {
        let permissions = parse_permissions(value.permissions)?;
        Self::new(value.name, value.description, permissions)
    }
}

impl TryFrom<UpdateRoleRequest> for RoleUpdate {
    type Error = AppError;

    fn try_from(value: UpdateRoleRequest) -> Result<Self, Self::Error> {
        let permissions = value.permissions.map(parse_permissions).transpose()?;

        Ok(Self {
            name: value.name,
            description: value.description,
            permissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::parse_permissions;

    #[test]
    fn permission_values_are_validated_on_parse() {
        let parsed = parse_permissions(vec![
            "catalog.read".to_owned(),
            "order.write".to_owned(),
        ]);
        assert!(parsed.is_ok());

        let rejected = parse_permissions(vec!["catalog.everything".to_owned()]);
        assert!(rejected.is_err());
    }
}
