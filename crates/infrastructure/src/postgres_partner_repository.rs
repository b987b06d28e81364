use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use pharmadex_application::PartnerRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{
    AuditStamp, Customer, CustomerAddress, CustomerAddressDraft, CustomerDraft, ListQuery,
    Organization, OrganizationDraft, Page,
};

use crate::postgres_list_helpers::{conflict_on_unique, internal, sort_direction};

/// PostgreSQL-backed trading partner repository.
#[derive(Clone)]
pub struct PostgresPartnerRepository {
    pool: PgPool,
}

impl PostgresPartnerRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrganizationRow {
    id: i64,
    code: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

#[derive(Debug, FromRow)]
struct CustomerRow {
    id: i64,
    code: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    credit_limit: Option<f64>,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

#[derive(Debug, FromRow)]
struct CustomerAddressRow {
    id: i64,
    customer_id: i64,
    line1: String,
    line2: Option<String>,
    city: String,
    postal_code: String,
    country: String,
    is_primary: bool,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = AppError;

    fn try_from(row: OrganizationRow) -> Result<Self, Self::Error> {
        let draft =
            OrganizationDraft::new(row.code, row.name, row.email, row.phone, row.is_active)
                .map_err(|error| {
                    AppError::Internal(format!(
                        "stored organization {} is invalid: {error}",
                        row.id
                    ))
                })?;

        Ok(Self::new(
            row.id,
            draft,
            AuditStamp::from_parts(row.created_at, row.created_by, row.updated_at, row.updated_by),
        ))
    }
}

impl TryFrom<CustomerRow> for Customer {
    type Error = AppError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let draft = CustomerDraft::new(
            row.code,
            row.name,
            row.email,
            row.phone,
            row.credit_limit,
            row.is_active,
        )
        .map_err(|error| {
            AppError::Internal(format!("stored customer {} is invalid: {error}", row.id))
        })?;

        Ok(Self::new(
            row.id,
            draft,
            AuditStamp::from_parts(row.created_at, row.created_by, row.updated_at, row.updated_by),
        ))
    }
}

impl TryFrom<CustomerAddressRow> for CustomerAddress {
    type Error = AppError;

    fn try_from(row: CustomerAddressRow) -> Result<Self, Self::Error> {
        let draft = CustomerAddressDraft::new(
            row.customer_id,
            row.line1,
            row.line2,
            row.city,
            row.postal_code,
            row.country,
            row.is_primary,
        )
        .map_err(|error| {
            AppError::Internal(format!("stored address {} is invalid: {error}", row.id))
        })?;

        Ok(Self::new(
            row.id,
            draft,
            AuditStamp::from_parts(row.created_at, row.created_by, row.updated_at, row.updated_by),
        ))
    }
}

const ORGANIZATION_COLUMNS: &str =
    "id, code, name, email, phone, is_active, created_at, created_by, updated_at, updated_by";

const CUSTOMER_COLUMNS: &str = "id, code, name, email, phone, credit_limit, is_active, \
     created_at, created_by, updated_at, updated_by";

const ADDRESS_COLUMNS: &str = "id, customer_id, line1, line2, city, postal_code, country, \
     is_primary, created_at, created_by, updated_at, updated_by";

fn partner_sort_column(sort_by: Option<&str>) -> AppResult<&'static str> {
    match sort_by.unwrap_or("code") {
        "code" => Ok("code"),
        "name" => Ok("name"),
        "createdAt" => Ok("created_at"),
        other => Err(AppError::Validation(format!(
            "unsupported sort field '{other}'"
        ))),
    }
}

fn address_sort_column(sort_by: Option<&str>) -> AppResult<&'static str> {
    match sort_by.unwrap_or("city") {
        "city" => Ok("city"),
        "country" => Ok("country"),
        "createdAt" => Ok("created_at"),
        other => Err(AppError::Validation(format!(
            "unsupported sort field '{other}'"
        ))),
    }
}

#[async_trait]
impl PartnerRepository for PostgresPartnerRepository {
    async fn list_organizations(&self, query: &ListQuery) -> AppResult<Page<Organization>> {
        let is_active = query.bool_filter("isActive")?;
        let column = partner_sort_column(query.sort_by())?;
        let direction = sort_direction(query.sort_descending());

        let where_clause = "WHERE ($1::text IS NULL OR code ILIKE '%' || $1 || '%' OR name ILIKE '%' || $1 || '%') \
             AND ($2::boolean IS NULL OR is_active = $2)";

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM organizations {where_clause}"
        ))
        .bind(query.search())
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(internal("failed to count organizations"))?;

        let rows = sqlx::query_as::<_, OrganizationRow>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations {where_clause} \
             ORDER BY {column} {direction}, id LIMIT $3 OFFSET $4"
        ))
        .bind(query.search())
        .bind(is_active)
        .bind(query.limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to list organizations"))?;

        let items = rows
            .into_iter()
            .map(Organization::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(items, total_count as u64, query.page_size()))
    }

    async fn find_organization(&self, id: RecordId) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load organization"))?;

        row.map(Organization::try_from).transpose()
    }

    async fn create_organization(
        &self,
        draft: OrganizationDraft,
        created_by: Option<&str>,
    ) -> AppResult<Organization> {
        let staged = Organization::new(0, draft, AuditStamp::created_now(created_by));
        let conflict = format!("organization code '{}' is already taken", staged.code());

        let row = sqlx::query_as::<_, OrganizationRow>(&format!(
            "INSERT INTO organizations (code, name, email, phone, is_active, created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ORGANIZATION_COLUMNS}"
        ))
        .bind(staged.code())
        .bind(staged.name())
        .bind(staged.email())
        .bind(staged.phone())
        .bind(staged.is_active())
        .bind(staged.audit().created_at())
        .bind(staged.audit().created_by())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to create organization"))?;

        Organization::try_from(row)
    }

    async fn update_organization(&self, organization: Organization) -> AppResult<Organization> {
        let conflict = format!(
            "organization code '{}' is already taken",
            organization.code()
        );

        let row = sqlx::query_as::<_, OrganizationRow>(&format!(
            "UPDATE organizations \
             SET code = $2, name = $3, email = $4, phone = $5, is_active = $6, \
                 updated_at = $7, updated_by = $8 \
             WHERE id = $1 \
             RETURNING {ORGANIZATION_COLUMNS}"
        ))
        .bind(organization.id())
        .bind(organization.code())
        .bind(organization.name())
        .bind(organization.email())
        .bind(organization.phone())
        .bind(organization.is_active())
        .bind(organization.audit().updated_at())
        .bind(organization.audit().updated_by())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to update organization"))?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "organization {} does not exist",
                organization.id()
            ))
        })?;

        Organization::try_from(row)
    }

    async fn delete_organization(&self, id: RecordId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("failed to delete organization"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "organization {id} does not exist"
            )));
        }

        Ok(())
    }

    async fn list_customers(&self, query: &ListQuery) -> AppResult<Page<Customer>> {
        let is_active = query.bool_filter("isActive")?;
        let column = partner_sort_column(query.sort_by())?;
        let direction = sort_direction(query.sort_descending());

        let where_clause = "WHERE ($1::text IS NULL OR code ILIKE '%' || $1 || '%' OR name ILIKE '%' || $1 || '%') \
             AND ($2::boolean IS NULL OR is_active = $2)";

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM customers {where_clause}"
        ))
        .bind(query.search())
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(internal("failed to count customers"))?;

        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers {where_clause} \
             ORDER BY {column} {direction}, id LIMIT $3 OFFSET $4"
        ))
        .bind(query.search())
        .bind(is_active)
        .bind(query.limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to list customers"))?;

        let items = rows
            .into_iter()
            .map(Customer::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(items, total_count as u64, query.page_size()))
    }

    async fn find_customer(&self, id: RecordId) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load customer"))?;

        row.map(Customer::try_from).transpose()
    }

    async fn create_customer(
        &self,
        draft: CustomerDraft,
        created_by: Option<&str>,
    ) -> AppResult<Customer> {
        let staged = Customer::new(0, draft, AuditStamp::created_now(created_by));
        let conflict = format!("customer code '{}' is already taken", staged.code());

        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "INSERT INTO customers (code, name, email, phone, credit_limit, is_active, created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(staged.code())
        .bind(staged.name())
        .bind(staged.email())
        .bind(staged.phone())
        .bind(staged.credit_limit())
        .bind(staged.is_active())
        .bind(staged.audit().created_at())
        .bind(staged.audit().created_by())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to create customer"))?;

        Customer::try_from(row)
    }

    async fn update_customer(&self, customer: Customer) -> AppResult<Customer> {
        let conflict = format!("customer code '{}' is already taken", customer.code());

        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "UPDATE customers \
             SET code = $2, name = $3, email = $4, phone = $5, credit_limit = $6, \
                 is_active = $7, updated_at = $8, updated_by = $9 \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(customer.id())
        .bind(customer.code())
        .bind(customer.name())
        .bind(customer.email())
        .bind(customer.phone())
        .bind(customer.credit_limit())
        .bind(customer.is_active())
        .bind(customer.audit().updated_at())
        .bind(customer.audit().updated_by())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to update customer"))?
        .ok_or_else(|| {
            AppError::NotFound(format!("customer {} does not exist", customer.id()))
        })?;

        Customer::try_from(row)
    }

    async fn delete_customer(&self, id: RecordId) -> AppResult<()> {
        // Addresses go with the customer via ON DELETE CASCADE.
        let rows_affected = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("failed to delete customer"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("customer {id} does not exist")));
        }

        Ok(())
    }

    async fn list_customer_addresses(
        &self,
        customer_id: RecordId,
        query: &ListQuery,
    ) -> AppResult<Page<CustomerAddress>> {
        let is_primary = query.bool_filter("isPrimary")?;
        let column = address_sort_column(query.sort_by())?;
        let direction = sort_direction(query.sort_descending());

        let where_clause = "WHERE customer_id = $1 \
             AND ($2::text IS NULL OR line1 ILIKE '%' || $2 || '%' OR city ILIKE '%' || $2 || '%' \
                  OR postal_code ILIKE '%' || $2 || '%' OR country ILIKE '%' || $2 || '%') \
             AND ($3::boolean IS NULL OR is_primary = $3)";

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM customer_addresses {where_clause}"
        ))
        .bind(customer_id)
        .bind(query.search())
        .bind(is_primary)
        .fetch_one(&self.pool)
        .await
        .map_err(internal("failed to count customer addresses"))?;

        let rows = sqlx::query_as::<_, CustomerAddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM customer_addresses {where_clause} \
             ORDER BY {column} {direction}, id LIMIT $4 OFFSET $5"
        ))
        .bind(customer_id)
        .bind(query.search())
        .bind(is_primary)
        .bind(query.limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to list customer addresses"))?;

        let items = rows
            .into_iter()
            .map(CustomerAddress::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(items, total_count as u64, query.page_size()))
    }

    async fn find_customer_address(&self, id: RecordId) -> AppResult<Option<CustomerAddress>> {
        let row = sqlx::query_as::<_, CustomerAddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM customer_addresses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load customer address"))?;

        row.map(CustomerAddress::try_from).transpose()
    }

    async fn create_customer_address(
        &self,
        draft: CustomerAddressDraft,
        created_by: Option<&str>,
    ) -> AppResult<CustomerAddress> {
        let staged = CustomerAddress::new(0, draft, AuditStamp::created_now(created_by));

        let row = sqlx::query_as::<_, CustomerAddressRow>(&format!(
            "INSERT INTO customer_addresses (customer_id, line1, line2, city, postal_code, \
                 country, is_primary, created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(staged.customer_id())
        .bind(staged.line1())
        .bind(staged.line2())
        .bind(staged.city())
        .bind(staged.postal_code())
        .bind(staged.country())
        .bind(staged.is_primary())
        .bind(staged.audit().created_at())
        .bind(staged.audit().created_by())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            // A missing parent violates the foreign key, code 23503.
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23503")
            {
                return AppError::NotFound(format!(
                    "customer {} does not exist",
                    staged.customer_id()
                ));
            }

            AppError::Internal(format!("failed to create customer address: {error}"))
        })?;

        CustomerAddress::try_from(row)
    }

    async fn update_customer_address(
        &self,
        address: CustomerAddress,
    ) -> AppResult<CustomerAddress> {
        let row = sqlx::query_as::<_, CustomerAddressRow>(&format!(
            "UPDATE customer_addresses \
             SET line1 = $2, line2 = $3, city = $4, postal_code = $5, country = $6, \
                 is_primary = $7, updated_at = $8, updated_by = $9 \
             WHERE id = $1 \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(address.id())
        .bind(address.line1())
        .bind(address.line2())
        .bind(address.city())
        .bind(address.postal_code())
        .bind(address.country())
        .bind(address.is_primary())
        .bind(address.audit().updated_at())
        .bind(address.audit().updated_by())
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to update customer address"))?
        .ok_or_else(|| {
            AppError::NotFound(format!("address {} does not exist", address.id()))
        })?;

        CustomerAddress::try_from(row)
    }

    async fn delete_customer_address(&self, id: RecordId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM customer_addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("failed to delete customer address"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("address {id} does not exist")));
        }

        Ok(())
    }
}
