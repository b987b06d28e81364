use pharmadex_core::{AppError, RecordId};
use pharmadex_domain::{
    Customer, CustomerAddress, CustomerAddressDraft, CustomerAddressUpdate, CustomerDraft,
    CustomerUpdate, DEFAULT_PAGE_SIZE, ListQuery, Organization, OrganizationDraft,
    OrganizationUpdate,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of an organization.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/organization-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// Request payload for creating an organization.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-organization-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Defaults to active when omitted.
    pub is_active: Option<bool>,
}

/// Request payload for partially updating an organization.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-organization-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing organizations or customers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerListParams {
    #[serde(alias = "pageNumber")]
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub is_active: Option<bool>,
}

impl PartnerListParams {
    /// Builds the validated list query for this request.
    pub fn into_query(self) -> Result<ListQuery, AppError> {
        let mut query = ListQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .with_search(self.search)
        .with_sort(self.sort_by, self.sort_descending.unwrap_or(false));

        if let Some(is_active) = self.is_active {
            query = query.with_filter("isActive", is_active.to_string());
        }

        Ok(query)
    }
}

impl From<Organization> for OrganizationResponse {
    fn from(value: Organization) -> Self {
        Self {
            id: value.id(),
            code: value.code().to_owned(),
            name: value.name().to_owned(),
            email: value.email().map(ToOwned::to_owned),
            phone: value.phone().map(ToOwned::to_owned),
            is_active: value.is_active(),
            created_at: value.audit().created_at().to_rfc3339(),
            created_by: value.audit().created_by().map(ToOwned::to_owned),
            updated_at: value.audit().updated_at().map(|at| at.to_rfc3339()),
            updated_by: value.audit().updated_by().map(ToOwned::to_owned),
        }
    }
}

impl TryFrom<CreateOrganizationRequest> for OrganizationDraft {
    type Error = AppError;

    fn try_from(value: CreateOrganizationRequest) -> Result<Self, Self::Error> {
        Self::new(
            value.code,
            value.name,
            value.email,
            value.phone,
            value.is_active.unwrap_or(true),
        )
    }
}

impl From<UpdateOrganizationRequest> for OrganizationUpdate {
    fn from(value: UpdateOrganizationRequest) -> Self {
        Self {
            code: value.code,
            name: value.name,
            email: value.email,
            phone: value.phone,
            is_active: value.is_active,
        }
    }
}

/// API representation of a customer.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/customer-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub credit_limit: Option<f64>,
    pub is_active: bool,
    pub created_at: String,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// Request payload for creating a customer.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-customer-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub code: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub credit_limit: Option<f64>,
    /// Defaults to active when omitted.
    pub is_active: Option<bool>,
}

/// Request payload for partially updating a customer.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-customer-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub credit_limit: Option<f64>,
    pub is_active: Option<bool>,
}

impl From<Customer> for CustomerResponse {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id(),
            code: value.code().to_owned(),
            name: value.name().to_owned(),
            email: value.email().map(ToOwned::to_owned),
            phone: value.phone().map(ToOwned::to_owned),
            credit_limit: value.credit_limit(),
            is_active: value.is_active(),
            created_at: value.audit().created_at().to_rfc3339(),
            created_by: value.audit().created_by().map(ToOwned::to_owned),
            updated_at: value.audit().updated_at().map(|at| at.to_rfc3339()),
            updated_by: value.audit().updated_by().map(ToOwned::to_owned),
        }
    }
}

impl TryFrom<CreateCustomerRequest> for CustomerDraft {
    type Error = AppError;

    fn try_from(value: CreateCustomerRequest) -> Result<Self, Self::Error> {
        Self::new(
            value.code,
            value.name,
            value.email,
            value.phone,
            value.credit_limit,
            value.is_active.unwrap_or(true),
        )
    }
}

impl From<UpdateCustomerRequest> for CustomerUpdate {
    fn from(value: UpdateCustomerRequest) -> Self {
        Self {
            code: value.code,
            name: value.name,
            email: value.email,
            phone: value.phone,
            credit_limit: value.credit_limit,
            is_active: value.is_active,
        }
    }
}

/// API representation of a customer address.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/customer-address-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddressResponse {
    pub id: RecordId,
    pub customer_id: RecordId,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub is_primary: bool,
    pub created_at: String,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// Request payload for creating a customer address.
///
/// The owning customer comes from the request path.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-customer-address-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerAddressRequest {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    /// Defaults to non-primary when omitted.
    pub is_primary: Option<bool>,
}

impl CreateCustomerAddressRequest {
    /// Validates the payload against its owning customer.
    pub fn into_draft(self, customer_id: RecordId) -> Result<CustomerAddressDraft, AppError> {
        CustomerAddressDraft::new(
            customer_id,
            self.line1,
            self.line2,
            self.city,
            self.postal_code,
            self.country,
            self.is_primary.unwrap_or(false),
        )
    }
}

/// Request payload for partially updating a customer address.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-customer-address-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerAddressRequest {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub is_primary: Option<bool>,
}

/// Query parameters for listing customer addresses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddressListParams {
    #[serde(alias = "pageNumber")]
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub is_primary: Option<bool>,
}

impl CustomerAddressListParams {
    /// Builds the validated list query for this request.
    pub fn into_query(self) -> Result<ListQuery, AppError> {
        let mut query = ListQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .with_search(self.search)
        .with_sort(self.sort_by, self.sort_descending.unwrap_or(false));

        if let Some(is_primary) = self.is_primary {
            query = query.with_filter("isPrimary", is_primary.to_string());
        }

        Ok(query)
    }
}

impl From<CustomerAddress> for CustomerAddressResponse {
    fn from(value: CustomerAddress) -> Self {
        Self {
            id: value.id(),
            customer_id: value.customer_id(),
            line1: value.line1().to_owned(),
            line2: value.line2().map(ToOwned::to_owned),
            city: value.city().to_owned(),
            postal_code: value.postal_code().to_owned(),
            country: value.country().to_owned(),
            is_primary: value.is_primary(),
            created_at: value.audit().created_at().to_rfc3339(),
            created_by: value.audit().created_by().map(ToOwned::to_owned),
            updated_at: value.audit().updated_at().map(|at| at.to_rfc3339()),
            updated_by: value.audit().updated_by().map(ToOwned::to_owned),
        }
    }
}

impl From<UpdateCustomerAddressRequest> for CustomerAddressUpdate {
    fn from(value: UpdateCustomerAddressRequest) -> Self {
        Self {
            line1: value.line1,
            line2: value.line2,
            city: value.city,
            postal_code: value.postal_code,
            country: value.country,
            is_primary: value.is_primary,
        }
    }
}
