use async_trait::async_trait;
use pharmadex_core::{AppResult, RecordId};
use pharmadex_domain::{
    Customer, CustomerAddress, CustomerAddressDraft, CustomerDraft, ListQuery, Organization,
    OrganizationDraft, Page,
};

/// Repository port for trading partners: organizations, customers, and
/// customer addresses.
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Lists organizations for a query.
    async fn list_organizations(&self, query: &ListQuery) -> AppResult<Page<Organization>>;

    /// Looks up one organization by identifier.
    async fn find_organization(&self, id: RecordId) -> AppResult<Option<Organization>>;

    /// Persists a new organization.
    async fn create_organization(
        &self,
        draft: OrganizationDraft,
        created_by: Option<&str>,
    ) -> AppResult<Organization>;

    /// Replaces a stored organization with the provided state.
    async fn update_organization(&self, organization: Organization) -> AppResult<Organization>;

    /// Deletes one organization by identifier.
    async fn delete_organization(&self, id: RecordId) -> AppResult<()>;

    /// Lists customers for a query.
    async fn list_customers(&self, query: &ListQuery) -> AppResult<Page<Customer>>;

    /// Looks up one customer by identifier.
    async fn find_customer(&self, id: RecordId) -> AppResult<Option<Customer>>;

    /// Persists a new customer.
    async fn create_customer(
        &self,
        draft: CustomerDraft,
        created_by: Option<&str>,
    ) -> AppResult<Customer>;

    /// Replaces a stored customer with the provided state.
    async fn update_customer(&self, customer: Customer) -> AppResult<Customer>;

    /// Deletes one customer and its addresses by identifier.
    async fn delete_customer(&self, id: RecordId) -> AppResult<()>;

    /// Lists the addresses of one customer for a query.
    async fn list_customer_addresses(
        &self,
        customer_id: RecordId,
        query: &ListQuery,
    ) -> AppResult<Page<CustomerAddress>>;

    /// Looks up one customer address by identifier.
    async fn find_customer_address(&self, id: RecordId) -> AppResult<Option<CustomerAddress>>;

    /// Persists a new customer address.
    async fn create_customer_address(
        &self,
        draft: CustomerAddressDraft,
        created_by: Option<&str>,
    ) -> AppResult<CustomerAddress>;

    /// Replaces a stored customer address with the provided state.
    async fn update_customer_address(
        &self,
        address: CustomerAddress,
    ) -> AppResult<CustomerAddress>;

    /// Deletes one customer address by identifier.
    async fn delete_customer_address(&self, id: RecordId) -> AppResult<()>;
}
