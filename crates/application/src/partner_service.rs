use std::sync::Arc;

use pharmadex_core::{AppError, AppResult, RecordId, UserIdentity};
use pharmadex_domain::{
    Customer, CustomerAddress, CustomerAddressDraft, CustomerAddressUpdate, CustomerDraft,
    CustomerUpdate, ListQuery, Organization, OrganizationDraft, OrganizationUpdate, Page,
    Permission,
};

use crate::access::AccessPolicy;
use crate::ports::{CacheScope, ListCache, PartnerRepository, read_cached_page, write_cached_page};

/// Use cases for trading partners: organizations, customers, and the
/// addresses nested under customers.
///
/// Address operations always verify the parent customer first, so a request
/// against a missing customer fails with not-found rather than producing an
/// orphan.
#[derive(Clone)]
pub struct PartnerService {
    repository: Arc<dyn PartnerRepository>,
    cache: Arc<dyn ListCache>,
    access: AccessPolicy,
}

impl PartnerService {
    /// Creates the service over its repository, cache, and access policy.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PartnerRepository>,
        cache: Arc<dyn ListCache>,
        access: AccessPolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            access,
        }
    }

    async fn require_customer(&self, customer_id: RecordId) -> AppResult<Customer> {
        self.repository
            .find_customer(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("customer {customer_id} does not exist")))
    }

    /// Lists organizations for a query.
    pub async fn list_organizations(
        &self,
        user: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<Page<Organization>> {
        self.access.require(user, Permission::PartnerRead).await?;

        let key = query.cache_key();
        if let Some(page) =
            read_cached_page(self.cache.as_ref(), CacheScope::Organizations, &key).await?
        {
            return Ok(page);
        }

        let page = self.repository.list_organizations(query).await?;
        write_cached_page(self.cache.as_ref(), CacheScope::Organizations, key, &page).await?;
        Ok(page)
    }

    /// Fetches one organization.
    pub async fn get_organization(
        &self,
        user: &UserIdentity,
        id: RecordId,
    ) -> AppResult<Organization> {
        self.access.require(user, Permission::PartnerRead).await?;
        self.repository
            .find_organization(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("organization {id} does not exist")))
    }

    /// Creates an organization.
    pub async fn create_organization(
        &self,
        user: &UserIdentity,
        draft: OrganizationDraft,
    ) -> AppResult<Organization> {
        self.access.require(user, Permission::PartnerWrite).await?;

        let created = self
            .repository
            .create_organization(draft, Some(user.subject()))
            .await?;
        self.cache.invalidate(CacheScope::Organizations).await?;
        Ok(created)
    }

    /// Applies a partial update to an organization.
    pub async fn update_organization(
        &self,
        user: &UserIdentity,
        id: RecordId,
        update: OrganizationUpdate,
    ) -> AppResult<Organization> {
        self.access.require(user, Permission::PartnerWrite).await?;

        let stored = self
            .repository
            .find_organization(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("organization {id} does not exist")))?;
        let updated = stored.apply_update(update, Some(user.subject()))?;

        let saved = self.repository.update_organization(updated).await?;
        self.cache.invalidate(CacheScope::Organizations).await?;
        Ok(saved)
    }

    /// Deletes an organization.
    pub async fn delete_organization(&self, user: &UserIdentity, id: RecordId) -> AppResult<()> {
        self.access.require(user, Permission::PartnerWrite).await?;

        self.repository.delete_organization(id).await?;
        self.cache.invalidate(CacheScope::Organizations).await
    }

    /// Lists customers for a query.
    pub async fn list_customers(
        &self,
        user: &UserIdentity,
        query: &ListQuery,
    ) -> AppResult<Page<Customer>> {
        self.access.require(user, Permission::PartnerRead).await?;

        let key = query.cache_key();
        if let Some(page) =
            read_cached_page(self.cache.as_ref(), CacheScope::Customers, &key).await?
        {
            return Ok(page);
        }

        let page = self.repository.list_customers(query).await?;
        write_cached_page(self.cache.as_ref(), CacheScope::Customers, key, &page).await?;
        Ok(page)
    }

    /// Fetches one customer.
    pub async fn get_customer(&self, user: &UserIdentity, id: RecordId) -> AppResult<Customer> {
        self.access.require(user, Permission::PartnerRead).await?;
        self.require_customer(id).await
    }

    /// Creates a customer.
    pub async fn create_customer(
        &self,
        user: &UserIdentity,
        draft: CustomerDraft,
    ) -> AppResult<Customer> {
        self.access.require(user, Permission::PartnerWrite).await?;

        let created = self
            .repository
            .create_customer(draft, Some(user.subject()))
            .await?;
        self.cache.invalidate(CacheScope::Customers).await?;
        Ok(created)
    }

    /// Applies a partial update to a customer.
    pub async fn update_customer(
        &self,
        user: &UserIdentity,
        id: RecordId,
        update: CustomerUpdate,
    ) -> AppResult<Customer> {
        self.access.require(user, Permission::PartnerWrite).await?;

        let stored = self.require_customer(id).await?;
        let updated = stored.apply_update(update, Some(user.subject()))?;

        let saved = self.repository.update_customer(updated).await?;
        self.cache.invalidate(CacheScope::Customers).await?;
        Ok(saved)
    }

    /// Deletes a customer and its addresses.
    pub async fn delete_customer(&self, user: &UserIdentity, id: RecordId) -> AppResult<()> {
        self.access.require(user, Permission::PartnerWrite).await?;

        self.repository.delete_customer(id).await?;
        self.cache.invalidate(CacheScope::Customers).await?;
        self.cache.invalidate(CacheScope::CustomerAddresses).await
    }

    /// Lists the addresses of one customer for a query.
    pub async fn list_customer_addresses(
        &self,
        user: &UserIdentity,
        customer_id: RecordId,
        query: &ListQuery,
    ) -> AppResult<Page<CustomerAddress>> {
        self.access.require(user, Permission::PartnerRead).await?;
        self.require_customer(customer_id).await?;

        // The parent identifier is part of the key, so two customers never
        // share cached address pages.
        let key = format!("customer={customer_id}&{}", query.cache_key());
        if let Some(page) =
            read_cached_page(self.cache.as_ref(), CacheScope::CustomerAddresses, &key).await?
        {
            return Ok(page);
        }

        let page = self
            .repository
            .list_customer_addresses(customer_id, query)
            .await?;
        write_cached_page(self.cache.as_ref(), CacheScope::CustomerAddresses, key, &page).await?;
        Ok(page)
    }

    /// Fetches one address belonging to the customer.
    pub async fn get_customer_address(
        &self,
        user: &UserIdentity,
        customer_id: RecordId,
        address_id: RecordId,
    ) -> AppResult<CustomerAddress> {
        self.access.require(user, Permission::PartnerRead).await?;
        self.require_customer(customer_id).await?;

        self.repository
            .find_customer_address(address_id)
            .await?
            .filter(|address| address.customer_id() == customer_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "address {address_id} does not exist for customer {customer_id}"
                ))
            })
    }

    /// Creates an address under an existing customer.
    pub async fn create_customer_address(
        &self,
        user: &UserIdentity,
        draft: CustomerAddressDraft,
    ) -> AppResult<CustomerAddress> {
        self.access.require(user, Permission::PartnerWrite).await?;
        self.require_customer(draft.customer_id()).await?;

        let created = self
            .repository
            .create_customer_address(draft, Some(user.subject()))
            .await?;
        self.cache.invalidate(CacheScope::CustomerAddresses).await?;
        Ok(created)
    }

    /// Applies a partial update to a customer address.
    pub async fn update_customer_address(
        &self,
        user: &UserIdentity,
        customer_id: RecordId,
        address_id: RecordId,
        update: CustomerAddressUpdate,
    ) -> AppResult<CustomerAddress> {
        self.access.require(user, Permission::PartnerWrite).await?;
        self.require_customer(customer_id).await?;

        let stored = self
            .repository
            .find_customer_address(address_id)
            .await?
            .filter(|address| address.customer_id() == customer_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "address {address_id} does not exist for customer {customer_id}"
                ))
            })?;
        let updated = stored.apply_update(update, Some(user.subject()))?;

        let saved = self.repository.update_customer_address(updated).await?;
        self.cache.invalidate(CacheScope::CustomerAddresses).await?;
        Ok(saved)
    }

    /// Deletes a customer address.
    pub async fn delete_customer_address(
        &self,
        user: &UserIdentity,
        customer_id: RecordId,
        address_id: RecordId,
    ) -> AppResult<()> {
        self.access.require(user, Permission::PartnerWrite).await?;
        self.require_customer(customer_id).await?;

        let stored = self
            .repository
            .find_customer_address(address_id)
            .await?
            .filter(|address| address.customer_id() == customer_id);
        if stored.is_none() {
            return Err(AppError::NotFound(format!(
                "address {address_id} does not exist for customer {customer_id}"
            )));
        }

        self.repository.delete_customer_address(address_id).await?;
        self.cache.invalidate(CacheScope::CustomerAddresses).await
    }
}
