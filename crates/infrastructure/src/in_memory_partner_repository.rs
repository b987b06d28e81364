use std::collections::HashMap;

use async_trait::async_trait;
use pharmadex_application::PartnerRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{
    AuditStamp, Customer, CustomerAddress, CustomerAddressDraft, CustomerDraft, ListQuery,
    Organization, OrganizationDraft, Page, paginate,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct PartnerState {
    organizations: HashMap<RecordId, Organization>,
    customers: HashMap<RecordId, Customer>,
    addresses: HashMap<RecordId, CustomerAddress>,
    next_id: RecordId,
}

impl PartnerState {
    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory trading partner adapter used by tests and local tooling.
#[derive(Default)]
pub struct InMemoryPartnerRepository {
    state: RwLock<PartnerState>,
}

impl InMemoryPartnerRepository {
    /// Creates an empty partner store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(search: Option<&str>, code: &str, name: &str) -> bool {
    let Some(term) = search else {
        return true;
    };
    let term = term.to_lowercase();

    code.to_lowercase().contains(&term) || name.to_lowercase().contains(&term)
}

fn address_matches_search(search: Option<&str>, address: &CustomerAddress) -> bool {
    let Some(term) = search else {
        return true;
    };
    let term = term.to_lowercase();

    [
        address.line1(),
        address.city(),
        address.postal_code(),
        address.country(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

fn sort_organizations(rows: &mut [Organization], query: &ListQuery) -> AppResult<()> {
    match query.sort_by().unwrap_or("code") {
        "code" => rows.sort_by(|left, right| left.code().cmp(right.code())),
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

fn sort_customers(rows: &mut [Customer], query: &ListQuery) -> AppResult<()> {
    match query.sort_by().unwrap_or("code") {
        "code" => rows.sort_by(|left, right| left.code().cmp(right.code())),
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

fn sort_addresses(rows: &mut [CustomerAddress], query: &ListQuery) -> AppResult<()> {
    match query.sort_by().unwrap_or("city") {
        "city" => rows.sort_by(|left, right| left.city().cmp(right.city())),
        "country" => rows.sort_by(|left, right| left.country().cmp(right.country())),
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
impl PartnerRepository for InMemoryPartnerRepository {
    async fn list_organizations(&self, query: &ListQuery) -> AppResult<Page<Organization>> {
        let is_active = query.bool_filter("isActive")?;

        let state = self.state.read().await;
        let mut rows = state
            .organizations
            .values()
            .filter(|row| matches_search(query.search(), row.code(), row.name()))
            .filter(|row| is_active.is_none_or(|wanted| row.is_active() == wanted))
            .cloned()
            .collect::<Vec<_>>();
        drop(state);

        sort_organizations(&mut rows, query)?;
        Ok(paginate(rows, query))
    }

    async fn find_organization(&self, id: RecordId) -> AppResult<Option<Organization>> {
        Ok(self.state.read().await.organizations.get(&id).cloned())
    }

    async fn create_organization(
        &self,
        draft: OrganizationDraft,
        created_by: Option<&str>,
    ) -> AppResult<Organization> {
        let mut state = self.state.write().await;
        if state
            .organizations
            .values()
            .any(|row| row.code() == draft.code())
        {
            return Err(AppError::Conflict(format!(
                "organization code '{}' is already taken",
                draft.code()
            )));
        }

        let id = state.allocate_id();
        let created = Organization::new(id, draft, AuditStamp::created_now(created_by));
        state.organizations.insert(id, created.clone());
        Ok(created)
    }

    async fn update_organization(&self, organization: Organization) -> AppResult<Organization> {
        let mut state = self.state.write().await;
        if !state.organizations.contains_key(&organization.id()) {
            return Err(AppError::NotFound(format!(
                "organization {} does not exist",
                organization.id()
            )));
        }
        if state
            .organizations
            .values()
            .any(|row| row.id() != organization.id() && row.code() == organization.code())
        {
            return Err(AppError::Conflict(format!(
                "organization code '{}' is already taken",
                organization.code()
            )));
        }

        state
            .organizations
            .insert(organization.id(), organization.clone());
        Ok(organization)
    }

    async fn delete_organization(&self, id: RecordId) -> AppResult<()> {
        if self.state.write().await.organizations.remove(&id).is_none() {
            return Err(AppError::NotFound(format!(
                "organization {id} does not exist"
            )));
        }

        Ok(())
    }

    async fn list_customers(&self, query: &ListQuery) -> AppResult<Page<Customer>> {
        let is_active = query.bool_filter("isActive")?;

        let state = self.state.read().await;
        let mut rows = state
            .customers
            .values()
            .filter(|row| matches_search(query.search(), row.code(), row.name()))
            .filter(|row| is_active.is_none_or(|wanted| row.is_active() == wanted))
            .cloned()
            .collect::<Vec<_>>();
        drop(state);

        sort_customers(&mut rows, query)?;
        Ok(paginate(rows, query))
    }

    async fn find_customer(&self, id: RecordId) -> AppResult<Option<Customer>> {
        Ok(self.state.read().await.customers.get(&id).cloned())
    }

    async fn create_customer(
        &self,
        draft: CustomerDraft,
        created_by: Option<&str>,
    ) -> AppResult<Customer> {
        let mut state = self.state.write().await;
        if state
            .customers
            .values()
            .any(|row| row.code() == draft.code())
        {
            return Err(AppError::Conflict(format!(
                "customer code '{}' is already taken",
                draft.code()
            )));
        }

        let id = state.allocate_id();
        let created = Customer::new(id, draft, AuditStamp::created_now(created_by));
        state.customers.insert(id, created.clone());
        Ok(created)
    }

    async fn update_customer(&self, customer: Customer) -> AppResult<Customer> {
        let mut state = self.state.write().await;
        if !state.customers.contains_key(&customer.id()) {
            return Err(AppError::NotFound(format!(
                "customer {} does not exist",
                customer.id()
            )));
        }
        if state
            .customers
            .values()
            .any(|row| row.id() != customer.id() && row.code() == customer.code())
        {
            return Err(AppError::Conflict(format!(
                "customer code '{}' is already taken",
                customer.code()
            )));
        }

        state.customers.insert(customer.id(), customer.clone());
        Ok(customer)
    }

    async fn delete_customer(&self, id: RecordId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.customers.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("customer {id} does not exist")));
        }

        // Addresses never outlive their customer.
        state
            .addresses
            .retain(|_, address| address.customer_id() != id);
        Ok(())
    }

    async fn list_customer_addresses(
        &self,
        customer_id: RecordId,
        query: &ListQuery,
    ) -> AppResult<Page<CustomerAddress>> {
        let is_primary = query.bool_filter("isPrimary")?;

        let state = self.state.read().await;
        let mut rows = state
            .addresses
            .values()
            .filter(|row| row.customer_id() == customer_id)
            .filter(|row| address_matches_search(query.search(), row))
            .filter(|row| is_primary.is_none_or(|wanted| row.is_primary() == wanted))
            .cloned()
            .collect::<Vec<_>>();
        drop(state);

        sort_addresses(&mut rows, query)?;
        Ok(paginate(rows, query))
    }

    async fn find_customer_address(&self, id: RecordId) -> AppResult<Option<CustomerAddress>> {
        Ok(self.state.read().await.addresses.get(&id).cloned())
    }

    async fn create_customer_address(
        &self,
        draft: CustomerAddressDraft,
        created_by: Option<&str>,
    ) -> AppResult<CustomerAddress> {
        let mut state = self.state.write().await;
        if !state.customers.contains_key(&draft.customer_id()) {
            return Err(AppError::NotFound(format!(
                "customer {} does not exist",
                draft.customer_id()
            )));
        }

        let id = state.allocate_id();
        let created = CustomerAddress::new(id, draft, AuditStamp::created_now(created_by));
        state.addresses.insert(id, created.clone());
        Ok(created)
    }

    async fn update_customer_address(
        &self,
        address: CustomerAddress,
    ) -> AppResult<CustomerAddress> {
        let mut state = self.state.write().await;
        if !state.addresses.contains_key(&address.id()) {
            return Err(AppError::NotFound(format!(
                "address {} does not exist",
                address.id()
            )));
        }

        state.addresses.insert(address.id(), address.clone());
        Ok(address)
    }

    async fn delete_customer_address(&self, id: RecordId) -> AppResult<()> {
        if self.state.write().await.addresses.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("address {id} does not exist")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pharmadex_application::PartnerRepository;
    use pharmadex_domain::{CustomerAddressDraft, CustomerDraft, ListQuery};

    use super::InMemoryPartnerRepository;

    fn customer_draft(code: &str, name: &str) -> CustomerDraft {
        CustomerDraft::new(code, name, None, None, None, true)
            .unwrap_or_else(|_| unreachable!())
    }

    fn address_draft(customer_id: i64, city: &str, is_primary: bool) -> CustomerAddressDraft {
        CustomerAddressDraft::new(customer_id, "Main St 1", None, city, "10115", "DE", is_primary)
            .unwrap_or_else(|_| unreachable!())
    }

    fn query(page: u32, page_size: u32) -> ListQuery {
        ListQuery::new(page, page_size).unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn address_listing_is_scoped_to_its_customer() {
        let repository = InMemoryPartnerRepository::new();

        let first = repository
            .create_customer(customer_draft("CUST-01", "Acme Pharma"), None)
            .await;
        assert!(first.is_ok());
        let Ok(first) = first else { unreachable!() };
        let second = repository
            .create_customer(customer_draft("CUST-02", "Nordmed"), None)
            .await;
        assert!(second.is_ok());
        let Ok(second) = second else { unreachable!() };

        for (customer_id, city) in [(first.id(), "Berlin"), (second.id(), "Hamburg")] {
            let created = repository
                .create_customer_address(address_draft(customer_id, city, true), None)
                .await;
            assert!(created.is_ok());
        }

        let listed = repository
            .list_customer_addresses(first.id(), &query(1, 25))
            .await;
        assert!(listed.is_ok());
        let Ok(listed) = listed else { unreachable!() };
        assert_eq!(listed.total_count, 1);
        assert_eq!(listed.items[0].city(), "Berlin");
    }

    #[tokio::test]
    async fn address_creation_requires_existing_customer() {
        let repository = InMemoryPartnerRepository::new();
        let created = repository
            .create_customer_address(address_draft(99, "Berlin", true), None)
            .await;
        assert!(created.is_err());
    }

    #[tokio::test]
    async fn deleting_a_customer_removes_its_addresses() {
        let repository = InMemoryPartnerRepository::new();

        let customer = repository
            .create_customer(customer_draft("CUST-01", "Acme Pharma"), None)
            .await;
        assert!(customer.is_ok());
        let Ok(customer) = customer else { unreachable!() };

        let address = repository
            .create_customer_address(address_draft(customer.id(), "Berlin", true), None)
            .await;
        assert!(address.is_ok());
        let Ok(address) = address else { unreachable!() };

        assert!(repository.delete_customer(customer.id()).await.is_ok());

        let found = repository.find_customer_address(address.id()).await;
        assert!(found.is_ok_and(|value| value.is_none()));
    }
}
