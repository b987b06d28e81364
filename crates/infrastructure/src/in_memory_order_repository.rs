use std::collections::HashMap;

use async_trait::async_trait;
use pharmadex_application::OrderRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{AuditStamp, ListQuery, Page, SalesOrder, SalesOrderDraft, paginate};
use tokio::sync::RwLock;

#[derive(Default)]
struct OrderState {
    orders: HashMap<RecordId, SalesOrder>,
    next_id: RecordId,
}

/// In-memory sales order adapter used by tests and local tooling.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    state: RwLock<OrderState>,
}

impl InMemoryOrderRepository {
    /// Creates an empty order store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(search: Option<&str>, order: &SalesOrder) -> bool {
    let Some(term) = search else {
        return true;
    };
    let term = term.to_lowercase();

    order.order_number().to_lowercase().contains(&term)
        || order
            .notes()
            .is_some_and(|notes| notes.to_lowercase().contains(&term))
}

fn sort_orders(rows: &mut [SalesOrder], query: &ListQuery) -> AppResult<()> {
    match query.sort_by().unwrap_or("orderNumber") {
        "orderNumber" => rows.sort_by(|left, right| left.order_number().cmp(right.order_number())),
        "orderDate" => rows.sort_by_key(SalesOrder::order_date),
        "totalAmount" => rows.sort_by(|left, right| {
            left.total_amount()
                .partial_cmp(&right.total_amount())
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
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
impl OrderRepository for InMemoryOrderRepository {
    async fn list_sales_orders(&self, query: &ListQuery) -> AppResult<Page<SalesOrder>> {
        let customer_id = query.id_filter("customerId")?;

        let state = self.state.read().await;
        let mut rows = state
            .orders
            .values()
            .filter(|row| matches_search(query.search(), row))
            .filter(|row| customer_id.is_none_or(|wanted| row.customer_id() == wanted))
            .cloned()
            .collect::<Vec<_>>();
        drop(state);

        sort_orders(&mut rows, query)?;
        Ok(paginate(rows, query))
    }

    async fn find_sales_order(&self, id: RecordId) -> AppResult<Option<SalesOrder>> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }

    async fn create_sales_order(
        &self,
        draft: SalesOrderDraft,
        created_by: Option<&str>,
    ) -> AppResult<SalesOrder> {
        let mut state = self.state.write().await;
        if state
            .orders
            .values()
            .any(|row| row.order_number() == draft.order_number())
        {
            return Err(AppError::Conflict(format!(
                "order number '{}' is already taken",
                draft.order_number()
            )));
        }

        state.next_id += 1;
        let id = state.next_id;
        let created = SalesOrder::new(id, draft, AuditStamp::created_now(created_by));
        state.orders.insert(id, created.clone());
        Ok(created)
    }

    async fn update_sales_order(&self, order: SalesOrder) -> AppResult<SalesOrder> {
        let mut state = self.state.write().await;
        if !state.orders.contains_key(&order.id()) {
            return Err(AppError::NotFound(format!(
                "sales order {} does not exist",
                order.id()
            )));
        }
        if state
            .orders
            .values()
            .any(|row| row.id() != order.id() && row.order_number() == order.order_number())
        {
            return Err(AppError::Conflict(format!(
                "order number '{}' is already taken",
                order.order_number()
            )));
        }

        state.orders.insert(order.id(), order.clone());
        Ok(order)
    }

    async fn delete_sales_order(&self, id: RecordId) -> AppResult<()> {
        if self.state.write().await.orders.remove(&id).is_none() {
            return Err(AppError::NotFound(format!(
                "sales order {id} does not exist"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pharmadex_application::OrderRepository;
    use pharmadex_domain::{ListQuery, SalesOrderDraft};

    use super::InMemoryOrderRepository;

    fn order_draft(order_number: &str, customer_id: i64, day: u32) -> SalesOrderDraft {
        let order_date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap_or_default();
        SalesOrderDraft::new(order_number, customer_id, order_date, Some(100.0), None)
            .unwrap_or_else(|_| unreachable!())
    }

    fn query(page: u32, page_size: u32) -> ListQuery {
        ListQuery::new(page, page_size).unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn customer_filter_narrows_the_listing() {
        let repository = InMemoryOrderRepository::new();
        for (number, customer_id, day) in [("SO-1", 1, 1), ("SO-2", 2, 2), ("SO-3", 1, 3)] {
            let created = repository
                .create_sales_order(order_draft(number, customer_id, day), None)
                .await;
            assert!(created.is_ok());
        }

        let listed = repository
            .list_sales_orders(&query(1, 25).with_filter("customerId", "1"))
            .await;
        assert!(listed.is_ok());
        let Ok(listed) = listed else { unreachable!() };
        assert_eq!(listed.total_count, 2);
    }

    #[tokio::test]
    async fn order_numbers_are_unique() {
        let repository = InMemoryOrderRepository::new();

        let first = repository
            .create_sales_order(order_draft("SO-1", 1, 1), None)
            .await;
        assert!(first.is_ok());

        let duplicate = repository
            .create_sales_order(order_draft("SO-1", 2, 2), None)
            .await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn sorting_by_order_date_descending() {
        let repository = InMemoryOrderRepository::new();
        for (number, day) in [("SO-1", 5), ("SO-2", 20), ("SO-3", 11)] {
            let created = repository
                .create_sales_order(order_draft(number, 1, day), None)
                .await;
            assert!(created.is_ok());
        }

        let listed = repository
            .list_sales_orders(&query(1, 25).with_sort(Some("orderDate".to_owned()), true))
            .await;
        assert!(listed.is_ok());
        let Ok(listed) = listed else { unreachable!() };
        let numbers = listed
            .items
            .iter()
            .map(|order| order.order_number().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec!["SO-2", "SO-3", "SO-1"]);
    }
}
