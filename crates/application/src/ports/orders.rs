use async_trait::async_trait;
use pharmadex_core::{AppResult, RecordId};
use pharmadex_domain::{ListQuery, Page, SalesOrder, SalesOrderDraft};

/// Repository port for sales orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Lists sales orders for a query.
    async fn list_sales_orders(&self, query: &ListQuery) -> AppResult<Page<SalesOrder>>;

    /// Looks up one sales order by identifier.
    async fn find_sales_order(&self, id: RecordId) -> AppResult<Option<SalesOrder>>;

    /// Persists a new sales order.
    async fn create_sales_order(
        &self,
        draft: SalesOrderDraft,
        created_by: Option<&str>,
    ) -> AppResult<SalesOrder>;

    /// Replaces a stored sales order with the provided state.
    async fn update_sales_order(&self, order: SalesOrder) -> AppResult<SalesOrder>;

    /// Deletes one sales order by identifier.
    async fn delete_sales_order(&self, id: RecordId) -> AppResult<()>;
}
