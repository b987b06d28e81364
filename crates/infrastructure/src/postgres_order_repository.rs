use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use pharmadex_application::OrderRepository;
use pharmadex_core::{AppError, AppResult, RecordId};
use pharmadex_domain::{AuditStamp, ListQuery, Page, SalesOrder, SalesOrderDraft};

use crate::postgres_list_helpers::{conflict_on_unique, internal, sort_direction};

/// PostgreSQL-backed sales order repository.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SalesOrderRow {
    id: i64,
    order_number: String,
    customer_id: i64,
    order_date: NaiveDate,
    total_amount: Option<f64>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<String>,
}

impl TryFrom<SalesOrderRow> for SalesOrder {
    type Error = AppError;

    fn try_from(row: SalesOrderRow) -> Result<Self, Self::Error> {
        let draft = SalesOrderDraft::new(
            row.order_number,
            row.customer_id,
            row.order_date,
            row.total_amount,
            row.notes,
        )
        .map_err(|error| {
            AppError::Internal(format!("stored sales order {} is invalid: {error}", row.id))
        })?;

        Ok(Self::new(
            row.id,
            draft,
            AuditStamp::from_parts(row.created_at, row.created_by, row.updated_at, row.updated_by),
        ))
    }
}

const ORDER_COLUMNS: &str = "id, order_number, customer_id, order_date, total_amount, notes, \
     created_at, created_by, updated_at, updated_by";

fn order_sort_column(sort_by: Option<&str>) -> AppResult<&'static str> {
    match sort_by.unwrap_or("orderNumber") {
        "orderNumber" => Ok("order_number"),
        "orderDate" => Ok("order_date"),
        "totalAmount" => Ok("total_amount"),
        "createdAt" => Ok("created_at"),
        other => Err(AppError::Validation(format!(
            "unsupported sort field '{other}'"
        ))),
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn list_sales_orders(&self, query: &ListQuery) -> AppResult<Page<SalesOrder>> {
        let customer_id = query.id_filter("customerId")?;
        let column = order_sort_column(query.sort_by())?;
        let direction = sort_direction(query.sort_descending());

        let where_clause = "WHERE ($1::text IS NULL OR order_number ILIKE '%' || $1 || '%' \
                  OR notes ILIKE '%' || $1 || '%') \
             AND ($2::bigint IS NULL OR customer_id = $2)";

        let total_count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM sales_orders {where_clause}"
        ))
        .bind(query.search())
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(internal("failed to count sales orders"))?;

        let rows = sqlx::query_as::<_, SalesOrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM sales_orders {where_clause} \
             ORDER BY {column} {direction}, id LIMIT $3 OFFSET $4"
        ))
        .bind(query.search())
        .bind(customer_id)
        .bind(query.limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(internal("failed to list sales orders"))?;

        let items = rows
            .into_iter()
            .map(SalesOrder::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Page::new(items, total_count as u64, query.page_size()))
    }

    async fn find_sales_order(&self, id: RecordId) -> AppResult<Option<SalesOrder>> {
        let row = sqlx::query_as::<_, SalesOrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM sales_orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal("failed to load sales order"))?;

        row.map(SalesOrder::try_from).transpose()
    }

    async fn create_sales_order(
        &self,
        draft: SalesOrderDraft,
        created_by: Option<&str>,
    ) -> AppResult<SalesOrder> {
        let staged = SalesOrder::new(0, draft, AuditStamp::created_now(created_by));
        let conflict = format!(
            "order number '{}' is already taken",
            staged.order_number()
        );

        let row = sqlx::query_as::<_, SalesOrderRow>(&format!(
            "INSERT INTO sales_orders (order_number, customer_id, order_date, total_amount, \
                 notes, created_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(staged.order_number())
        .bind(staged.customer_id())
        .bind(staged.order_date())
        .bind(staged.total_amount())
        .bind(staged.notes())
        .bind(staged.audit().created_at())
        .bind(staged.audit().created_by())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to create sales order"))?;

        SalesOrder::try_from(row)
    }

    async fn update_sales_order(&self, order: SalesOrder) -> AppResult<SalesOrder> {
        let conflict = format!("order number '{}' is already taken", order.order_number());

        let row = sqlx::query_as::<_, SalesOrderRow>(&format!(
            "UPDATE sales_orders \
             SET order_number = $2, customer_id = $3, order_date = $4, total_amount = $5, \
                 notes = $6, updated_at = $7, updated_by = $8 \
             WHERE id = $1 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.id())
        .bind(order.order_number())
        .bind(order.customer_id())
        .bind(order.order_date())
        .bind(order.total_amount())
        .bind(order.notes())
        .bind(order.audit().updated_at())
        .bind(order.audit().updated_by())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| conflict_on_unique(error, conflict, "failed to update sales order"))?
        .ok_or_else(|| {
            AppError::NotFound(format!("sales order {} does not exist", order.id()))
        })?;

        SalesOrder::try_from(row)
    }

    async fn delete_sales_order(&self, id: RecordId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM sales_orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(internal("failed to delete sales order"))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "sales order {id} does not exist"
            )));
        }

        Ok(())
    }
}
