use chrono::NaiveDate;
use pharmadex_core::{AppError, RecordId};
use pharmadex_domain::{
    DEFAULT_PAGE_SIZE, ListQuery, SalesOrder, SalesOrderDraft, SalesOrderUpdate,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a sales order header.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sales-order-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderResponse {
    pub id: RecordId,
    pub order_number: String,
    pub customer_id: RecordId,
    /// ISO 8601 calendar date, e.g. `2026-03-14`.
    pub order_date: String,
    pub total_amount: Option<f64>,
    pub notes: Option<String>,
    pub created_at: String,
    pub created_by: Option<String>,
    pub updated_at: Option<String>,
    pub updated_by: Option<String>,
}

/// Request payload for creating a sales order.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-sales-order-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalesOrderRequest {
    pub order_number: String,
    pub customer_id: RecordId,
    /// ISO 8601 calendar date, e.g. `2026-03-14`.
    pub order_date: String,
    pub total_amount: Option<f64>,
    pub notes: Option<String>,
}

/// Request payload for partially updating a sales order.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-sales-order-request.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalesOrderRequest {
    pub order_number: Option<String>,
    pub customer_id: Option<RecordId>,
    /// ISO 8601 calendar date, e.g. `2026-03-14`.
    pub order_date: Option<String>,
    pub total_amount: Option<f64>,
    pub notes: Option<String>,
}

/// Query parameters for listing sales orders.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderListParams {
    #[serde(alias = "pageNumber")]
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
    pub customer_id: Option<RecordId>,
}

impl SalesOrderListParams {
    /// Builds the validated list query for this request.
    pub fn into_query(self) -> Result<ListQuery, AppError> {
        let mut query = ListQuery::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .with_search(self.search)
        .with_sort(self.sort_by, self.sort_descending.unwrap_or(false));

        if let Some(customer_id) = self.customer_id {
            query = query.with_filter("customerId", customer_id.to_string());
        }

        Ok(query)
    }
}

fn parse_order_date(value: &str) -> Result<NaiveDate, AppError> {
    value.parse::<NaiveDate>().map_err(|_| {
        AppError::Validation(format!(
            "order date must be an ISO 8601 date, got '{value}'"
        ))
    })
}

impl From<SalesOrder> for SalesOrderResponse {
    fn from(value: SalesOrder) -> Self {
        Self {
            id: value.id(),
            order_number: value.order_number().to_owned(),
            customer_id: value.customer_id(),
            order_date: value.order_date().to_string(),
            total_amount: value.total_amount(),
            notes: value.notes().map(ToOwned::to_owned),
            created_at: value.audit().created_at().to_rfc3339(),
            created_by: value.audit().created_by().map(ToOwned::to_owned),
            updated_at: value.audit().updated_at().map(|at| at.to_rfc3339()),
            updated_by: value.audit().updated_by().map(ToOwned::to_owned),
        }
    }
}

impl TryFrom<CreateSalesOrderRequest> for SalesOrderDraft {
    type Error = AppError;

    fn try_from(value: CreateSalesOrderRequest) -> Result<Self, Self::Error> {
        let order_date = parse_order_date(value.order_date.as_str())?;
        Self::new(
            value.order_number,
            value.customer_id,
            order_date,
            value.total_amount,
            value.notes,
        )
    }
}

impl TryFrom<UpdateSalesOrderRequest> for SalesOrderUpdate {
    type Error = AppError;

    fn try_from(value: UpdateSalesOrderRequest) -> Result<Self, Self::Error> {
        let order_date = value
            .order_date
            .as_deref()
            .map(parse_order_date)
            .transpose()?;

        Ok(Self {
            order_number: value.order_number,
            customer_id: value.customer_id,
            order_date,
            total_amount: value.total_amount,
            notes: value.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::parse_order_date;

    #[test]
    fn order_date_parsing_accepts_iso_dates_only() {
        assert!(parse_order_date("2026-03-14").is_ok());
        assert!(parse_order_date("14.03.2026").is_err());
        assert!(parse_order_date("not-a-date").is_err());
    }
}
