use pharmadex_domain::Page;
use serde::Serialize;
use ts_rs::TS;

/// One page of list results with filter-wide counts.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/page-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_count: u32,
}

impl<S, T: From<S>> From<Page<S>> for PageResponse<T> {
    fn from(page: Page<S>) -> Self {
        Self {
            items: page.items.into_iter().map(T::from).collect(),
            total_count: page.total_count,
            page_count: page.page_count,
        }
    }
}

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// One runtime dependency health status.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}
