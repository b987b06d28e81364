use axum::Json;
use axum::extract::State;

use crate::dto::{HealthDependencyStatus, HealthResponse};
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let postgres = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => HealthDependencyStatus {
            status: "up",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            status: "down",
            detail: Some(error.to_string()),
        },
    };

    let ready = postgres.status == "up";

    Json(HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        ready,
        postgres,
    })
}
