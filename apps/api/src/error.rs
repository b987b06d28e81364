use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pharmadex_core::AppError;
use serde::Serialize;
use ts_rs::TS;

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error payload returned by every failed request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP wrapper around application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = Json(ErrorResponse {
            message: self.0.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use pharmadex_core::AppError;

    use super::status_for;

    #[test]
    fn error_categories_map_to_distinct_statuses() {
        assert_eq!(
            status_for(&AppError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::Conflict("duplicate code".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&AppError::Unauthorized("invalid access token".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&AppError::Forbidden("missing permission".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&AppError::NotFound("item 42 does not exist".into())),
            StatusCode::NOT_FOUND
        );
    }
}
