use std::collections::HashMap;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use pharmadex_core::{AppError, UserIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = resolve_identity(request.headers(), &state.access_tokens)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn resolve_identity(
    headers: &HeaderMap,
    tokens: &HashMap<String, UserIdentity>,
) -> Result<UserIdentity, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    tokens
        .get(token)
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("invalid access token".to_owned()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::http::{HeaderMap, HeaderValue, header};
    use pharmadex_core::{AppError, UserIdentity};

    use super::resolve_identity;

    fn tokens() -> HashMap<String, UserIdentity> {
        HashMap::from([(
            "secret-1".to_owned(),
            UserIdentity::new("alice", "alice", None, vec!["viewer".to_owned()]),
        )])
    }

    fn headers(authorization: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = authorization {
            headers.insert(
                header::AUTHORIZATION,
                HeaderValue::from_str(value).unwrap_or_else(|_| unreachable!()),
            );
        }
        headers
    }

    #[test]
    fn missing_authorization_header_is_rejected() {
        let result = resolve_identity(&headers(None), &tokens());
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let result = resolve_identity(&headers(Some("Basic secret-1")), &tokens());
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn unknown_token_is_rejected() {
        let result = resolve_identity(&headers(Some("Bearer wrong-token")), &tokens());
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn known_token_resolves_the_identity() {
        let result = resolve_identity(&headers(Some("Bearer secret-1")), &tokens());
        assert!(result.is_ok());
        let Ok(identity) = result else { unreachable!() };
        assert_eq!(identity.subject(), "alice");
        assert_eq!(identity.roles(), ["viewer".to_owned()]);
    }
}
