//! Pharmadex API composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::collections::HashMap;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use pharmadex_application::{
    AccessPolicy, CatalogService, ListCache, OrderService, PartnerService, SecurityAdminService,
    SecurityRepository, SettingsService,
};
use pharmadex_core::{AppError, UserIdentity};
use pharmadex_infrastructure::{
    InMemoryListCache, PostgresCatalogRepository, PostgresOrderRepository,
    PostgresPartnerRepository, PostgresSecurityRepository, PostgresSettingsRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);

    let access_tokens = parse_access_tokens(&required_env("API_ACCESS_TOKENS")?)?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let list_cache: Arc<dyn ListCache> = Arc::new(InMemoryListCache::new());

    let security_repository: Arc<dyn SecurityRepository> =
        Arc::new(PostgresSecurityRepository::new(pool.clone()));
    let access_policy = AccessPolicy::new(security_repository.clone());

    let catalog_repository = Arc::new(PostgresCatalogRepository::new(pool.clone()));
    let partner_repository = Arc::new(PostgresPartnerRepository::new(pool.clone()));
    let order_repository = Arc::new(PostgresOrderRepository::new(pool.clone()));
    let settings_repository = Arc::new(PostgresSettingsRepository::new(pool.clone()));

    let app_state = AppState {
        catalog_service: CatalogService::new(
            catalog_repository,
            list_cache.clone(),
            access_policy.clone(),
        ),
        partner_service: PartnerService::new(
            partner_repository,
            list_cache.clone(),
            access_policy.clone(),
        ),
        order_service: OrderService::new(
            order_repository,
            list_cache.clone(),
            access_policy.clone(),
        ),
        settings_service: SettingsService::new(
            settings_repository,
            list_cache.clone(),
            access_policy.clone(),
        ),
        security_admin_service: SecurityAdminService::new(
            security_repository,
            list_cache,
            access_policy,
        ),
        access_tokens: Arc::new(access_tokens),
        pool: pool.clone(),
        frontend_url: frontend_url.clone(),
    };

    let protected_routes = Router::new()
        .route(
            "/api/item-types",
            get(handlers::catalog::list_item_types_handler)
                .post(handlers::catalog::create_item_type_handler),
        )
        .route(
            "/api/item-types/{id}",
            get(handlers::catalog::get_item_type_handler)
                .put(handlers::catalog::update_item_type_handler)
                .delete(handlers::catalog::delete_item_type_handler),
        )
        .route(
            "/api/product-groups",
            get(handlers::catalog::list_product_groups_handler)
                .post(handlers::catalog::create_product_group_handler),
        )
        .route(
            "/api/product-groups/{id}",
            get(handlers::catalog::get_product_group_handler)
                .put(handlers::catalog::update_product_group_handler)
                .delete(handlers::catalog::delete_product_group_handler),
        )
        .route(
            "/api/items",
            get(handlers::catalog::list_items_handler)
                .post(handlers::catalog::create_item_handler),
        )
        .route(
            "/api/items/{id}",
            get(handlers::catalog::get_item_handler)
                .put(handlers::catalog::update_item_handler)
                .delete(handlers::catalog::delete_item_handler),
        )
        .route(
            "/api/organizations",
            get(handlers::partners::list_organizations_handler)
                .post(handlers::partners::create_organization_handler),
        )
        .route(
            "/api/organizations/{id}",
            get(handlers::partners::get_organization_handler)
                .put(handlers::partners::update_organization_handler)
                .delete(handlers::partners::delete_organization_handler),
        )
        .route(
            "/api/customers",
            get(handlers::partners::list_customers_handler)
                .post(handlers::partners::create_customer_handler),
        )
        .route(
            "/api/customers/{id}",
            get(handlers::partners::get_customer_handler)
                .put(handlers::partners::update_customer_handler)
                .delete(handlers::partners::delete_customer_handler),
        )
        .route(
            "/api/customers/{customer_id}/addresses",
            get(handlers::partners::list_customer_addresses_handler)
                .post(handlers::partners::create_customer_address_handler),
        )
        .route(
            "/api/customers/{customer_id}/addresses/{address_id}",
            get(handlers::partners::get_customer_address_handler)
                .put(handlers::partners::update_customer_address_handler)
                .delete(handlers::partners::delete_customer_address_handler),
        )
        .route(
            "/api/sales-orders",
            get(handlers::orders::list_sales_orders_handler)
                .post(handlers::orders::create_sales_order_handler),
        )
        .route(
            "/api/sales-orders/{id}",
            get(handlers::orders::get_sales_order_handler)
                .put(handlers::orders::update_sales_order_handler)
                .delete(handlers::orders::delete_sales_order_handler),
        )
        .route(
            "/api/config-settings",
            get(handlers::settings::list_settings_handler)
                .post(handlers::settings::create_setting_handler),
        )
        .route(
            "/api/config-settings/{id}",
            get(handlers::settings::get_setting_handler)
                .put(handlers::settings::update_setting_handler)
                .delete(handlers::settings::delete_setting_handler),
        )
        .route(
            "/api/security/roles",
            get(handlers::security::list_roles_handler)
                .post(handlers::security::create_role_handler),
        )
        .route(
            "/api/security/roles/{id}",
            get(handlers::security::get_role_handler)
                .put(handlers::security::update_role_handler)
                .delete(handlers::security::delete_role_handler),
        )
        .route(
            "/api/security/permissions",
            get(handlers::security::list_permissions_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "pharmadex-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

/// Parses `API_ACCESS_TOKENS` into per-token identities.
///
/// Entries are comma separated; each entry is `token:subject:role|role`.
/// The role list may be empty, leaving the caller with no permissions.
fn parse_access_tokens(raw: &str) -> Result<HashMap<String, UserIdentity>, AppError> {
    let mut tokens = HashMap::new();

    for entry in raw.split(',').filter(|entry| !entry.trim().is_empty()) {
        let mut parts = entry.trim().splitn(3, ':');
        let token = parts.next().unwrap_or_default();
        let subject = parts.next().unwrap_or_default();
        let roles = parts.next().unwrap_or_default();

        if token.is_empty() || subject.is_empty() {
            return Err(AppError::Validation(
                "API_ACCESS_TOKENS entries must look like token:subject:role|role".to_owned(),
            ));
        }

        let roles = roles
            .split('|')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        tokens.insert(
            token.to_owned(),
            UserIdentity::new(subject, subject, None, roles),
        );
    }

    if tokens.is_empty() {
        return Err(AppError::Validation(
            "API_ACCESS_TOKENS must configure at least one token".to_owned(),
        ));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::parse_access_tokens;

    #[test]
    fn access_tokens_resolve_subject_and_roles() {
        let tokens = parse_access_tokens("secret-1:alice:administrator,secret-2:bob:editor|viewer");
        assert!(tokens.is_ok());
        let Ok(tokens) = tokens else { unreachable!() };

        let alice = tokens.get("secret-1");
        assert!(alice.is_some());
        let Some(alice) = alice else { unreachable!() };
        assert_eq!(alice.subject(), "alice");
        assert_eq!(alice.roles(), ["administrator".to_owned()]);

        let bob = tokens.get("secret-2");
        assert!(bob.is_some());
        let Some(bob) = bob else { unreachable!() };
        assert_eq!(bob.roles().len(), 2);
    }

    #[test]
    fn malformed_token_entries_are_rejected() {
        assert!(parse_access_tokens("").is_err());
        assert!(parse_access_tokens("only-a-token").is_err());
        assert!(parse_access_tokens(":missing-token:viewer").is_err());
    }

    #[test]
    fn token_without_roles_still_authenticates() {
        let tokens = parse_access_tokens("secret-1:carol:");
        assert!(tokens.is_ok());
        let Ok(tokens) = tokens else { unreachable!() };
        let carol = tokens.get("secret-1");
        assert!(carol.is_some());
        let Some(carol) = carol else { unreachable!() };
        assert!(carol.roles().is_empty());
    }
}
