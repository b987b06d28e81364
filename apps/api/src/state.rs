use std::collections::HashMap;
use std::sync::Arc;

use pharmadex_application::{
    CatalogService, OrderService, PartnerService, SecurityAdminService, SettingsService,
};
use pharmadex_core::UserIdentity;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub partner_service: PartnerService,
    pub order_service: OrderService,
    pub settings_service: SettingsService,
    pub security_admin_service: SecurityAdminService,
    /// Identities resolved from configured API access tokens.
    pub access_tokens: Arc<HashMap<String, UserIdentity>>,
    pub pool: PgPool,
    pub frontend_url: String,
}
