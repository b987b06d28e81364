//! Application services and ports for master-data administration.

#![forbid(unsafe_code)]

mod access;
mod catalog_service;
mod order_service;
mod partner_service;
mod ports;
mod security_admin_service;
mod settings_service;

pub use access::AccessPolicy;
pub use catalog_service::CatalogService;
pub use order_service::OrderService;
pub use partner_service::PartnerService;
pub use ports::{
    CacheScope, CatalogRepository, ListCache, OrderRepository, PartnerRepository,
    SecurityRepository, SettingsRepository, read_cached_page, write_cached_page,
};
pub use security_admin_service::SecurityAdminService;
pub use settings_service::SettingsService;
