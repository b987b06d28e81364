//! Repository and cache ports implemented by the infrastructure crate.

mod catalog;
mod list_cache;
mod orders;
mod partners;
mod security;
mod settings;

pub use catalog::CatalogRepository;
pub use list_cache::{CacheScope, ListCache, read_cached_page, write_cached_page};
pub use orders::OrderRepository;
pub use partners::PartnerRepository;
pub use security::SecurityRepository;
pub use settings::SettingsRepository;
