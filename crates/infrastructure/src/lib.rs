//! Storage and cache adapters for the Pharmadex application ports.
//!
//! Each repository port has a PostgreSQL adapter for production and an
//! in-memory adapter used by tests and local tooling.

#![forbid(unsafe_code)]

mod in_memory_catalog_repository;
mod in_memory_list_cache;
mod in_memory_order_repository;
mod in_memory_partner_repository;
mod in_memory_security_repository;
mod in_memory_settings_repository;
mod postgres_catalog_repository;
mod postgres_list_helpers;
mod postgres_order_repository;
mod postgres_partner_repository;
mod postgres_security_repository;
mod postgres_settings_repository;

pub use in_memory_catalog_repository::InMemoryCatalogRepository;
pub use in_memory_list_cache::InMemoryListCache;
pub use in_memory_order_repository::InMemoryOrderRepository;
pub use in_memory_partner_repository::InMemoryPartnerRepository;
pub use in_memory_security_repository::InMemorySecurityRepository;
pub use in_memory_settings_repository::InMemorySettingsRepository;
pub use postgres_catalog_repository::PostgresCatalogRepository;
pub use postgres_order_repository::PostgresOrderRepository;
pub use postgres_partner_repository::PostgresPartnerRepository;
pub use postgres_security_repository::PostgresSecurityRepository;
pub use postgres_settings_repository::PostgresSettingsRepository;
