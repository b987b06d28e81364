//! Domain entities and invariants for pharmaceutical master data.

#![forbid(unsafe_code)]

mod audit;
mod config_setting;
mod customer;
mod item;
mod item_type;
mod organization;
mod product_group;
mod query;
mod sales_order;
mod schema;
mod security;

pub use audit::AuditStamp;
pub use config_setting::{ConfigSetting, ConfigSettingDraft, ConfigSettingUpdate};
pub use customer::{
    Customer, CustomerAddress, CustomerAddressDraft, CustomerAddressUpdate, CustomerDraft,
    CustomerUpdate,
};
pub use item::{Item, ItemDraft, ItemUpdate};
pub use item_type::{ItemType, ItemTypeDraft, ItemTypeUpdate};
pub use organization::{Organization, OrganizationDraft, OrganizationUpdate};
pub use product_group::{ProductGroup, ProductGroupDraft, ProductGroupUpdate};
pub use query::{DEFAULT_PAGE_SIZE, ListQuery, MAX_PAGE_SIZE, Page, paginate};
pub use sales_order::{SalesOrder, SalesOrderDraft, SalesOrderUpdate};
pub use schema::{IntRule, NumberRule, TextRule, validate_email, validate_reference_id};
pub use security::{Permission, Role, RoleDraft, RoleUpdate, SYSTEM_ROLES};
