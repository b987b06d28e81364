mod catalog;
mod common;
mod orders;
mod partners;
mod security;
mod settings;

pub use catalog::{
    CreateItemRequest, CreateItemTypeRequest, CreateProductGroupRequest, ItemListParams,
    ItemResponse, ItemTypeListParams, ItemTypeResponse, ProductGroupListParams,
    ProductGroupResponse, UpdateItemRequest, UpdateItemTypeRequest, UpdateProductGroupRequest,
};
pub use common::{HealthDependencyStatus, HealthResponse, PageResponse};
pub use orders::{
    CreateSalesOrderRequest, SalesOrderListParams, SalesOrderResponse, UpdateSalesOrderRequest,
};
pub use partners::{
    CreateCustomerAddressRequest, CreateCustomerRequest, CreateOrganizationRequest,
    CustomerAddressListParams, CustomerAddressResponse, CustomerResponse, OrganizationResponse,
    PartnerListParams, UpdateCustomerAddressRequest, UpdateCustomerRequest,
    UpdateOrganizationRequest,
};
pub use security::{CreateRoleRequest, RoleListParams, RoleResponse, UpdateRoleRequest};
pub use settings::{
    ConfigSettingListParams, ConfigSettingResponse, CreateConfigSettingRequest,
    UpdateConfigSettingRequest,
};

#[cfg(test)]
mod tests {
    use pharmadex_domain::{AuditStamp, ItemType, ItemTypeDraft, Page};

    use super::{ItemTypeListParams, ItemTypeResponse, PageResponse};

    #[test]
    fn list_params_carry_filters_into_the_query() {
        let params = ItemTypeListParams {
            page: Some(2),
            page_size: Some(50),
            search: Some("raw".to_owned()),
            sort_by: Some("name".to_owned()),
            sort_descending: Some(true),
            is_active: Some(true),
            parent_type_id: Some(7),
        };

        let query = params.into_query();
        assert!(query.is_ok());
        let Ok(query) = query else { unreachable!() };
        assert_eq!(query.page(), 2);
        assert_eq!(query.filter("isActive"), Some("true"));
        assert_eq!(query.filter("parentTypeId"), Some("7"));
        assert_eq!(query.sort_by(), Some("name"));
        assert!(query.sort_descending());
    }

    #[test]
    fn list_params_default_to_the_first_page() {
        let query = ItemTypeListParams::default().into_query();
        assert!(query.is_ok());
        let Ok(query) = query else { unreachable!() };
        assert_eq!(query.page(), 1);
        assert!(query.search().is_none());
    }

    #[test]
    fn page_response_keeps_the_counts() {
        let draft = ItemTypeDraft::new("RM", "Raw Material", None, None, true);
        assert!(draft.is_ok());
        let Ok(draft) = draft else { unreachable!() };
        let page = Page::new(
            vec![ItemType::new(1, draft, AuditStamp::created_now(None))],
            41,
            25,
        );

        let response: PageResponse<ItemTypeResponse> = page.into();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.total_count, 41);
        assert_eq!(response.page_count, 2);
    }
}
