use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            CheckoutWithItem, DeleteOrdersRequest, DeletedOrders, FulfillWishlistRequest,
            FulfillWishlistResponse, OrderDetailsList, OrderWithDetails, OrderWithItems,
            UpdateOrderDatesRequest, UpdateOrderStatusRequest, WishlistItemWithItem,
        },
        items::{CreateItemRequest, ItemList, UpdateItemRequest},
        orders::{OrderLineRequest, SubmitOrderRequest, SubmitOrderResponse},
        templates::{TemplateList, UpdateTemplateRequest},
    },
    models::{
        Checkout, EmailTemplate, Item, ItemCategory, Order, OrderStatus, User, WishlistRequest,
        WishlistStatus,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, items, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        orders::submit_order,
        admin::list_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::update_order_dates,
        admin::delete_orders,
        admin::fulfill_wishlist,
        admin::list_templates,
        admin::get_template,
        admin::update_template
    ),
    components(
        schemas(
            User,
            Item,
            ItemCategory,
            Order,
            OrderStatus,
            Checkout,
            WishlistRequest,
            WishlistStatus,
            EmailTemplate,
            ItemList,
            CreateItemRequest,
            UpdateItemRequest,
            OrderLineRequest,
            SubmitOrderRequest,
            SubmitOrderResponse,
            UpdateOrderStatusRequest,
            UpdateOrderDatesRequest,
            DeleteOrdersRequest,
            DeletedOrders,
            FulfillWishlistRequest,
            FulfillWishlistResponse,
            CheckoutWithItem,
            WishlistItemWithItem,
            OrderWithDetails,
            OrderDetailsList,
            OrderWithItems,
            TemplateList,
            UpdateTemplateRequest,
            params::Pagination,
            params::ItemQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Item>,
            ApiResponse<ItemList>,
            ApiResponse<Order>,
            ApiResponse<SubmitOrderResponse>,
            ApiResponse<OrderDetailsList>,
            ApiResponse<FulfillWishlistResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Items", description = "Catalog endpoints"),
        (name = "Orders", description = "Reservation submission"),
        (name = "Admin", description = "Dashboard endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
