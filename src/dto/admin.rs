use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Checkout, Item, Order, OrderStatus, WishlistRequest, WishlistStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Pickup is editable only while the order is pending; return for any
/// non-terminal status.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderDatesRequest {
    pub pickup_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteOrdersRequest {
    pub order_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedOrders {
    pub deleted: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FulfillWishlistRequest {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FulfillWishlistResponse {
    pub order: Order,
    pub checkout: Checkout,
    pub wishlist_request: WishlistRequest,
    pub effective_quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutWithItem {
    pub id: Uuid,
    pub quantity: i32,
    pub item: Item,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistItemWithItem {
    pub wishlist_request_id: Uuid,
    pub requested_quantity: i32,
    pub status: WishlistStatus,
    pub requested_pickup_date: NaiveDate,
    pub requested_return_date: NaiveDate,
    pub item: Item,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithDetails {
    pub order: Order,
    pub items: Vec<CheckoutWithItem>,
    pub wishlist_items: Vec<WishlistItemWithItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailsList {
    pub items: Vec<OrderWithDetails>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<Checkout>,
    pub wishlist_requests: Vec<WishlistRequest>,
}
