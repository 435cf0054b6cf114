use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Checkout, Order, WishlistRequest};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub item_id: Uuid,
    pub quantity: i32,
}

/// One combined reservation request: requester identity, the pickup/return
/// window, the event-usage window, and the selected item lines. Lines are
/// split into checkouts and wishlist requests server-side based on current
/// availability.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitOrderRequest {
    pub user_name: String,
    pub user_email: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub event_start_date: NaiveDate,
    pub event_end_date: NaiveDate,
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitOrderResponse {
    pub order: Order,
    pub checkouts: Vec<Checkout>,
    pub wishlist_requests: Vec<WishlistRequest>,
}
