use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Fixed category set for reservable items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Apparel,
    Drinkware,
    Signage,
    Print,
    Giveaway,
    Other,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Apparel => "apparel",
            ItemCategory::Drinkware => "drinkware",
            ItemCategory::Signage => "signage",
            ItemCategory::Print => "print",
            ItemCategory::Giveaway => "giveaway",
            ItemCategory::Other => "other",
        }
    }
}

impl FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apparel" => Ok(ItemCategory::Apparel),
            "drinkware" => Ok(ItemCategory::Drinkware),
            "signage" => Ok(ItemCategory::Signage),
            "print" => Ok(ItemCategory::Print),
            "giveaway" => Ok(ItemCategory::Giveaway),
            "other" => Ok(ItemCategory::Other),
            other => Err(format!("unknown item category: {other}")),
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_quantity: i32,
    pub available_quantity: i32,
    pub category: ItemCategory,
    pub created_at: DateTime<Utc>,
}

/// Order lifecycle. Transitions are admin-triggered only; `wishlist_only`
/// becomes `pending` through fulfillment, never through the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    PickedUp,
    Returned,
    Cancelled,
    WishlistOnly,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Returned => "returned",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::WishlistOnly => "wishlist_only",
        }
    }

    /// States an admin may move an order into from `self`. Exhaustive; no
    /// transition may skip a state.
    pub fn allowed_next(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::PickedUp, OrderStatus::Cancelled],
            OrderStatus::PickedUp => &[OrderStatus::Returned],
            OrderStatus::Returned => &[],
            OrderStatus::Cancelled => &[],
            OrderStatus::WishlistOnly => &[OrderStatus::Cancelled],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "picked_up" => Ok(OrderStatus::PickedUp),
            "returned" => Ok(OrderStatus::Returned),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "wishlist_only" => Ok(OrderStatus::WishlistOnly),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WishlistStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

impl WishlistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WishlistStatus::Pending => "pending",
            WishlistStatus::Fulfilled => "fulfilled",
            WishlistStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for WishlistStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WishlistStatus::Pending),
            "fulfilled" => Ok(WishlistStatus::Fulfilled),
            "cancelled" => Ok(WishlistStatus::Cancelled),
            other => Err(format!("unknown wishlist status: {other}")),
        }
    }
}

impl fmt::Display for WishlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub checkout_date: NaiveDate,
    pub return_date: NaiveDate,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Checkout {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WishlistRequest {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub requested_quantity: i32,
    pub requested_pickup_date: NaiveDate,
    pub requested_return_date: NaiveDate,
    pub event_start_date: NaiveDate,
    pub event_end_date: NaiveDate,
    pub status: WishlistStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct EmailTemplate {
    pub template_id: String,
    pub subject: String,
    pub body_html: String,
    pub updated_at: DateTime<Utc>,
}
