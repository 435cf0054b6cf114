use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Item, ItemCategory};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_quantity: i32,
    pub category: ItemCategory,
}

/// Partial update; omitted fields keep their stored values. A lowered
/// `total_quantity` clamps `available_quantity` down with it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_quantity: Option<i32>,
    pub available_quantity: Option<i32>,
    pub category: Option<ItemCategory>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ItemList {
    #[schema(value_type = Vec<Item>)]
    pub items: Vec<Item>,
}
