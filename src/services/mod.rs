pub mod admin_service;
pub mod auth_service;
pub mod item_service;
pub mod order_service;
pub mod wishlist_service;
