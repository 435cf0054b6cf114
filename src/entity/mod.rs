pub mod audit_logs;
pub mod checkouts;
pub mod email_templates;
pub mod items;
pub mod orders;
pub mod users;
pub mod wishlist_requests;

pub use audit_logs::Entity as AuditLogs;
pub use checkouts::Entity as Checkouts;
pub use email_templates::Entity as EmailTemplates;
pub use items::Entity as Items;
pub use orders::Entity as Orders;
pub use users::Entity as Users;
pub use wishlist_requests::Entity as WishlistRequests;
