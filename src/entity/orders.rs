use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub checkout_date: Date,
    pub return_date: Date,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::checkouts::Entity")]
    Checkouts,
    #[sea_orm(has_many = "super::wishlist_requests::Entity")]
    WishlistRequests,
}

impl Related<super::checkouts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Checkouts.def()
    }
}

impl Related<super::wishlist_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WishlistRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
