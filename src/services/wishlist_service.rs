use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::admin::{FulfillWishlistRequest, FulfillWishlistResponse},
    entity::{
        checkouts::{ActiveModel as CheckoutActive, Column as CheckoutCol, Entity as Checkouts},
        items::{ActiveModel as ItemActive, Entity as Items},
        orders::{ActiveModel as OrderActive, Entity as Orders},
        wishlist_requests::{Column as WishlistCol, Entity as WishlistRequests},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{OrderStatus, WishlistStatus},
    notify::{self, Notification},
    response::{ApiResponse, Meta},
    services::order_service::{checkout_from_entity, order_from_entity, wishlist_from_entity},
    state::AppState,
};

/// Convert a pending wishlist request into a real checkout against newly
/// available stock. Everything happens in one transaction: the
/// `wishlist_only -> pending` promotion, the status compare-and-swap, the
/// checkout upsert, and the stock decrement. A concurrent second attempt
/// loses the CAS and is rejected, never double-applied.
pub async fn fulfill_wishlist_item(
    state: &AppState,
    user: &AuthUser,
    wishlist_request_id: Uuid,
    payload: FulfillWishlistRequest,
) -> AppResult<ApiResponse<FulfillWishlistResponse>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;

    let request = WishlistRequests::find_by_id(wishlist_request_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let request = match request {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let request_status = request
        .status
        .parse::<WishlistStatus>()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
    if request_status != WishlistStatus::Pending {
        return Err(AppError::Conflict(format!(
            "wishlist request is already {request_status}"
        )));
    }
    if request.order_id != payload.order_id {
        return Err(AppError::Conflict(
            "wishlist request does not belong to the target order".into(),
        ));
    }

    let order = Orders::find_by_id(payload.order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let order_status = order
        .status
        .parse::<OrderStatus>()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
    if order_status != OrderStatus::Pending && order_status != OrderStatus::WishlistOnly {
        return Err(AppError::Conflict(format!(
            "order in status {order_status} can no longer accept fulfillments"
        )));
    }

    let item = Items::find_by_id(request.item_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let effective_quantity = request.requested_quantity.min(item.available_quantity);
    if effective_quantity <= 0 {
        return Err(AppError::Conflict(
            "no stock available to fulfill this request".into(),
        ));
    }

    // A wishlist-only order becomes a real order the moment any item is
    // fulfilled into it; the promotion lands before the checkout does.
    let order = if order_status == OrderStatus::WishlistOnly {
        let mut active: OrderActive = order.into();
        active.status = Set(OrderStatus::Pending.as_str().to_string());
        active.update(&txn).await?
    } else {
        order
    };

    let cas = WishlistRequests::update_many()
        .col_expr(
            WishlistCol::Status,
            Expr::value(WishlistStatus::Fulfilled.as_str()),
        )
        .filter(WishlistCol::Id.eq(request.id))
        .filter(WishlistCol::Status.eq(WishlistStatus::Pending.as_str()))
        .exec(&txn)
        .await?;
    if cas.rows_affected == 0 {
        return Err(AppError::Conflict(
            "wishlist request was already fulfilled".into(),
        ));
    }

    let existing_checkout = Checkouts::find()
        .filter(CheckoutCol::OrderId.eq(order.id))
        .filter(CheckoutCol::ItemId.eq(request.item_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;

    let checkout = match existing_checkout {
        Some(existing) => {
            let quantity = existing.quantity + effective_quantity;
            let mut active: CheckoutActive = existing.into();
            active.quantity = Set(quantity);
            active.update(&txn).await?
        }
        None => {
            CheckoutActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                item_id: Set(request.item_id),
                quantity: Set(effective_quantity),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?
        }
    };

    let item_name = item.name.clone();
    let remaining = item.available_quantity - effective_quantity;
    let mut item_active: ItemActive = item.into();
    item_active.available_quantity = Set(remaining);
    item_active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "wishlist_fulfill",
        Some("wishlist_requests"),
        Some(serde_json::json!({
            "wishlist_request_id": wishlist_request_id,
            "order_id": order.id,
            "effective_quantity": effective_quantity,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let order = order_from_entity(order)?;

    notify::dispatch_all(
        state,
        vec![Notification::WishlistFulfilled {
            order_id: order.id,
            user_name: order.user_name.clone(),
            user_email: order.user_email.clone(),
            item_name,
            fulfilled_quantity: effective_quantity,
        }],
    );

    let mut fulfilled = request;
    fulfilled.status = WishlistStatus::Fulfilled.as_str().to_string();
    let wishlist_request = wishlist_from_entity(fulfilled)?;

    Ok(ApiResponse::success(
        "Wishlist request fulfilled",
        FulfillWishlistResponse {
            order,
            checkout: checkout_from_entity(checkout),
            wishlist_request,
            effective_quantity,
        },
        Some(Meta::empty()),
    ))
}
