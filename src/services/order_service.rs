use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    cart::{CartState, ItemSnapshot},
    dto::orders::{SubmitOrderRequest, SubmitOrderResponse},
    entity::{
        checkouts::{ActiveModel as CheckoutActive, Model as CheckoutModel},
        items::{Column as ItemCol, Entity as Items},
        orders::{ActiveModel as OrderActive, Model as OrderModel},
        wishlist_requests::{ActiveModel as WishlistActive, Model as WishlistModel},
    },
    error::{AppError, AppResult},
    models::{Checkout, Order, OrderStatus, WishlistRequest, WishlistStatus},
    notify::{self, Notification},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// One combined reservation submission. All writes happen in a single
/// transaction: order row, checkout lines with their stock decrements, and
/// the wishlist batch either all land or none do.
pub async fn submit_order(
    state: &AppState,
    payload: SubmitOrderRequest,
) -> AppResult<ApiResponse<SubmitOrderResponse>> {
    validate_submission(&payload, &state.config.allowed_email_domain)?;

    let txn = state.orm.begin().await?;

    let mut item_ids: Vec<Uuid> = payload.lines.iter().map(|l| l.item_id).collect();
    item_ids.sort();
    item_ids.dedup();

    let items = Items::find()
        .filter(ItemCol::Id.is_in(item_ids.clone()))
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    if items.len() != item_ids.len() {
        return Err(AppError::BadRequest("unknown item in submission".into()));
    }

    // Replay the submitted lines through admission control against the
    // locked rows; the client's view of availability may be stale.
    let mut cart = CartState::new();
    for line in &payload.lines {
        let item = items
            .iter()
            .find(|i| i.id == line.item_id)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("locked item row went missing")))?;
        let snapshot = ItemSnapshot {
            id: item.id,
            name: item.name.clone(),
            available_quantity: item.available_quantity,
        };
        cart.add(&snapshot, line.quantity)
            .map_err(|err| AppError::Validation(err.to_string()))?;
    }

    // A submission with nothing in stock still creates an order so every
    // wishlist request has a non-null order id.
    let status = if cart.cart_lines().is_empty() {
        OrderStatus::WishlistOnly
    } else {
        OrderStatus::Pending
    };

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_name: Set(payload.user_name.trim().to_string()),
        user_email: Set(payload.user_email.trim().to_string()),
        checkout_date: Set(payload.pickup_date),
        return_date: Set(payload.return_date),
        status: Set(status.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut checkouts: Vec<Checkout> = Vec::new();
    for line in cart.cart_lines() {
        let checkout = CheckoutActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            item_id: Set(line.item.id),
            quantity: Set(line.requested_quantity),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        checkouts.push(checkout_from_entity(checkout));

        Items::update_many()
            .col_expr(
                ItemCol::AvailableQuantity,
                Expr::col(ItemCol::AvailableQuantity).sub(line.requested_quantity),
            )
            .filter(ItemCol::Id.eq(line.item.id))
            .exec(&txn)
            .await?;
    }

    let mut wishlist_requests: Vec<WishlistRequest> = Vec::new();
    for line in cart.wishlist_lines() {
        let request = WishlistActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            item_id: Set(line.item.id),
            requested_quantity: Set(line.requested_quantity),
            requested_pickup_date: Set(payload.pickup_date),
            requested_return_date: Set(payload.return_date),
            event_start_date: Set(payload.event_start_date),
            event_end_date: Set(payload.event_end_date),
            status: Set(WishlistStatus::Pending.as_str().to_string()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        wishlist_requests.push(wishlist_from_entity(request)?);
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        None,
        "order_submit",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "checkouts": checkouts.len(),
            "wishlist_requests": wishlist_requests.len(),
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let item_summary = summarize_lines(&cart);
    let order = order_from_entity(order)?;

    let mut notifications = vec![
        Notification::OrderPlaced {
            order_id: order.id,
            user_name: order.user_name.clone(),
            user_email: order.user_email.clone(),
            pickup_date: order.checkout_date,
            return_date: order.return_date,
            item_summary: item_summary.clone(),
        },
        Notification::UserConfirmation {
            order_id: order.id,
            user_name: order.user_name.clone(),
            user_email: order.user_email.clone(),
            pickup_date: order.checkout_date,
            return_date: order.return_date,
            item_summary,
        },
    ];
    if !checkouts.is_empty() {
        notifications.push(Notification::CalendarInvite {
            order_id: order.id,
            user_name: order.user_name.clone(),
            user_email: order.user_email.clone(),
            title: "Event items pickup".to_string(),
            date: order.checkout_date,
        });
        notifications.push(Notification::CalendarInvite {
            order_id: order.id,
            user_name: order.user_name.clone(),
            user_email: order.user_email.clone(),
            title: "Event items return".to_string(),
            date: order.return_date,
        });
    }
    notify::dispatch_all(state, notifications);

    Ok(ApiResponse::success(
        "Order submitted",
        SubmitOrderResponse {
            order,
            checkouts,
            wishlist_requests,
        },
        Some(Meta::empty()),
    ))
}

/// Submission preconditions, checked before any write.
fn validate_submission(payload: &SubmitOrderRequest, allowed_domain: &str) -> AppResult<()> {
    if payload.lines.is_empty() {
        return Err(AppError::Validation(
            "add items before submitting a request".into(),
        ));
    }
    if payload.user_name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if payload.user_email.trim().is_empty() {
        return Err(AppError::Validation("email is required".into()));
    }
    if !payload
        .user_email
        .to_lowercase()
        .ends_with(&allowed_domain.to_lowercase())
    {
        return Err(AppError::Validation(format!(
            "please use your {allowed_domain} email address"
        )));
    }
    if payload.return_date < payload.pickup_date {
        return Err(AppError::Validation(
            "return date cannot be before pickup date".into(),
        ));
    }
    if payload.event_end_date < payload.event_start_date {
        return Err(AppError::Validation(
            "event end date cannot be before event start date".into(),
        ));
    }
    Ok(())
}

fn summarize_lines(cart: &CartState) -> String {
    let mut parts: Vec<String> = cart
        .cart_lines()
        .iter()
        .map(|l| format!("{} x {}", l.requested_quantity, l.item.name))
        .collect();
    parts.extend(
        cart.wishlist_lines()
            .iter()
            .map(|l| format!("{} x {} (waitlisted)", l.requested_quantity, l.item.name)),
    );
    parts.join(", ")
}

pub fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let status = model
        .status
        .parse::<OrderStatus>()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
    Ok(Order {
        id: model.id,
        user_name: model.user_name,
        user_email: model.user_email,
        checkout_date: model.checkout_date,
        return_date: model.return_date,
        status,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

pub fn checkout_from_entity(model: CheckoutModel) -> Checkout {
    Checkout {
        id: model.id,
        order_id: model.order_id,
        item_id: model.item_id,
        quantity: model.quantity,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn wishlist_from_entity(model: WishlistModel) -> AppResult<WishlistRequest> {
    let status = model
        .status
        .parse::<WishlistStatus>()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
    Ok(WishlistRequest {
        id: model.id,
        order_id: model.order_id,
        item_id: model.item_id,
        requested_quantity: model.requested_quantity,
        requested_pickup_date: model.requested_pickup_date,
        requested_return_date: model.requested_return_date,
        event_start_date: model.event_start_date,
        event_end_date: model.event_end_date,
        status,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
