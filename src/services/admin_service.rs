use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::admin::{
        CheckoutWithItem, DeleteOrdersRequest, DeletedOrders, OrderDetailsList, OrderWithDetails,
        OrderWithItems, UpdateOrderDatesRequest, UpdateOrderStatusRequest, WishlistItemWithItem,
    },
    dto::templates::{TemplateList, UpdateTemplateRequest},
    entity::{
        checkouts::{Column as CheckoutCol, Entity as Checkouts},
        items::{ActiveModel as ItemActive, Entity as Items},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        wishlist_requests::{Column as WishlistCol, Entity as WishlistRequests},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{EmailTemplate, Item, ItemCategory, Order, OrderStatus, WishlistStatus},
    notify::{self, Notification},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::order_service::{checkout_from_entity, order_from_entity, wishlist_from_entity},
    state::AppState,
};

#[derive(Debug, FromRow)]
struct CheckoutItemRow {
    id: Uuid,
    order_id: Uuid,
    quantity: i32,
    item_id: Uuid,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    total_quantity: i32,
    available_quantity: i32,
    category: String,
    item_created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct WishlistItemRow {
    id: Uuid,
    order_id: Uuid,
    requested_quantity: i32,
    status: String,
    requested_pickup_date: chrono::NaiveDate,
    requested_return_date: chrono::NaiveDate,
    item_id: Uuid,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    total_quantity: i32,
    available_quantity: i32,
    category: String,
    item_created_at: DateTime<Utc>,
}

/// Orders for the dashboard, newest first, each carrying its checkout lines
/// and associated wishlist requests with the item snapshot joined in.
pub async fn list_orders_with_details(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderDetailsList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let order_models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let order_ids: Vec<Uuid> = order_models.iter().map(|o| o.id).collect();

    let checkout_rows: Vec<CheckoutItemRow> = sqlx::query_as(
        r#"
        SELECT c.id, c.order_id, c.quantity,
               i.id AS item_id, i.name, i.description, i.image_url,
               i.total_quantity, i.available_quantity, i.category,
               i.created_at AS item_created_at
        FROM checkouts c
        JOIN items i ON i.id = c.item_id
        WHERE c.order_id = ANY($1)
        "#,
    )
    .bind(&order_ids)
    .fetch_all(&state.pool)
    .await?;

    let wishlist_rows: Vec<WishlistItemRow> = sqlx::query_as(
        r#"
        SELECT w.id, w.order_id, w.requested_quantity, w.status,
               w.requested_pickup_date, w.requested_return_date,
               i.id AS item_id, i.name, i.description, i.image_url,
               i.total_quantity, i.available_quantity, i.category,
               i.created_at AS item_created_at
        FROM wishlist_requests w
        JOIN items i ON i.id = w.item_id
        WHERE w.order_id = ANY($1)
        "#,
    )
    .bind(&order_ids)
    .fetch_all(&state.pool)
    .await?;

    let mut checkouts_by_order: HashMap<Uuid, Vec<CheckoutWithItem>> = HashMap::new();
    for row in checkout_rows {
        let entry = checkouts_by_order.entry(row.order_id).or_default();
        entry.push(CheckoutWithItem {
            id: row.id,
            quantity: row.quantity,
            item: item_from_parts(
                row.item_id,
                row.name,
                row.description,
                row.image_url,
                row.total_quantity,
                row.available_quantity,
                &row.category,
                row.item_created_at,
            )?,
        });
    }

    let mut wishlists_by_order: HashMap<Uuid, Vec<WishlistItemWithItem>> = HashMap::new();
    for row in wishlist_rows {
        let status = row
            .status
            .parse::<WishlistStatus>()
            .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
        let entry = wishlists_by_order.entry(row.order_id).or_default();
        entry.push(WishlistItemWithItem {
            wishlist_request_id: row.id,
            requested_quantity: row.requested_quantity,
            status,
            requested_pickup_date: row.requested_pickup_date,
            requested_return_date: row.requested_return_date,
            item: item_from_parts(
                row.item_id,
                row.name,
                row.description,
                row.image_url,
                row.total_quantity,
                row.available_quantity,
                &row.category,
                row.item_created_at,
            )?,
        });
    }

    let mut orders: Vec<OrderWithDetails> = Vec::with_capacity(order_models.len());
    for model in order_models {
        let order = order_from_entity(model)?;
        let items = checkouts_by_order.remove(&order.id).unwrap_or_default();
        let wishlist_items = wishlists_by_order.remove(&order.id).unwrap_or_default();
        orders.push(OrderWithDetails {
            order,
            items,
            wishlist_items,
        });
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderDetailsList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => order_from_entity(o)?,
        None => return Err(AppError::NotFound),
    };

    let items = Checkouts::find()
        .filter(CheckoutCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(checkout_from_entity)
        .collect();

    let wishlist_requests = WishlistRequests::find()
        .filter(WishlistCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(wishlist_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success(
        "Order found",
        OrderWithItems {
            order,
            items,
            wishlist_requests,
        },
        Some(Meta::empty()),
    ))
}

/// Admin-triggered status transition. The transition table is enforced here;
/// inventory effects ride in the same transaction, and the follow-up
/// notification never blocks or rolls back the change.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;

    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let current = existing
        .status
        .parse::<OrderStatus>()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
    let next = payload.status;

    if !current.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "illegal status transition: {current} -> {next}"
        )));
    }

    match next {
        // Returned goods and cancelled pending reservations go back on the
        // shelf, clamped so available never exceeds total.
        OrderStatus::Returned => {
            restore_checkout_stock(&txn, existing.id).await?;
        }
        OrderStatus::Cancelled => {
            if current == OrderStatus::Pending {
                restore_checkout_stock(&txn, existing.id).await?;
            }
            WishlistRequests::update_many()
                .col_expr(
                    WishlistCol::Status,
                    sea_orm::sea_query::Expr::value(WishlistStatus::Cancelled.as_str()),
                )
                .filter(WishlistCol::OrderId.eq(existing.id))
                .filter(WishlistCol::Status.eq(WishlistStatus::Pending.as_str()))
                .exec(&txn)
                .await?;
        }
        _ => {}
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(next.as_str().to_string());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": updated.id, "status": updated.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let order = order_from_entity(updated)?;

    let notification = match order.status {
        OrderStatus::PickedUp => Some(Notification::PickupConfirmation {
            order_id: order.id,
            user_name: order.user_name.clone(),
            user_email: order.user_email.clone(),
            pickup_date: order.checkout_date,
        }),
        OrderStatus::Returned => Some(Notification::ReturnConfirmation {
            order_id: order.id,
            user_name: order.user_name.clone(),
            user_email: order.user_email.clone(),
            return_date: order.return_date,
        }),
        OrderStatus::Cancelled => Some(Notification::CancelConfirmation {
            order_id: order.id,
            user_name: order.user_name.clone(),
            user_email: order.user_email.clone(),
        }),
        _ => None,
    };
    if let Some(notification) = notification {
        notify::dispatch_all(state, vec![notification]);
    }

    Ok(ApiResponse::success(
        "Order updated",
        order,
        Some(Meta::empty()),
    ))
}

/// Pickup is editable only while pending; return for any non-terminal
/// status. The resulting pair must keep return on or after pickup.
pub async fn update_order_dates(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderDatesRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    if payload.pickup_date.is_none() && payload.return_date.is_none() {
        return Err(AppError::Validation("no dates provided".into()));
    }

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let status = existing
        .status
        .parse::<OrderStatus>()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;

    if payload.pickup_date.is_some() && status != OrderStatus::Pending {
        return Err(AppError::Conflict(
            "pickup date can only be edited while the order is pending".into(),
        ));
    }
    if payload.return_date.is_some() && status.is_terminal() {
        return Err(AppError::Conflict(
            "return date cannot be edited on a closed order".into(),
        ));
    }

    let pickup = payload.pickup_date.unwrap_or(existing.checkout_date);
    let ret = payload.return_date.unwrap_or(existing.return_date);
    if ret < pickup {
        return Err(AppError::Validation(
            "return date cannot be before pickup date".into(),
        ));
    }

    let mut active: OrderActive = existing.into();
    active.checkout_date = Set(pickup);
    active.return_date = Set(ret);
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_dates_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": updated.id, "pickup": pickup, "return": ret })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

/// Unconditional batched delete; checkouts and wishlist requests cascade.
/// No soft delete, no undo, no stock restitution.
pub async fn delete_orders(
    state: &AppState,
    user: &AuthUser,
    payload: DeleteOrdersRequest,
) -> AppResult<ApiResponse<DeletedOrders>> {
    ensure_admin(user)?;
    if payload.order_ids.is_empty() {
        return Err(AppError::Validation("no order ids provided".into()));
    }

    let result = Orders::delete_many()
        .filter(OrderCol::Id.is_in(payload.order_ids.clone()))
        .exec(&state.orm)
        .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "orders_delete",
        Some("orders"),
        Some(serde_json::json!({ "order_ids": payload.order_ids, "deleted": result.rows_affected })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Orders deleted",
        DeletedOrders {
            deleted: result.rows_affected,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_templates(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<TemplateList>> {
    ensure_admin(user)?;
    let items: Vec<EmailTemplate> =
        sqlx::query_as("SELECT * FROM email_templates ORDER BY template_id")
            .fetch_all(&state.pool)
            .await?;
    Ok(ApiResponse::success(
        "Templates",
        TemplateList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_template(
    state: &AppState,
    user: &AuthUser,
    template_id: &str,
) -> AppResult<ApiResponse<EmailTemplate>> {
    ensure_admin(user)?;
    let template: Option<EmailTemplate> =
        sqlx::query_as("SELECT * FROM email_templates WHERE template_id = $1")
            .bind(template_id)
            .fetch_optional(&state.pool)
            .await?;
    match template {
        Some(t) => Ok(ApiResponse::success("Template", t, None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn update_template(
    state: &AppState,
    user: &AuthUser,
    template_id: &str,
    payload: UpdateTemplateRequest,
) -> AppResult<ApiResponse<EmailTemplate>> {
    ensure_admin(user)?;
    if !notify::TEMPLATE_IDS.iter().any(|id| *id == template_id) {
        return Err(AppError::NotFound);
    }
    if payload.subject.trim().is_empty() {
        return Err(AppError::Validation("subject is required".into()));
    }

    let template: EmailTemplate = sqlx::query_as(
        r#"
        INSERT INTO email_templates (template_id, subject, body_html)
        VALUES ($1, $2, $3)
        ON CONFLICT (template_id)
        DO UPDATE SET subject = EXCLUDED.subject, body_html = EXCLUDED.body_html,
                      updated_at = now()
        RETURNING *
        "#,
    )
    .bind(template_id)
    .bind(payload.subject)
    .bind(payload.body_html)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "template_update",
        Some("email_templates"),
        Some(serde_json::json!({ "template_id": template.template_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Template updated",
        template,
        Some(Meta::empty()),
    ))
}

/// Put every checkout's quantity back on the shelf, clamped to total.
async fn restore_checkout_stock(
    txn: &sea_orm::DatabaseTransaction,
    order_id: Uuid,
) -> AppResult<()> {
    let checkouts = Checkouts::find()
        .filter(CheckoutCol::OrderId.eq(order_id))
        .all(txn)
        .await?;

    for checkout in checkouts {
        let item = Items::find_by_id(checkout.item_id)
            .lock(LockType::Update)
            .one(txn)
            .await?;
        let item = match item {
            Some(i) => i,
            None => continue,
        };
        let restored = (item.available_quantity + checkout.quantity).min(item.total_quantity);
        let mut active: ItemActive = item.into();
        active.available_quantity = Set(restored);
        active.update(txn).await?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn item_from_parts(
    id: Uuid,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    total_quantity: i32,
    available_quantity: i32,
    category: &str,
    created_at: DateTime<Utc>,
) -> AppResult<Item> {
    let category = category
        .parse::<ItemCategory>()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
    Ok(Item {
        id,
        name,
        description,
        image_url,
        total_quantity,
        available_quantity,
        category,
        created_at,
    })
}
