use chrono::NaiveDate;
use event_items_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    dto::{
        admin::{DeleteOrdersRequest, FulfillWishlistRequest, UpdateOrderDatesRequest, UpdateOrderStatusRequest},
        items::{CreateItemRequest, UpdateItemRequest},
        orders::{OrderLineRequest, SubmitOrderRequest},
    },
    middleware::auth::AuthUser,
    models::{Item, ItemCategory, OrderStatus, WishlistStatus},
    routes::params::{OrderListQuery, Pagination},
    services::{admin_service, item_service, order_service, wishlist_service},
    state::AppState,
};
use uuid::Uuid;

// Integration flow: requester submits a mixed cart/wishlist order; admin
// fulfills the wishlist request, walks the order through its lifecycle, and
// bulk-deletes at the end. Skips itself when no database is configured.
#[tokio::test]
async fn submit_fulfill_and_lifecycle_flow() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        email: "events@vellummortgage.com".into(),
        is_admin: true,
    };

    // Seed catalog: banners in stock, mugs sold out.
    let banner = create_item(&state, &admin, "Backdrop Banner", 10, ItemCategory::Signage).await?;
    let mug = create_item(&state, &admin, "Travel Mug", 5, ItemCategory::Drinkware).await?;
    let mug = set_available(&state, &admin, mug.id, 0).await?;
    assert_eq!(mug.available_quantity, 0);

    let pickup = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let ret = NaiveDate::from_ymd_opt(2026, 9, 5).unwrap();

    // Mixed submission: banner line is reservable, mug line is deferred.
    let submitted = order_service::submit_order(
        &state,
        SubmitOrderRequest {
            user_name: "Jordan Smith".into(),
            user_email: "jordan.smith@vellummortgage.com".into(),
            pickup_date: pickup,
            return_date: ret,
            event_start_date: pickup,
            event_end_date: ret,
            lines: vec![
                OrderLineRequest {
                    item_id: banner.id,
                    quantity: 3,
                },
                OrderLineRequest {
                    item_id: mug.id,
                    quantity: 2,
                },
            ],
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(submitted.order.status, OrderStatus::Pending);
    assert_eq!(submitted.checkouts.len(), 1);
    assert_eq!(submitted.checkouts[0].item_id, banner.id);
    assert_eq!(submitted.checkouts[0].quantity, 3);
    assert_eq!(submitted.wishlist_requests.len(), 1);
    assert_eq!(submitted.wishlist_requests[0].status, WishlistStatus::Pending);
    assert_eq!(submitted.wishlist_requests[0].order_id, submitted.order.id);

    let banner_now = get_item(&state, banner.id).await?;
    assert_eq!(banner_now.available_quantity, 7);

    // Off-domain email never reaches the store.
    let rejected = order_service::submit_order(
        &state,
        SubmitOrderRequest {
            user_name: "Jordan Smith".into(),
            user_email: "jordan.smith@gmail.com".into(),
            pickup_date: pickup,
            return_date: ret,
            event_start_date: pickup,
            event_end_date: ret,
            lines: vec![OrderLineRequest {
                item_id: banner.id,
                quantity: 1,
            }],
        },
    )
    .await;
    assert!(rejected.is_err());
    assert_eq!(count_orders(&state, &admin).await?, 1);

    // Over-committing a stale cart is rejected wholesale.
    let rejected = order_service::submit_order(
        &state,
        SubmitOrderRequest {
            user_name: "Casey Reed".into(),
            user_email: "casey.reed@vellummortgage.com".into(),
            pickup_date: pickup,
            return_date: ret,
            event_start_date: pickup,
            event_end_date: ret,
            lines: vec![OrderLineRequest {
                item_id: banner.id,
                quantity: 8,
            }],
        },
    )
    .await;
    assert!(rejected.is_err());
    assert_eq!(get_item(&state, banner.id).await?.available_quantity, 7);

    // Return date is editable while pending.
    let new_return = NaiveDate::from_ymd_opt(2026, 9, 8).unwrap();
    let order = admin_service::update_order_dates(
        &state,
        &admin,
        submitted.order.id,
        UpdateOrderDatesRequest {
            pickup_date: None,
            return_date: Some(new_return),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(order.return_date, new_return);

    // Skipping straight to returned is illegal.
    let skipped = admin_service::update_order_status(
        &state,
        &admin,
        submitted.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Returned,
        },
    )
    .await;
    assert!(skipped.is_err());

    // Stock came back for the mug: fulfill the wishlist request. Only one of
    // the two requested mugs is available, so the effective quantity is 1.
    set_available(&state, &admin, mug.id, 1).await?;
    let wishlist_id = submitted.wishlist_requests[0].id;
    let fulfilled = wishlist_service::fulfill_wishlist_item(
        &state,
        &admin,
        wishlist_id,
        FulfillWishlistRequest {
            order_id: submitted.order.id,
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(fulfilled.effective_quantity, 1);
    assert_eq!(fulfilled.checkout.item_id, mug.id);
    assert_eq!(fulfilled.checkout.quantity, 1);
    assert_eq!(fulfilled.wishlist_request.status, WishlistStatus::Fulfilled);
    assert_eq!(fulfilled.order.status, OrderStatus::Pending);
    assert_eq!(get_item(&state, mug.id).await?.available_quantity, 0);

    // A second attempt must not double-apply.
    let again = wishlist_service::fulfill_wishlist_item(
        &state,
        &admin,
        wishlist_id,
        FulfillWishlistRequest {
            order_id: submitted.order.id,
        },
    )
    .await;
    assert!(again.is_err());
    assert_eq!(get_item(&state, mug.id).await?.available_quantity, 0);

    // pending -> picked_up; pickup date is now frozen.
    let order = admin_service::update_order_status(
        &state,
        &admin,
        submitted.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::PickedUp,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(order.status, OrderStatus::PickedUp);

    let frozen = admin_service::update_order_dates(
        &state,
        &admin,
        submitted.order.id,
        UpdateOrderDatesRequest {
            pickup_date: Some(pickup),
            return_date: None,
        },
    )
    .await;
    assert!(frozen.is_err());

    // Re-asserting the current status is not an offered transition.
    let order = admin_service::update_order_status(
        &state,
        &admin,
        submitted.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::PickedUp,
        },
    )
    .await;
    assert!(order.is_err());

    // picked_up -> returned puts every checkout back on the shelf.
    let order = admin_service::update_order_status(
        &state,
        &admin,
        submitted.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Returned,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(order.status, OrderStatus::Returned);
    assert_eq!(get_item(&state, banner.id).await?.available_quantity, 10);
    assert_eq!(get_item(&state, mug.id).await?.available_quantity, 1);

    // Wishlist-only submission: nothing in stock, the order is created
    // eagerly so the wishlist request has an order to attach to.
    set_available(&state, &admin, mug.id, 0).await?;
    let deferred = order_service::submit_order(
        &state,
        SubmitOrderRequest {
            user_name: "Casey Reed".into(),
            user_email: "casey.reed@vellummortgage.com".into(),
            pickup_date: pickup,
            return_date: ret,
            event_start_date: pickup,
            event_end_date: ret,
            lines: vec![OrderLineRequest {
                item_id: mug.id,
                quantity: 3,
            }],
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(deferred.order.status, OrderStatus::WishlistOnly);
    assert!(deferred.checkouts.is_empty());
    assert_eq!(deferred.wishlist_requests.len(), 1);

    // Fulfillment promotes the wishlist-only order to pending.
    set_available(&state, &admin, mug.id, 5).await?;
    let fulfilled = wishlist_service::fulfill_wishlist_item(
        &state,
        &admin,
        deferred.wishlist_requests[0].id,
        FulfillWishlistRequest {
            order_id: deferred.order.id,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(fulfilled.order.status, OrderStatus::Pending);
    assert_eq!(fulfilled.effective_quantity, 3);
    assert_eq!(get_item(&state, mug.id).await?.available_quantity, 2);

    // Cancelling the pending order restores its checkout stock.
    let order = admin_service::update_order_status(
        &state,
        &admin,
        deferred.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Cancelled,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(get_item(&state, mug.id).await?.available_quantity, 5);

    // Item edits round-trip, with available clamped to total.
    let edited = item_service::update_item(
        &state,
        &admin,
        banner.id,
        UpdateItemRequest {
            name: Some("Backdrop Banner 8x8".into()),
            description: Some("With carrying case".into()),
            image_url: None,
            total_quantity: Some(10),
            available_quantity: Some(50),
            category: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(edited.name, "Backdrop Banner 8x8");
    assert_eq!(edited.description.as_deref(), Some("With carrying case"));
    assert_eq!(edited.available_quantity, 10);

    // Bulk delete: both orders go in one batched call.
    assert_eq!(count_orders(&state, &admin).await?, 2);
    let deleted = admin_service::delete_orders(
        &state,
        &admin,
        DeleteOrdersRequest {
            order_ids: vec![submitted.order.id, deferred.order.id],
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(deleted.deleted, 2);
    assert_eq!(count_orders(&state, &admin).await?, 0);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let orm = create_orm_conn(database_url).await?;

    // Clean tables between runs
    sqlx::query(
        "TRUNCATE TABLE checkouts, wishlist_requests, orders, audit_logs, email_templates, items, users RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        allowed_email_domain: "@vellummortgage.com".into(),
        email_function_url: None,
        email_api_key: None,
        email_from: "Event Items Store <events@vellummortgage.com>".into(),
        notify_email: "events@vellummortgage.com".into(),
        store_url: "https://eventitemstore.vercel.app".into(),
    };

    Ok(AppState {
        pool,
        orm,
        config,
        http: reqwest::Client::new(),
    })
}

async fn create_item(
    state: &AppState,
    admin: &AuthUser,
    name: &str,
    total: i32,
    category: ItemCategory,
) -> anyhow::Result<Item> {
    let item = item_service::create_item(
        state,
        admin,
        CreateItemRequest {
            name: name.into(),
            description: None,
            image_url: None,
            total_quantity: total,
            category,
        },
    )
    .await?
    .data
    .unwrap();
    Ok(item)
}

async fn set_available(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
    available: i32,
) -> anyhow::Result<Item> {
    let item = item_service::update_item(
        state,
        admin,
        id,
        UpdateItemRequest {
            name: None,
            description: None,
            image_url: None,
            total_quantity: None,
            available_quantity: Some(available),
            category: None,
        },
    )
    .await?
    .data
    .unwrap();
    Ok(item)
}

async fn get_item(state: &AppState, id: Uuid) -> anyhow::Result<Item> {
    Ok(item_service::get_item(state, id).await?.data.unwrap())
}

async fn count_orders(state: &AppState, admin: &AuthUser) -> anyhow::Result<usize> {
    let list = admin_service::list_orders_with_details(
        state,
        admin,
        OrderListQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            status: None,
            sort_order: None,
        },
    )
    .await?
    .data
    .unwrap();
    Ok(list.items.len())
}
