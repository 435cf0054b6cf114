use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::admin::{
        DeleteOrdersRequest, DeletedOrders, FulfillWishlistRequest, FulfillWishlistResponse,
        OrderDetailsList, OrderWithItems, UpdateOrderDatesRequest, UpdateOrderStatusRequest,
    },
    dto::templates::{TemplateList, UpdateTemplateRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{EmailTemplate, Order},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{admin_service, wishlist_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders", delete(delete_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/orders/{id}/dates", patch(update_order_dates))
        .route("/wishlists/{id}/fulfill", post(fulfill_wishlist))
        .route("/templates", get(list_templates))
        .route("/templates/{template_id}", get(get_template))
        .route("/templates/{template_id}", put(update_template))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Orders with checkouts and wishlist requests", body = ApiResponse<OrderDetailsList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderDetailsList>>> {
    let resp = admin_service::list_orders_with_details(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with line items", body = ApiResponse<OrderWithItems>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = admin_service::get_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Order>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Illegal transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/dates",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderDatesRequest,
    responses(
        (status = 200, description = "Dates updated", body = ApiResponse<Order>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Status does not allow the edit"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_dates(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderDatesRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_dates(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/orders",
    request_body = DeleteOrdersRequest,
    responses(
        (status = 200, description = "Orders deleted", body = ApiResponse<DeletedOrders>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DeleteOrdersRequest>,
) -> AppResult<Json<ApiResponse<DeletedOrders>>> {
    let resp = admin_service::delete_orders(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/wishlists/{id}/fulfill",
    params(
        ("id" = Uuid, Path, description = "Wishlist request ID")
    ),
    request_body = FulfillWishlistRequest,
    responses(
        (status = 200, description = "Wishlist request fulfilled", body = ApiResponse<FulfillWishlistResponse>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Already fulfilled or no stock"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn fulfill_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FulfillWishlistRequest>,
) -> AppResult<Json<ApiResponse<FulfillWishlistResponse>>> {
    let resp = wishlist_service::fulfill_wishlist_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/templates",
    responses(
        (status = 200, description = "List email templates", body = ApiResponse<TemplateList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_templates(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<TemplateList>>> {
    let resp = admin_service::list_templates(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/templates/{template_id}",
    params(
        ("template_id" = String, Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Get email template", body = ApiResponse<EmailTemplate>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_template(
    State(state): State<AppState>,
    user: AuthUser,
    Path(template_id): Path<String>,
) -> AppResult<Json<ApiResponse<EmailTemplate>>> {
    let resp = admin_service::get_template(&state, &user, &template_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/templates/{template_id}",
    params(
        ("template_id" = String, Path, description = "Template ID")
    ),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Update email template", body = ApiResponse<EmailTemplate>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_template(
    State(state): State<AppState>,
    user: AuthUser,
    Path(template_id): Path<String>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> AppResult<Json<ApiResponse<EmailTemplate>>> {
    let resp = admin_service::update_template(&state, &user, &template_id, payload).await?;
    Ok(Json(resp))
}
