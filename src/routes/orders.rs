use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::orders::{SubmitOrderRequest, SubmitOrderResponse},
    error::AppResult,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = SubmitOrderRequest,
    responses(
        (status = 200, description = "Submit a reservation request", body = ApiResponse<SubmitOrderResponse>),
        (status = 400, description = "Validation failed"),
    ),
    tag = "Orders"
)]
pub async fn submit_order(
    State(state): State<AppState>,
    Json(payload): Json<SubmitOrderRequest>,
) -> AppResult<Json<ApiResponse<SubmitOrderResponse>>> {
    let resp = order_service::submit_order(&state, payload).await?;
    Ok(Json(resp))
}
