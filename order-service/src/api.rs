use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::*;
use uuid::Uuid;

use crate::coordinator::OrderCoordinator;
use crate::error::{OrderError, Result};

#[derive(Clone)]
pub struct AppState {
    pub coordinator: OrderCoordinator,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: BigDecimal,
    pub currency: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

pub async fn create_order(
    State(state): State<AppState>,
    request: std::result::Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateOrderResponse>)> {
    let Json(request) = request.map_err(|e| OrderError::InvalidInput(e.body_text()))?;

    let order = state
        .coordinator
        .create_order(request.amount, &request.currency)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id: order.id,
            status: order.status,
            reason: order.reason,
        }),
    ))
}

/// Ids that are not UUIDs cannot name any order, so they are reported as unknown.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let order_id = Uuid::parse_str(&id).map_err(|_| OrderError::NotFound(id))?;
    state.coordinator.get_order(order_id).map(Json)
}

pub async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.coordinator.list_orders())
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Order Service is running" }))
}

pub async fn health_check() -> &'static str {
    "OK"
}
