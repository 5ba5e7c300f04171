use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use shared::*;
use uuid::Uuid;

use crate::error::{PaymentError, Result};
use crate::processor::PaymentProcessor;

#[derive(Clone)]
pub struct AppState {
    pub processor: PaymentProcessor,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/payments", post(process_payment))
        .route("/payments/:id", get(get_payment))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

/// Declines are business outcomes and still answer 200.
pub async fn process_payment(
    State(state): State<AppState>,
    request: std::result::Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResult>> {
    let Json(request) = request.map_err(|e| PaymentError::InvalidInput(e.body_text()))?;
    Ok(Json(state.processor.process_payment(&request)))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentResult>> {
    let payment_id = Uuid::parse_str(&id).map_err(|_| PaymentError::NotFound(id))?;
    state.processor.get_payment(payment_id).map(Json)
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Payment Service is running" }))
}

pub async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use bigdecimal::BigDecimal;
    use tower::ServiceExt;

    fn app() -> Router {
        let processor = PaymentProcessor::new(BigDecimal::from(5000)).unwrap();
        create_router(AppState { processor })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_payment(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/payments")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_process_and_fetch_payment() {
        let app = app();
        let order_id = Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(post_payment(
                json!({ "orderId": order_id, "amount": 10, "currency": "USD" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let result = body_json(response).await;
        assert_eq!(result["outcome"], "Completed");
        assert_eq!(result["orderId"], order_id.to_string());

        let payment_id = result["paymentId"].as_str().unwrap().to_string();
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/payments/{}", payment_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, result);
    }

    #[tokio::test]
    async fn test_declined_is_ok_status() {
        let response = app()
            .oneshot(post_payment(
                json!({ "orderId": Uuid::new_v4(), "amount": "10000", "currency": "USD" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let result = body_json(response).await;
        assert_eq!(result["outcome"], "Declined");
        assert_eq!(result["reason"], "limit_exceeded");
    }

    #[tokio::test]
    async fn test_unknown_payment_is_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(format!("/payments/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "NotFound");
    }

    #[tokio::test]
    async fn test_non_uuid_payment_id_is_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/payments/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "NotFound");
        assert_eq!(body["message"], "payment abc not found");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let response = app()
            .oneshot(post_payment(json!({ "amount": 10 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "InvalidInput");
    }
}
