use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use shared::{OrderStatus, ValidationError};
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, OrderError>;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("order {0} not found")]
    NotFound(String),

    #[error("order {order_id} is already {status:?}")]
    InvalidTransition { order_id: Uuid, status: OrderStatus },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::InvalidInput(err.to_string())
    }
}

impl From<tokio::task::JoinError> for OrderError {
    fn from(err: tokio::task::JoinError) -> Self {
        OrderError::Internal(format!("settlement task failed: {}", err))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl OrderError {
    fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            OrderError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "InvalidInput"),
            OrderError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            OrderError::InvalidTransition { .. } => (StatusCode::CONFLICT, "InvalidTransition"),
            OrderError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal"),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let (status, error) = self.kind();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let body = ErrorResponse {
            error,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
