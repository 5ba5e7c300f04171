use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error("payment {0} not found")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl PaymentError {
    fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            PaymentError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "InvalidInput"),
            PaymentError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            PaymentError::InvalidConfig(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal"),
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let (status, error) = self.kind();
        let body = ErrorResponse {
            error,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
