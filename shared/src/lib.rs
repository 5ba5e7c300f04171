use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

mod currency;

pub use currency::Currency;

/// Reason recorded on an order whose payment could not be obtained within the retry budget.
pub const PAYMENT_UNAVAILABLE: &str = "payment_unavailable";
pub const LIMIT_EXCEEDED: &str = "limit_exceeded";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be greater than zero, got {0}")]
    InvalidAmount(BigDecimal),
    #[error("unrecognized currency code: {0:?}")]
    InvalidCurrency(String),
}

impl ValidationError {
    /// Machine-readable reason carried on declined payments.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidAmount(_) => "invalid_amount",
            ValidationError::InvalidCurrency(_) => "invalid_currency",
        }
    }
}

pub fn validate_amount(amount: &BigDecimal) -> Result<(), ValidationError> {
    if *amount > BigDecimal::zero() {
        Ok(())
    } else {
        Err(ValidationError::InvalidAmount(amount.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentOutcome {
    Completed,
    Declined,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub amount: BigDecimal,
    pub currency: Currency,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(amount: BigDecimal, currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            amount,
            currency,
            status: OrderStatus::Pending,
            reason: None,
            payment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn payment_request(&self) -> PaymentRequest {
        PaymentRequest {
            order_id: self.id,
            amount: self.amount.clone(),
            currency: self.currency.to_string(),
        }
    }

    /// Status the order resolves to once `result` has been received for it.
    pub fn status_for(result: &PaymentResult) -> OrderStatus {
        match result.outcome {
            PaymentOutcome::Completed => OrderStatus::Paid,
            PaymentOutcome::Declined | PaymentOutcome::Error => OrderStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: Uuid,
    pub amount: BigDecimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Uuid>,
    pub order_id: Uuid,
    pub outcome: PaymentOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub processed_at: DateTime<Utc>,
}

impl PaymentResult {
    pub fn completed(payment_id: Uuid, order_id: Uuid) -> Self {
        Self {
            payment_id: Some(payment_id),
            order_id,
            outcome: PaymentOutcome::Completed,
            reason: None,
            processed_at: Utc::now(),
        }
    }

    pub fn declined(payment_id: Uuid, order_id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            payment_id: Some(payment_id),
            order_id,
            outcome: PaymentOutcome::Declined,
            reason: Some(reason.into()),
            processed_at: Utc::now(),
        }
    }

    /// A reason is carried exactly when the payment did not complete.
    pub fn is_well_formed(&self) -> bool {
        self.reason.is_some() != (self.outcome == PaymentOutcome::Completed)
    }

    /// Result synthesized by the caller when the processor never answered.
    pub fn unavailable(order_id: Uuid) -> Self {
        Self {
            payment_id: None,
            order_id,
            outcome: PaymentOutcome::Error,
            reason: Some(PAYMENT_UNAVAILABLE.to_string()),
            processed_at: Utc::now(),
        }
    }
}
