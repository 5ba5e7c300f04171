use bigdecimal::BigDecimal;
use dashmap::DashMap;
use shared::*;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::{PaymentError, Result};

/// Decides payment outcomes against a fixed per-transaction limit.
///
/// Every computed result is kept in an in-memory lookup table so it can be
/// fetched again by payment id; nothing is written to a ledger.
#[derive(Clone)]
pub struct PaymentProcessor {
    transaction_limit: BigDecimal,
    payments: Arc<DashMap<Uuid, PaymentResult>>,
}

impl PaymentProcessor {
    pub fn new(transaction_limit: BigDecimal) -> Result<Self> {
        validate_amount(&transaction_limit)
            .map_err(|e| PaymentError::InvalidConfig(format!("transaction limit: {}", e)))?;

        Ok(Self {
            transaction_limit,
            payments: Arc::new(DashMap::new()),
        })
    }

    pub fn transaction_limit(&self) -> &BigDecimal {
        &self.transaction_limit
    }

    pub fn process_payment(&self, request: &PaymentRequest) -> PaymentResult {
        let payment_id = Uuid::new_v4();

        let result = match self.check(request) {
            Ok(()) => PaymentResult::completed(payment_id, request.order_id),
            Err(reason) => PaymentResult::declined(payment_id, request.order_id, reason),
        };

        info!(
            "Payment {} for order {} ({} {}): {:?}",
            payment_id, request.order_id, request.amount, request.currency, result.outcome
        );

        self.payments.insert(payment_id, result.clone());
        result
    }

    pub fn get_payment(&self, payment_id: Uuid) -> Result<PaymentResult> {
        self.payments
            .get(&payment_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| PaymentError::NotFound(payment_id.to_string()))
    }

    fn check(&self, request: &PaymentRequest) -> std::result::Result<(), &'static str> {
        validate_amount(&request.amount).map_err(|e| e.reason())?;
        request
            .currency
            .parse::<Currency>()
            .map_err(|e| e.reason())?;

        if request.amount > self.transaction_limit {
            return Err(LIMIT_EXCEEDED);
        }
        Ok(())
    }
}
