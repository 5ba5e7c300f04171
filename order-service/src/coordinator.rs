use bigdecimal::BigDecimal;
use shared::*;
use std::sync::Arc;
use tokio::time;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::payment_client::{PaymentClient, RetryPolicy};
use crate::store::OrderStore;

/// Owns the order lifecycle: records new orders, charges them through the
/// payment processor and resolves them to `Paid` or `Failed`.
#[derive(Clone)]
pub struct OrderCoordinator {
    store: OrderStore,
    payments: Arc<dyn PaymentClient>,
    policy: RetryPolicy,
}

impl OrderCoordinator {
    pub fn new(store: OrderStore, payments: Arc<dyn PaymentClient>, policy: RetryPolicy) -> Self {
        Self { store, payments, policy }
    }

    pub async fn create_order(&self, amount: BigDecimal, currency: &str) -> Result<Order> {
        validate_amount(&amount)?;
        let currency: Currency = currency.parse()?;

        let order = Order::new(amount, currency);
        let request = order.payment_request();
        info!("Created order {} for {} {}", order.id, order.amount, order.currency);
        self.store.insert(order);

        // Runs detached so the order still resolves if the caller goes away.
        let coordinator = self.clone();
        let settlement = tokio::spawn(async move { coordinator.settle(request).await });
        settlement.await?
    }

    pub fn get_order(&self, order_id: Uuid) -> Result<Order> {
        self.store.get(order_id)
    }

    pub fn list_orders(&self) -> Vec<Order> {
        self.store.list()
    }

    async fn settle(&self, request: PaymentRequest) -> Result<Order> {
        let result = self.request_payment(&request).await;
        let order = self.store.apply_payment(&result)?;

        match &order.reason {
            Some(reason) => info!("Order {} is {:?} ({})", order.id, order.status, reason),
            None => info!("Order {} is {:?}", order.id, order.status),
        }
        Ok(order)
    }

    /// Only transport-level failures are retried; any Completed or Declined
    /// answer ends the loop since the processor call is not idempotent.
    async fn request_payment(&self, request: &PaymentRequest) -> PaymentResult {
        let attempts = self.policy.attempts();

        for attempt in 1..=attempts {
            let call = self.payments.process_payment(request);
            match time::timeout(self.policy.attempt_timeout, call).await {
                Ok(Ok(result)) if result.outcome != PaymentOutcome::Error => return result,
                Ok(Ok(result)) => warn!(
                    "Payment processor reported an error for order {} (attempt {}/{}): {:?}",
                    request.order_id, attempt, attempts, result.reason
                ),
                Ok(Err(e)) => warn!(
                    "Payment attempt {}/{} for order {} failed: {}",
                    attempt, attempts, request.order_id, e
                ),
                Err(_) => warn!(
                    "Payment attempt {}/{} for order {} timed out after {:?}",
                    attempt, attempts, request.order_id, self.policy.attempt_timeout
                ),
            }

            if attempt < attempts {
                time::sleep(self.policy.backoff).await;
            }
        }

        error!(
            "Giving up on payment for order {} after {} attempts",
            request.order_id, attempts
        );
        PaymentResult::unavailable(request.order_id)
    }
}
