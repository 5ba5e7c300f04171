use chrono::Utc;
use dashmap::DashMap;
use shared::{Order, PaymentResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{OrderError, Result};

/// Concurrent order lookup table.
///
/// Reads never block each other; a write holds the lock of the shard owning
/// that one order id, so updates to the same order are serialized while
/// unrelated orders proceed.
#[derive(Default, Clone)]
pub struct OrderStore {
    orders: Arc<DashMap<Uuid, Order>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order: Order) {
        self.orders.insert(order.id, order);
    }

    pub fn get(&self, order_id: Uuid) -> Result<Order> {
        self.orders
            .get(&order_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    pub fn list(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.iter().map(|entry| entry.value().clone()).collect();
        orders.sort_by_key(|order| order.created_at);
        orders
    }

    /// Moves a pending order to the status implied by `result`.
    pub fn apply_payment(&self, result: &PaymentResult) -> Result<Order> {
        let mut order = self
            .orders
            .get_mut(&result.order_id)
            .ok_or_else(|| OrderError::NotFound(result.order_id.to_string()))?;

        if order.status.is_terminal() {
            return Err(OrderError::InvalidTransition {
                order_id: order.id,
                status: order.status,
            });
        }

        order.status = Order::status_for(result);
        order.reason = result.reason.clone();
        order.payment_id = result.payment_id;
        order.updated_at = Utc::now();

        Ok(order.clone())
    }
}
