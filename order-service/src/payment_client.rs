use async_trait::async_trait;
use shared::{PaymentRequest, PaymentResult};
use std::time::Duration;
use thiserror::Error;

/// Failures to get any answer out of the payment processor.
///
/// A declined payment is not one of these: it arrives as a regular
/// `PaymentResult`.
#[derive(Debug, Error)]
pub enum PaymentClientError {
    #[error("payment processor unreachable: {0}")]
    Unreachable(String),

    #[error("payment processor timed out after {0:?}")]
    Timeout(Duration),

    #[error("payment processor answered with status {0}")]
    UnexpectedStatus(u16),

    #[error("malformed payment processor response: {0}")]
    Malformed(String),
}

/// Capability to submit a payment for an order.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResult, PaymentClientError>;
}

/// How hard the coordinator tries before giving up on the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts made after the first one failed.
    pub max_retries: u32,
    pub backoff: Duration,
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(200),
            attempt_timeout: Duration::from_secs(2),
        }
    }
}

pub struct HttpPaymentClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPaymentClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PaymentClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentClientError::Unreachable(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> PaymentClientError {
        if err.is_timeout() {
            PaymentClientError::Timeout(self.timeout)
        } else if err.is_decode() {
            PaymentClientError::Malformed(err.to_string())
        } else {
            PaymentClientError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
impl PaymentClient for HttpPaymentClient {
    async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResult, PaymentClientError> {
        let url = format!("{}/payments", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(PaymentClientError::UnexpectedStatus(response.status().as_u16()));
        }

        let result: PaymentResult = response.json().await.map_err(|e| self.classify(e))?;
        if result.order_id != request.order_id {
            return Err(PaymentClientError::Malformed(format!(
                "result for order {} returned for order {}",
                result.order_id, request.order_id
            )));
        }
        if !result.is_well_formed() {
            return Err(PaymentClientError::Malformed(format!(
                "{:?} result for order {} with reason {:?}",
                result.outcome, result.order_id, result.reason
            )));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};
    use uuid::Uuid;

    /// Serves a payment endpoint that always answers with `body`.
    async fn spawn_processor_answering(body: Value) -> String {
        let app = Router::new().route("/payments", post(move || async move { Json(body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn payment_request(order_id: Uuid) -> PaymentRequest {
        PaymentRequest {
            order_id,
            amount: bigdecimal::BigDecimal::from(10),
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.backoff, Duration::from_millis(200));
        assert_eq!(policy.attempt_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = HttpPaymentClient::new("http://payments:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://payments:8000");
    }

    #[tokio::test]
    async fn test_unreachable_processor_is_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let client = HttpPaymentClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = client.process_payment(&payment_request(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(
            err,
            PaymentClientError::Unreachable(_) | PaymentClientError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn test_reason_must_match_outcome() {
        let order_id = Uuid::new_v4();
        let answers = [
            json!({ "orderId": order_id, "outcome": "Declined", "processedAt": "2026-10-18T12:00:00Z" }),
            json!({
                "orderId": order_id,
                "outcome": "Completed",
                "reason": "limit_exceeded",
                "processedAt": "2026-10-18T12:00:00Z"
            }),
        ];

        for answer in answers {
            let url = spawn_processor_answering(answer).await;
            let client = HttpPaymentClient::new(url, Duration::from_secs(1)).unwrap();
            let err = client.process_payment(&payment_request(order_id)).await.unwrap_err();
            assert!(matches!(err, PaymentClientError::Malformed(_)));
        }
    }

    #[tokio::test]
    async fn test_consistent_decline_is_accepted() {
        let order_id = Uuid::new_v4();
        let url = spawn_processor_answering(json!({
            "paymentId": Uuid::new_v4(),
            "orderId": order_id,
            "outcome": "Declined",
            "reason": "limit_exceeded",
            "processedAt": "2026-10-18T12:00:00Z"
        }))
        .await;
        let client = HttpPaymentClient::new(url, Duration::from_secs(1)).unwrap();

        let result = client.process_payment(&payment_request(order_id)).await.unwrap();
        assert_eq!(result.outcome, shared::PaymentOutcome::Declined);
        assert_eq!(result.reason.as_deref(), Some("limit_exceeded"));
    }
}
