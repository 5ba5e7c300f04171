use anyhow::Result;
use clap::Parser;
use order_service::{
    api,
    coordinator::OrderCoordinator,
    payment_client::{HttpPaymentClient, RetryPolicy},
    store::OrderStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "order-service")]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 8001)]
    port: u16,

    #[arg(long, env = "PAYMENT_SERVICE_URL", default_value = "http://localhost:8002")]
    payment_service_url: String,

    /// Upper bound on a single call to the payment service.
    #[arg(long, env = "PAYMENT_TIMEOUT_MS", default_value_t = 2000)]
    payment_timeout_ms: u64,

    #[arg(long, env = "PAYMENT_MAX_RETRIES", default_value_t = 2)]
    payment_max_retries: u32,

    #[arg(long, env = "PAYMENT_RETRY_BACKOFF_MS", default_value_t = 200)]
    payment_retry_backoff_ms: u64,
}

impl Args {
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.payment_max_retries,
            backoff: Duration::from_millis(self.payment_retry_backoff_ms),
            attempt_timeout: Duration::from_millis(self.payment_timeout_ms),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let policy = args.retry_policy();
    let payments = HttpPaymentClient::new(&args.payment_service_url, policy.attempt_timeout)?;
    info!(
        "Payment service at {} ({} retries, {:?} backoff, {:?} per attempt)",
        args.payment_service_url, policy.max_retries, policy.backoff, policy.attempt_timeout
    );

    let coordinator = OrderCoordinator::new(OrderStore::new(), Arc::new(payments), policy);
    let app = api::create_router(api::AppState { coordinator });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;

    info!("Order service ready to accept HTTP requests at http://0.0.0.0:{}/orders", args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Order service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
