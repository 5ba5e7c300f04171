use anyhow::Result;
use bigdecimal::BigDecimal;
use clap::Parser;
use payment_service::{api, processor::PaymentProcessor};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "payment-service")]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 8002)]
    port: u16,

    /// Largest amount accepted in a single payment.
    #[arg(long, env = "TRANSACTION_LIMIT", default_value = "5000")]
    transaction_limit: BigDecimal,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let processor = PaymentProcessor::new(args.transaction_limit)?;
    info!("Per-transaction limit set to {}", processor.transaction_limit());

    let app = api::create_router(api::AppState { processor });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;

    info!("Payment service ready to accept HTTP requests at http://0.0.0.0:{}/payments", args.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Payment service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
