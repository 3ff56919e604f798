use marketpay::api::{self, AppState};
use marketpay::application::{PaymentService, WalletService};
use marketpay::domain::SignatureVerifier;
use marketpay::infrastructure::{
    AppConfig, GatewayConfig, HttpGatewayClient, HttpOrderClient, MySqlPaymentRepository,
    MySqlWalletRepository,
};
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();

    info!("Starting payment & wallet service...");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    info!("Connecting to database...");

    let pool = Arc::new(MySqlPool::connect(&database_url).await?);
    info!("Database connected successfully");

    let gateway_config = GatewayConfig::from_env();
    let app_config = AppConfig::from_env();
    info!("Gateway configuration loaded for key: {}", gateway_config.key_id);

    let gateway = Arc::new(HttpGatewayClient::new(gateway_config.clone())?);
    let order_client = Arc::new(HttpOrderClient::new(app_config.order_service_url.clone()));
    let payment_repository = Arc::new(MySqlPaymentRepository::new(pool.clone()));
    let wallet_repository = Arc::new(MySqlWalletRepository::new(pool));

    let payment_service = Arc::new(PaymentService::new(
        gateway,
        payment_repository,
        order_client,
        SignatureVerifier::new(gateway_config.webhook_secret.clone()),
        gateway_config.key_id.clone(),
        app_config.default_currency.clone(),
    ));
    let wallet_service = Arc::new(WalletService::new(
        wallet_repository,
        app_config.default_currency.clone(),
    ));

    let app_state = AppState {
        payment_service,
        wallet_service,
    };

    let app = api::create_router(app_state);

    let addr = format!("{}:{}", app_config.host, app_config.port);
    info!("Server listening on {}", addr);
    info!("Available endpoints:");
    info!("  GET  /health - Health check");
    info!("  POST /api/payments/orders - Create payment order");
    info!("  POST /api/payments/verify - Verify proof of payment");
    info!("  POST /api/payments/refund - Refund a payment");
    info!("  GET  /api/wallet/:customer_id - Wallet state");
    info!("  POST /api/wallet/:customer_id/credit - Credit wallet");
    info!("  POST /api/wallet/:customer_id/debit - Debit wallet");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
