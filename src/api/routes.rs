use super::handlers::*;
use crate::ports::{GatewayPort, OrderServicePort, PaymentRepositoryPort, WalletRepositoryPort};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router<G, R, O, W>(state: AppState<G, R, O, W>) -> Router
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/payments/orders", post(create_payment))
        .route("/api/payments/verify", post(verify_payment))
        .route("/api/payments/refund", post(refund_payment))
        .route("/api/payments/failure", post(report_payment_failure))
        .route("/api/payments/:id", get(get_payment))
        .route("/api/payments/by-order/:order_id", get(get_payment_by_order))
        .route(
            "/api/payments/by-gateway-order/:external_order_id",
            get(get_payment_by_gateway_order),
        )
        .route(
            "/api/customers/:customer_id/payments",
            get(list_customer_payments),
        )
        .route("/api/vendors/:vendor_id/payments", get(list_vendor_payments))
        .route("/api/wallet/:customer_id", get(get_wallet))
        .route("/api/wallet/:customer_id/balance", get(get_wallet_balance))
        .route("/api/wallet/:customer_id/credit", post(credit_wallet))
        .route("/api/wallet/:customer_id/debit", post(debit_wallet))
        .route("/api/wallet/:customer_id/pay", post(pay_with_wallet))
        .route("/api/wallet/:customer_id/withdraw", post(withdraw_from_wallet))
        .route("/api/wallet/:customer_id/bonus", post(apply_wallet_bonus))
        .route(
            "/api/wallet/:customer_id/transactions",
            get(wallet_transactions),
        )
        .route("/api/wallet/:customer_id/summary", get(wallet_summary))
        .route("/api/wallet/:customer_id/lock", post(lock_wallet))
        .route("/api/wallet/:customer_id/unlock", post(unlock_wallet))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
