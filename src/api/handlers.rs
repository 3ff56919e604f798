use crate::application::{
    BonusRequest, CreateOrderRequest, ErrorResponse, LockWalletRequest, MarkFailedRequest,
    PaymentService, RefundRequest, VerifyPaymentRequest, WalletAmountRequest, WalletPayRequest,
    WalletService, WithdrawRequest,
};
use crate::domain::errors::DomainError;
use crate::domain::TransactionType;
use crate::ports::{GatewayPort, OrderServicePort, PaymentRepositoryPort, WalletRepositoryPort};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Application state
pub struct AppState<G, R, O, W>
where
    G: GatewayPort,
    R: PaymentRepositoryPort,
    O: OrderServicePort,
    W: WalletRepositoryPort,
{
    pub payment_service: Arc<PaymentService<G, R, O>>,
    pub wallet_service: Arc<WalletService<W>>,
}

impl<G, R, O, W> Clone for AppState<G, R, O, W>
where
    G: GatewayPort,
    R: PaymentRepositoryPort,
    O: OrderServicePort,
    W: WalletRepositoryPort,
{
    fn clone(&self) -> Self {
        Self {
            payment_service: self.payment_service.clone(),
            wallet_service: self.wallet_service.clone(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn into_api_error(e: DomainError) -> ApiError {
    let (status, code) = match &e {
        DomainError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        DomainError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
        DomainError::InvalidState { .. } => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
        DomainError::PaymentRecordNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        DomainError::WalletLocked { .. } => (StatusCode::LOCKED, "WALLET_LOCKED"),
        DomainError::WalletInactive(_) => (StatusCode::FORBIDDEN, "WALLET_INACTIVE"),
        DomainError::InsufficientBalance { .. } => {
            (StatusCode::PAYMENT_REQUIRED, "INSUFFICIENT_BALANCE")
        }
        DomainError::GatewayError(_) => (StatusCode::BAD_GATEWAY, "GATEWAY_ERROR"),
        DomainError::RefundFailed(_) => (StatusCode::BAD_GATEWAY, "REFUND_FAILED"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Internal error: {}", e);
    }
    (status, Json(ErrorResponse::new(code.to_string(), e.to_string())))
}

/// Create a gateway payment order
pub async fn create_payment<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    info!("Received payment order request for customer: {}", request.customer_id);

    state
        .payment_service
        .create_order(request)
        .await
        .map(|response| (StatusCode::CREATED, Json(response)))
        .map_err(into_api_error)
}

/// Submit proof of payment
pub async fn verify_payment<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    info!("Received verification for gateway order: {}", request.external_order_id);

    state
        .payment_service
        .verify(request)
        .await
        .map(Json)
        .map_err(into_api_error)
}

/// Refund a successful payment
pub async fn refund_payment<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Json(request): Json<RefundRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .payment_service
        .refund(request)
        .await
        .map(Json)
        .map_err(into_api_error)
}

/// Out-of-band failure report
pub async fn report_payment_failure<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Json(request): Json<MarkFailedRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .payment_service
        .mark_failed(request)
        .await
        .map(Json)
        .map_err(into_api_error)
}

/// Payment status by internal ID
pub async fn get_payment<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .payment_service
        .get(id)
        .await
        .map(Json)
        .map_err(into_api_error)
}

/// Payment status by gateway order ID
pub async fn get_payment_by_gateway_order<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(external_order_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .payment_service
        .get_by_external_order_id(&external_order_id)
        .await
        .map(Json)
        .map_err(into_api_error)
}

/// Payment status by marketplace order ID
pub async fn get_payment_by_order<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .payment_service
        .get_by_order_id(&order_id)
        .await
        .map(Json)
        .map_err(into_api_error)
}

pub async fn list_customer_payments<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .payment_service
        .list_by_customer(&customer_id)
        .await
        .map(Json)
        .map_err(into_api_error)
}

pub async fn list_vendor_payments<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(vendor_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .payment_service
        .list_by_vendor(&vendor_id)
        .await
        .map(Json)
        .map_err(into_api_error)
}

/// Fetch (or lazily create) the customer's wallet
pub async fn get_wallet<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .wallet_service
        .get_or_create(&customer_id)
        .await
        .map(Json)
        .map_err(into_api_error)
}

pub async fn get_wallet_balance<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .wallet_service
        .get_or_create(&customer_id)
        .await
        .map(|wallet| {
            Json(serde_json::json!({
                "customer_id": wallet.customer_id,
                "balance": wallet.balance,
                "currency": wallet.currency,
            }))
        })
        .map_err(into_api_error)
}

fn credit_type_for(reference_type: Option<&str>) -> TransactionType {
    match reference_type {
        Some("refund") => TransactionType::Refund,
        Some("cashback") => TransactionType::Cashback,
        Some("bonus") | Some("voucher") => TransactionType::Bonus,
        _ => TransactionType::Credit,
    }
}

/// Credit the wallet; refund/cashback/bonus are selected by reference type
pub async fn credit_wallet<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
    Json(request): Json<WalletAmountRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    let txn_type = credit_type_for(request.reference_type.as_deref());

    state
        .wallet_service
        .credit(
            &customer_id,
            request.amount,
            txn_type,
            request.description.unwrap_or_else(|| "Wallet credit".to_string()),
            request.reference_id,
            request.reference_type,
        )
        .await
        .map(|txn| (StatusCode::CREATED, Json(txn)))
        .map_err(into_api_error)
}

/// Debit the wallet
pub async fn debit_wallet<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
    Json(request): Json<WalletAmountRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .wallet_service
        .debit(
            &customer_id,
            request.amount,
            TransactionType::Debit,
            request.description.unwrap_or_else(|| "Wallet debit".to_string()),
            request.reference_id,
            request.reference_type,
        )
        .await
        .map(|txn| (StatusCode::CREATED, Json(txn)))
        .map_err(into_api_error)
}

/// Pay for an order from the wallet balance
pub async fn pay_with_wallet<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
    Json(request): Json<WalletPayRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    info!("Wallet payment for order {} by customer {}", request.order_id, customer_id);

    state
        .wallet_service
        .pay_with_wallet(&customer_id, request.amount, &request.order_id)
        .await
        .map(Json)
        .map_err(into_api_error)
}

pub async fn withdraw_from_wallet<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
    Json(request): Json<WithdrawRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .wallet_service
        .withdraw(&customer_id, request.amount, request.method)
        .await
        .map(Json)
        .map_err(into_api_error)
}

pub async fn apply_wallet_bonus<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
    Json(request): Json<BonusRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .wallet_service
        .apply_bonus(
            &customer_id,
            request.amount,
            &request.voucher_code,
            request.description,
        )
        .await
        .map(Json)
        .map_err(into_api_error)
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub limit: Option<usize>,
}

/// Ledger entries, most-recent-first; `limit` trims the page
pub async fn wallet_transactions<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
    Query(query): Query<TransactionsQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    let result = match query.limit {
        Some(limit) => {
            state
                .wallet_service
                .recent_transactions(&customer_id, limit)
                .await
        }
        None => state.wallet_service.transaction_history(&customer_id).await,
    };

    result.map(Json).map_err(into_api_error)
}

pub async fn wallet_summary<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .wallet_service
        .summary(&customer_id)
        .await
        .map(Json)
        .map_err(into_api_error)
}

pub async fn lock_wallet<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
    Json(request): Json<LockWalletRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .wallet_service
        .lock(&customer_id, request.reason)
        .await
        .map(Json)
        .map_err(into_api_error)
}

pub async fn unlock_wallet<G, R, O, W>(
    State(state): State<AppState<G, R, O, W>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    O: OrderServicePort + 'static,
    W: WalletRepositoryPort + 'static,
{
    state
        .wallet_service
        .unlock(&customer_id)
        .await
        .map(Json)
        .map_err(into_api_error)
}

/// Health check
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
