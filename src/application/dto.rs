use crate::domain::{Money, PaymentOrder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create payment order request
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in major currency units
    pub amount: Money,

    /// Currency code; defaults to the configured currency
    pub currency: Option<String>,

    pub customer_id: String,
    pub vendor_id: Option<String>,

    /// Marketplace order to associate, if any
    pub order_id: Option<String>,

    pub description: Option<String>,
}

/// Create payment order response; carries what the caller needs to drive
/// checkout out of process
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub payment_id: Uuid,
    pub external_order_id: String,
    pub amount: Money,
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,

    /// Public gateway key for the client-side checkout
    pub gateway_key_id: String,

    pub status: String,
}

/// Proof-of-payment submission
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub external_order_id: String,
    pub external_payment_id: String,
    pub signature: String,
}

/// Refund request; the payment is referenced by internal or gateway payment ID
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    pub payment_id: Option<Uuid>,
    pub external_payment_id: Option<String>,

    /// Zero/omitted means full refund
    pub amount: Option<Money>,

    pub reason: String,
}

/// Out-of-band failure report (e.g. a gateway webhook)
#[derive(Debug, Deserialize)]
pub struct MarkFailedRequest {
    pub external_payment_id: Option<String>,
    pub external_order_id: Option<String>,
    pub error_code: String,
    pub error_description: String,
}

/// Payment order view
#[derive(Debug, Serialize)]
pub struct PaymentOrderResponse {
    pub id: Uuid,
    pub receipt: String,
    pub external_order_id: Option<String>,
    pub external_payment_id: Option<String>,
    pub order_id: Option<String>,
    pub customer_id: String,
    pub vendor_id: Option<String>,
    pub amount: Money,
    pub currency: String,
    pub status: String,
    pub refund_id: Option<String>,
    pub refund_amount: Option<Money>,
    pub refund_reason: Option<String>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&PaymentOrder> for PaymentOrderResponse {
    fn from(order: &PaymentOrder) -> Self {
        Self {
            id: order.id,
            receipt: order.receipt.clone(),
            external_order_id: order.external_order_id.clone(),
            external_payment_id: order.external_payment_id.clone(),
            order_id: order.order_id.clone(),
            customer_id: order.customer_id.clone(),
            vendor_id: order.vendor_id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            status: order.status.to_string(),
            refund_id: order.refund_id.clone(),
            refund_amount: order.refund_amount,
            refund_reason: order.refund_reason.clone(),
            refunded_at: order.refunded_at,
            error_code: order.error_code.clone(),
            error_description: order.error_description.clone(),
            created_at: order.created_at,
            completed_at: order.completed_at,
        }
    }
}

/// Wallet credit/debit request
#[derive(Debug, Deserialize)]
pub struct WalletAmountRequest {
    pub amount: Money,
    pub description: Option<String>,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
}

/// Pay-with-wallet request
#[derive(Debug, Deserialize)]
pub struct WalletPayRequest {
    pub amount: Money,
    pub order_id: String,
}

/// Withdrawal request
#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: Money,

    /// Defaults to bank transfer
    pub method: Option<String>,
}

/// Voucher/bonus credit request
#[derive(Debug, Deserialize)]
pub struct BonusRequest {
    pub amount: Money,
    pub voucher_code: String,
    pub description: Option<String>,
}

/// Wallet lock request
#[derive(Debug, Deserialize)]
pub struct LockWalletRequest {
    pub reason: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self { error, message }
    }
}
