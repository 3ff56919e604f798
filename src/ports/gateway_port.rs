use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Remote order creation request; amount is in minor currency units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrderRequest {
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrderResponse {
    pub remote_order_id: String,
}

/// Refund request against an already-captured payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRefundRequest {
    pub remote_payment_id: String,
    pub amount_minor: i64,
    pub speed: String,
    pub notes: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRefundResponse {
    pub refund_id: String,
}

/// External payment gateway port. Calls are network I/O, bounded by a
/// timeout; any failure maps to `GatewayError` with no local state change.
#[async_trait]
pub trait GatewayPort: Send + Sync {
    /// Create a remote order the customer completes out of band
    async fn create_order(&self, request: GatewayOrderRequest) -> DomainResult<GatewayOrderResponse>;

    /// Refund a captured payment
    async fn refund(&self, request: GatewayRefundRequest) -> DomainResult<GatewayRefundResponse>;
}
