use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status as reported to the marketplace order service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPaymentStatus {
    Paid,
    Failed,
    Refunded,
}

impl fmt::Display for OrderPaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderPaymentStatus::Paid => write!(f, "PAID"),
            OrderPaymentStatus::Failed => write!(f, "FAILED"),
            OrderPaymentStatus::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// Marketplace order collaborator. Fire-and-forget from the payment core's
/// perspective: a failed notification is logged, never rolled back into
/// payment state.
#[async_trait]
pub trait OrderServicePort: Send + Sync {
    async fn set_payment_status(
        &self,
        order_id: &str,
        status: OrderPaymentStatus,
        transaction_id: Option<&str>,
    ) -> DomainResult<()>;
}
