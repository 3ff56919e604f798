use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error code recorded when a callback carries a bad signature
pub const SIGNATURE_MISMATCH: &str = "SIGNATURE_MISMATCH";

/// One attempt to collect payment through the external gateway.
///
/// Financial record: never deleted. State machine is
/// `Created -> Success | Failed` and `Success -> Refunded`; Failed and
/// Refunded are terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Internal order ID
    pub id: Uuid,

    /// Unique receipt identifier sent to the gateway
    pub receipt: String,

    /// Gateway order ID, set once the remote order exists
    pub external_order_id: Option<String>,

    /// Gateway payment ID, set after a verification attempt
    pub external_payment_id: Option<String>,

    /// Associated marketplace order, if any
    pub order_id: Option<String>,

    pub customer_id: String,
    pub vendor_id: Option<String>,

    /// Amount in major currency units
    pub amount: Money,
    pub currency: String,

    pub status: PaymentStatus,

    /// Signature presented by the caller, recorded on both verification
    /// outcomes for audit
    pub signature: Option<String>,

    pub refund_id: Option<String>,
    pub refund_amount: Option<Money>,
    pub refund_reason: Option<String>,
    pub refunded_at: Option<DateTime<Utc>>,

    pub error_code: Option<String>,
    pub error_description: Option<String>,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentOrder {
    /// Create a new payment order in Created state
    pub fn new(
        amount: Money,
        currency: String,
        customer_id: String,
        vendor_id: Option<String>,
        order_id: Option<String>,
        description: Option<String>,
    ) -> DomainResult<Self> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount(
                "Amount must be greater than 0".to_string(),
            ));
        }

        if customer_id.is_empty() {
            return Err(DomainError::ValidationError(
                "Customer ID must not be empty".to_string(),
            ));
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            receipt: format!("rcpt_{}", Uuid::new_v4().simple()),
            external_order_id: None,
            external_payment_id: None,
            order_id,
            customer_id,
            vendor_id,
            amount,
            currency,
            status: PaymentStatus::Created,
            signature: None,
            refund_id: None,
            refund_amount: None,
            refund_reason: None,
            refunded_at: None,
            error_code: None,
            error_description: None,
            description,
            created_at: now,
            completed_at: None,
            updated_at: now,
        })
    }

    /// Record the gateway order ID after the remote order was created
    pub fn attach_external_order(&mut self, external_order_id: String) {
        self.external_order_id = Some(external_order_id);
        self.updated_at = Utc::now();
    }

    /// Mark as paid after a valid proof of payment
    pub fn mark_succeeded(
        &mut self,
        external_payment_id: String,
        signature: String,
    ) -> DomainResult<()> {
        if self.status != PaymentStatus::Created {
            return Err(DomainError::InvalidState {
                expected: PaymentStatus::Created.to_string(),
                actual: self.status.to_string(),
            });
        }

        let now = Utc::now();
        self.status = PaymentStatus::Success;
        self.external_payment_id = Some(external_payment_id);
        self.signature = Some(signature);
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Mark as failed because the presented signature did not verify.
    /// The payment ID and signature are kept for the fraud audit trail.
    pub fn mark_signature_rejected(
        &mut self,
        external_payment_id: String,
        signature: String,
    ) -> DomainResult<()> {
        if self.status != PaymentStatus::Created {
            return Err(DomainError::InvalidState {
                expected: PaymentStatus::Created.to_string(),
                actual: self.status.to_string(),
            });
        }

        self.status = PaymentStatus::Failed;
        self.external_payment_id = Some(external_payment_id);
        self.signature = Some(signature);
        self.error_code = Some(SIGNATURE_MISMATCH.to_string());
        self.error_description = Some("Payment signature verification failed".to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark as failed from an out-of-band gateway report
    pub fn mark_failed(&mut self, error_code: String, error_description: String) -> DomainResult<()> {
        if self.status != PaymentStatus::Created && self.status != PaymentStatus::Success {
            return Err(DomainError::InvalidState {
                expected: "created or success".to_string(),
                actual: self.status.to_string(),
            });
        }

        self.status = PaymentStatus::Failed;
        self.error_code = Some(error_code);
        self.error_description = Some(error_description);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark as refunded; only a successful payment can be refunded, once
    pub fn mark_refunded(
        &mut self,
        refund_id: String,
        refund_amount: Money,
        reason: String,
    ) -> DomainResult<()> {
        if self.status != PaymentStatus::Success {
            return Err(DomainError::InvalidState {
                expected: PaymentStatus::Success.to_string(),
                actual: self.status.to_string(),
            });
        }

        let now = Utc::now();
        self.status = PaymentStatus::Refunded;
        self.refund_id = Some(refund_id);
        self.refund_amount = Some(refund_amount);
        self.refund_reason = Some(reason);
        self.refunded_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
