use crate::application::dto::{
    CreateOrderRequest, CreateOrderResponse, MarkFailedRequest, PaymentOrderResponse,
    RefundRequest, VerifyPaymentRequest,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{PaymentOrder, PaymentStatus, SignatureVerifier};
use crate::ports::gateway_port::{GatewayOrderRequest, GatewayRefundRequest};
use crate::ports::{GatewayPort, OrderPaymentStatus, OrderServicePort, PaymentRepositoryPort};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Payment gateway orchestrator.
///
/// Drives a PaymentOrder through `Created -> Success | Failed` and
/// `Success -> Refunded`. Success is only ever reached after a valid HMAC
/// proof; the marketplace order service is informed fire-and-forget.
pub struct PaymentService<G: GatewayPort, R: PaymentRepositoryPort, O: OrderServicePort> {
    gateway: Arc<G>,
    repository: Arc<R>,
    order_service: Arc<O>,
    verifier: SignatureVerifier,
    gateway_key_id: String,
    default_currency: String,
}

impl<G, R, O> PaymentService<G, R, O>
where
    G: GatewayPort,
    R: PaymentRepositoryPort,
    O: OrderServicePort + 'static,
{
    pub fn new(
        gateway: Arc<G>,
        repository: Arc<R>,
        order_service: Arc<O>,
        verifier: SignatureVerifier,
        gateway_key_id: String,
        default_currency: String,
    ) -> Self {
        Self {
            gateway,
            repository,
            order_service,
            verifier,
            gateway_key_id,
            default_currency,
        }
    }

    /// Create a gateway payment order.
    ///
    /// The remote order is created first; nothing is persisted locally when
    /// the gateway call fails, so retries are safe.
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> DomainResult<CreateOrderResponse> {
        info!("Creating payment order for customer: {}", request.customer_id);

        // 1. Build the local record (validates amount > 0)
        let currency = request
            .currency
            .unwrap_or_else(|| self.default_currency.clone());
        let mut order = PaymentOrder::new(
            request.amount,
            currency,
            request.customer_id,
            request.vendor_id,
            request.order_id,
            request.description,
        )?;

        // 2. Create the remote order, amount in minor units
        let gateway_response = self
            .gateway
            .create_order(GatewayOrderRequest {
                amount_minor: order.amount.to_minor_units(),
                currency: order.currency.clone(),
                receipt: order.receipt.clone(),
                notes: Some(json!({
                    "customer_id": order.customer_id,
                    "order_id": order.order_id,
                })),
            })
            .await?;

        // 3. Persist with the gateway order ID attached
        order.attach_external_order(gateway_response.remote_order_id.clone());
        self.repository.save(&order).await?;
        debug!("Payment order saved: {}", order.id);

        Ok(CreateOrderResponse {
            payment_id: order.id,
            external_order_id: gateway_response.remote_order_id,
            amount: order.amount,
            amount_minor: order.amount.to_minor_units(),
            currency: order.currency,
            receipt: order.receipt,
            gateway_key_id: self.gateway_key_id.clone(),
            status: order.status.to_string(),
        })
    }

    /// Verify a proof of payment.
    ///
    /// A signature mismatch is a normal terminal outcome (Failed), not an
    /// error: forged callbacks are expected adversarial input. The order
    /// service is only notified on a genuine match.
    pub async fn verify(
        &self,
        request: VerifyPaymentRequest,
    ) -> DomainResult<PaymentOrderResponse> {
        info!("Verifying payment for gateway order: {}", request.external_order_id);

        let mut order = self
            .repository
            .find_by_external_order_id(&request.external_order_id)
            .await?
            .ok_or_else(|| {
                DomainError::PaymentRecordNotFound(request.external_order_id.clone())
            })?;

        // Idempotent replay: an already-verified payment with the same
        // payment ID returns the stored record, no side effects re-fired
        if order.status == PaymentStatus::Success {
            if order.external_payment_id.as_deref() == Some(request.external_payment_id.as_str()) {
                info!("Duplicate verify for {}, returning stored record", order.id);
                return Ok(PaymentOrderResponse::from(&order));
            }
            return Err(DomainError::InvalidState {
                expected: "matching external payment id on replay".to_string(),
                actual: format!("success with different payment id ({})", order.id),
            });
        }

        if order.is_terminal() {
            return Err(DomainError::InvalidState {
                expected: PaymentStatus::Created.to_string(),
                actual: order.status.to_string(),
            });
        }

        if self.verifier.verify(
            &request.external_order_id,
            &request.external_payment_id,
            &request.signature,
        ) {
            order.mark_succeeded(request.external_payment_id.clone(), request.signature)?;
            self.repository.update(&order).await?;
            info!("Payment verified: {}", order.id);

            self.notify_order_service(
                order.order_id.as_deref(),
                OrderPaymentStatus::Paid,
                Some(request.external_payment_id),
            );
        } else {
            // Fail closed: record the attempt, never touch the order service
            order.mark_signature_rejected(request.external_payment_id, request.signature)?;
            self.repository.update(&order).await?;
            warn!(
                "Signature mismatch for payment order {} (gateway order {}), possible forged callback",
                order.id, request.external_order_id
            );
        }

        Ok(PaymentOrderResponse::from(&order))
    }

    /// Refund a successful payment. One refund per order; zero/omitted
    /// amount means full refund. Gateway failure leaves the record untouched.
    pub async fn refund(&self, request: RefundRequest) -> DomainResult<PaymentOrderResponse> {
        let mut order = self.resolve(request.payment_id, request.external_payment_id.as_deref())
            .await?;
        info!("Refunding payment order: {}", order.id);

        if order.status != PaymentStatus::Success {
            return Err(DomainError::InvalidState {
                expected: PaymentStatus::Success.to_string(),
                actual: order.status.to_string(),
            });
        }

        let refund_amount = match request.amount {
            Some(amount) if amount.is_positive() => {
                if amount > order.amount {
                    return Err(DomainError::InvalidAmount(format!(
                        "Refund amount {} exceeds original amount {}",
                        amount, order.amount
                    )));
                }
                amount
            }
            _ => order.amount,
        };

        let remote_payment_id = order
            .external_payment_id
            .clone()
            .ok_or_else(|| DomainError::InternalError(format!(
                "Successful order {} has no external payment id",
                order.id
            )))?;

        let gateway_response = self
            .gateway
            .refund(GatewayRefundRequest {
                remote_payment_id,
                amount_minor: refund_amount.to_minor_units(),
                speed: "normal".to_string(),
                notes: Some(json!({ "reason": request.reason })),
            })
            .await
            .map_err(|e| DomainError::RefundFailed(e.to_string()))?;

        order.mark_refunded(gateway_response.refund_id, refund_amount, request.reason)?;
        self.repository.update(&order).await?;
        info!("Payment refunded: {} ({})", order.id, refund_amount);

        self.notify_order_service(order.order_id.as_deref(), OrderPaymentStatus::Refunded, None);

        Ok(PaymentOrderResponse::from(&order))
    }

    /// Record an out-of-band failure report from the gateway
    pub async fn mark_failed(
        &self,
        request: MarkFailedRequest,
    ) -> DomainResult<PaymentOrderResponse> {
        let mut order = match (&request.external_payment_id, &request.external_order_id) {
            (Some(payment_id), _) => self
                .repository
                .find_by_external_payment_id(payment_id)
                .await?
                .ok_or_else(|| DomainError::PaymentRecordNotFound(payment_id.clone()))?,
            (None, Some(order_id)) => self
                .repository
                .find_by_external_order_id(order_id)
                .await?
                .ok_or_else(|| DomainError::PaymentRecordNotFound(order_id.clone()))?,
            (None, None) => {
                return Err(DomainError::ValidationError(
                    "Either external_payment_id or external_order_id is required".to_string(),
                ));
            }
        };

        order.mark_failed(request.error_code, request.error_description)?;
        self.repository.update(&order).await?;
        info!("Payment order marked failed: {}", order.id);

        self.notify_order_service(order.order_id.as_deref(), OrderPaymentStatus::Failed, None);

        Ok(PaymentOrderResponse::from(&order))
    }

    /// Status lookup by internal ID
    pub async fn get(&self, id: Uuid) -> DomainResult<PaymentOrderResponse> {
        let order = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::PaymentRecordNotFound(id.to_string()))?;
        Ok(PaymentOrderResponse::from(&order))
    }

    /// Status lookup by gateway order ID
    pub async fn get_by_external_order_id(
        &self,
        external_order_id: &str,
    ) -> DomainResult<PaymentOrderResponse> {
        let order = self
            .repository
            .find_by_external_order_id(external_order_id)
            .await?
            .ok_or_else(|| DomainError::PaymentRecordNotFound(external_order_id.to_string()))?;
        Ok(PaymentOrderResponse::from(&order))
    }

    /// Status lookup by marketplace order ID
    pub async fn get_by_order_id(&self, order_id: &str) -> DomainResult<PaymentOrderResponse> {
        let order = self
            .repository
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| DomainError::PaymentRecordNotFound(order_id.to_string()))?;
        Ok(PaymentOrderResponse::from(&order))
    }

    pub async fn list_by_customer(
        &self,
        customer_id: &str,
    ) -> DomainResult<Vec<PaymentOrderResponse>> {
        let orders = self.repository.list_by_customer(customer_id).await?;
        Ok(orders.iter().map(PaymentOrderResponse::from).collect())
    }

    pub async fn list_by_vendor(&self, vendor_id: &str) -> DomainResult<Vec<PaymentOrderResponse>> {
        let orders = self.repository.list_by_vendor(vendor_id).await?;
        Ok(orders.iter().map(PaymentOrderResponse::from).collect())
    }

    async fn resolve(
        &self,
        payment_id: Option<Uuid>,
        external_payment_id: Option<&str>,
    ) -> DomainResult<PaymentOrder> {
        if let Some(id) = payment_id {
            return self
                .repository
                .find_by_id(id)
                .await?
                .ok_or_else(|| DomainError::PaymentRecordNotFound(id.to_string()));
        }
        if let Some(external_id) = external_payment_id {
            return self
                .repository
                .find_by_external_payment_id(external_id)
                .await?
                .ok_or_else(|| DomainError::PaymentRecordNotFound(external_id.to_string()));
        }
        Err(DomainError::ValidationError(
            "Either payment_id or external_payment_id is required".to_string(),
        ))
    }

    /// Fire-and-forget order-service notification; failures are logged only
    fn notify_order_service(
        &self,
        order_id: Option<&str>,
        status: OrderPaymentStatus,
        transaction_id: Option<String>,
    ) {
        let Some(order_id) = order_id.map(str::to_string) else {
            return;
        };
        let order_service = Arc::clone(&self.order_service);
        tokio::spawn(async move {
            if let Err(e) = order_service
                .set_payment_status(&order_id, status, transaction_id.as_deref())
                .await
            {
                error!(
                    "Failed to notify order service for {} ({}): {}",
                    order_id, status, e
                );
            }
        });
    }
}
