use async_trait::async_trait;
use marketpay::application::{PaymentService, WalletService};
use marketpay::domain::errors::{DomainError, DomainResult};
use marketpay::domain::SignatureVerifier;
use marketpay::infrastructure::{InMemoryPaymentRepository, InMemoryWalletRepository};
use marketpay::ports::gateway_port::{
    GatewayOrderRequest, GatewayOrderResponse, GatewayRefundRequest, GatewayRefundResponse,
};
use marketpay::ports::{GatewayPort, OrderPaymentStatus, OrderServicePort};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "test_webhook_secret";
pub const TEST_KEY_ID: &str = "key_test_123";

/// Gateway double that records calls and can be switched to fail
#[derive(Default)]
pub struct FakeGateway {
    pub fail_orders: AtomicBool,
    pub fail_refunds: AtomicBool,
    pub orders: Mutex<Vec<GatewayOrderRequest>>,
    pub refunds: Mutex<Vec<GatewayRefundRequest>>,
    counter: AtomicU64,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_calls(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn refund_calls(&self) -> usize {
        self.refunds.lock().unwrap().len()
    }
}

#[async_trait]
impl GatewayPort for FakeGateway {
    async fn create_order(
        &self,
        request: GatewayOrderRequest,
    ) -> DomainResult<GatewayOrderResponse> {
        if self.fail_orders.load(Ordering::SeqCst) {
            return Err(DomainError::GatewayError("gateway unavailable".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        self.orders.lock().unwrap().push(request);
        Ok(GatewayOrderResponse {
            remote_order_id: format!("order_fake_{}", n),
        })
    }

    async fn refund(&self, request: GatewayRefundRequest) -> DomainResult<GatewayRefundResponse> {
        if self.fail_refunds.load(Ordering::SeqCst) {
            return Err(DomainError::GatewayError("gateway unavailable".to_string()));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        self.refunds.lock().unwrap().push(request);
        Ok(GatewayRefundResponse {
            refund_id: format!("rfnd_fake_{}", n),
        })
    }
}

/// Order collaborator double that records every notification
#[derive(Default)]
pub struct RecordingOrderClient {
    pub notifications: Mutex<Vec<(String, OrderPaymentStatus, Option<String>)>>,
}

impl RecordingOrderClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<(String, OrderPaymentStatus, Option<String>)> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderServicePort for RecordingOrderClient {
    async fn set_payment_status(
        &self,
        order_id: &str,
        status: OrderPaymentStatus,
        transaction_id: Option<&str>,
    ) -> DomainResult<()> {
        self.notifications.lock().unwrap().push((
            order_id.to_string(),
            status,
            transaction_id.map(String::from),
        ));
        Ok(())
    }
}

pub type TestPaymentService =
    PaymentService<FakeGateway, InMemoryPaymentRepository, RecordingOrderClient>;

pub struct PaymentHarness {
    pub service: Arc<TestPaymentService>,
    pub gateway: Arc<FakeGateway>,
    pub repository: Arc<InMemoryPaymentRepository>,
    pub order_client: Arc<RecordingOrderClient>,
    pub verifier: SignatureVerifier,
}

impl PaymentHarness {
    pub fn new() -> Self {
        let gateway = Arc::new(FakeGateway::new());
        let repository = Arc::new(InMemoryPaymentRepository::new());
        let order_client = Arc::new(RecordingOrderClient::new());
        let service = Arc::new(PaymentService::new(
            gateway.clone(),
            repository.clone(),
            order_client.clone(),
            SignatureVerifier::new(TEST_SECRET),
            TEST_KEY_ID.to_string(),
            "INR".to_string(),
        ));
        Self {
            service,
            gateway,
            repository,
            order_client,
            verifier: SignatureVerifier::new(TEST_SECRET),
        }
    }
}

pub fn wallet_service() -> Arc<WalletService<InMemoryWalletRepository>> {
    Arc::new(WalletService::new(
        Arc::new(InMemoryWalletRepository::new()),
        "INR".to_string(),
    ))
}

/// Let spawned fire-and-forget tasks run to completion
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
}
