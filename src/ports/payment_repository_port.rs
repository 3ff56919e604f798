use crate::domain::PaymentOrder;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Payment order repository port
#[async_trait]
pub trait PaymentRepositoryPort: Send + Sync {
    /// Persist a new payment order
    async fn save(&self, order: &PaymentOrder) -> DomainResult<()>;

    /// Find by internal ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<PaymentOrder>>;

    /// Find by gateway order ID
    async fn find_by_external_order_id(
        &self,
        external_order_id: &str,
    ) -> DomainResult<Option<PaymentOrder>>;

    /// Find by gateway payment ID
    async fn find_by_external_payment_id(
        &self,
        external_payment_id: &str,
    ) -> DomainResult<Option<PaymentOrder>>;

    /// Find by associated marketplace order ID
    async fn find_by_order_id(&self, order_id: &str) -> DomainResult<Option<PaymentOrder>>;

    /// All payment orders for a customer, newest first
    async fn list_by_customer(&self, customer_id: &str) -> DomainResult<Vec<PaymentOrder>>;

    /// All payment orders for a vendor, newest first
    async fn list_by_vendor(&self, vendor_id: &str) -> DomainResult<Vec<PaymentOrder>>;

    /// Update an existing order
    async fn update(&self, order: &PaymentOrder) -> DomainResult<()>;
}
