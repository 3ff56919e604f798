use crate::domain::errors::DomainResult;
use crate::ports::{OrderPaymentStatus, OrderServicePort};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// HTTP client for the marketplace order service
#[derive(Clone)]
pub struct HttpOrderClient {
    base_url: String,
    client: Client,
}

impl HttpOrderClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl OrderServicePort for HttpOrderClient {
    async fn set_payment_status(
        &self,
        order_id: &str,
        status: OrderPaymentStatus,
        transaction_id: Option<&str>,
    ) -> DomainResult<()> {
        let url = format!(
            "{}/internal/orders/{}/payment-status",
            self.base_url, order_id
        );

        let body = json!({
            "status": status,
            "transaction_id": transaction_id,
        });
        debug!("Order status update for {}: {}", order_id, body);

        self.client
            .put(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
