use crate::domain::errors::{DomainError, DomainResult};
use crate::infrastructure::config::GatewayConfig;
use crate::ports::gateway_port::{
    GatewayOrderRequest, GatewayOrderResponse, GatewayRefundRequest, GatewayRefundResponse,
};
use crate::ports::GatewayPort;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// HTTP adapter for the external payment gateway.
///
/// Requests authenticate with basic auth (key id/secret) and are bounded by
/// the configured timeout; any transport or non-2xx outcome maps to
/// `GatewayError` so callers know no local state changed and a retry is safe.
#[derive(Clone)]
pub struct HttpGatewayClient {
    config: Arc<GatewayConfig>,
    client: Client,
}

impl HttpGatewayClient {
    pub fn new(config: Arc<GatewayConfig>) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ConfigurationError(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn extract_id(payload: &serde_json::Value, context: &str) -> DomainResult<String> {
        payload["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| DomainError::GatewayError(format!("Missing id in {} response", context)))
    }
}

#[async_trait]
impl GatewayPort for HttpGatewayClient {
    async fn create_order(
        &self,
        request: GatewayOrderRequest,
    ) -> DomainResult<GatewayOrderResponse> {
        let url = format!("{}/v1/orders", self.config.base_url);

        let body = json!({
            "amount": request.amount_minor,
            "currency": request.currency,
            "receipt": request.receipt,
            "notes": request.notes,
        });
        debug!("Gateway order request: {}", body);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::GatewayError(format!("Order creation failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gateway order API error: {} - {}", status, error_text);
            return Err(DomainError::GatewayError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DomainError::GatewayError(format!("Invalid order response: {}", e)))?;
        debug!("Gateway order response: {}", payload);

        Ok(GatewayOrderResponse {
            remote_order_id: Self::extract_id(&payload, "order")?,
        })
    }

    async fn refund(&self, request: GatewayRefundRequest) -> DomainResult<GatewayRefundResponse> {
        let url = format!(
            "{}/v1/payments/{}/refund",
            self.config.base_url, request.remote_payment_id
        );

        let body = json!({
            "amount": request.amount_minor,
            "speed": request.speed,
            "notes": request.notes,
        });
        debug!("Gateway refund request: {}", body);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::GatewayError(format!("Refund call failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gateway refund API error: {} - {}", status, error_text);
            return Err(DomainError::GatewayError(format!(
                "Refund returned {}: {}",
                status, error_text
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DomainError::GatewayError(format!("Invalid refund response: {}", e)))?;

        Ok(GatewayRefundResponse {
            refund_id: Self::extract_id(&payload, "refund")?,
        })
    }
}
