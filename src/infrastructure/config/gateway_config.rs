use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Payment gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Public key ID, handed to clients for checkout
    pub key_id: String,

    /// API secret for authenticated gateway calls
    pub key_secret: String,

    /// Shared secret for callback signature verification; injected so it
    /// can be rotated without code changes
    pub webhook_secret: String,

    /// API base URL
    pub base_url: String,

    /// Gateway call timeout in seconds
    pub timeout_secs: u64,
}

impl GatewayConfig {
    pub fn from_env() -> Arc<Self> {
        Arc::new(Self {
            key_id: std::env::var("GATEWAY_KEY_ID").expect("GATEWAY_KEY_ID must be set"),
            key_secret: std::env::var("GATEWAY_KEY_SECRET")
                .expect("GATEWAY_KEY_SECRET must be set"),
            webhook_secret: std::env::var("GATEWAY_WEBHOOK_SECRET")
                .expect("GATEWAY_WEBHOOK_SECRET must be set"),
            base_url: std::env::var("GATEWAY_BASE_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
            timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default currency for payment orders and new wallets
    pub default_currency: String,

    /// Base URL of the marketplace order service
    pub order_service_url: String,

    pub host: String,
    pub port: String,
}

impl AppConfig {
    pub fn from_env() -> Arc<Self> {
        Arc::new(Self {
            default_currency: std::env::var("DEFAULT_CURRENCY")
                .unwrap_or_else(|_| "INR".to_string()),
            order_service_url: std::env::var("ORDER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string()),
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("SERVER_PORT").unwrap_or_else(|_| "3000".to_string()),
        })
    }
}
