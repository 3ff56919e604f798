pub mod adapters;
pub mod config;

pub use adapters::{
    HttpGatewayClient, HttpOrderClient, InMemoryPaymentRepository, InMemoryWalletRepository,
    MySqlPaymentRepository, MySqlWalletRepository,
};
pub use config::{AppConfig, GatewayConfig};
