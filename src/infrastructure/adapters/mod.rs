pub mod http_gateway;
pub mod http_order_client;
pub mod in_memory;
pub mod mysql_payment_repository;
pub mod mysql_wallet_repository;

pub use http_gateway::HttpGatewayClient;
pub use http_order_client::HttpOrderClient;
pub use in_memory::{InMemoryPaymentRepository, InMemoryWalletRepository};
pub use mysql_payment_repository::MySqlPaymentRepository;
pub use mysql_wallet_repository::MySqlWalletRepository;
