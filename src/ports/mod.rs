pub mod gateway_port;
pub mod order_service_port;
pub mod payment_repository_port;
pub mod wallet_repository_port;

pub use gateway_port::GatewayPort;
pub use order_service_port::{OrderPaymentStatus, OrderServicePort};
pub use payment_repository_port::PaymentRepositoryPort;
pub use wallet_repository_port::WalletRepositoryPort;
