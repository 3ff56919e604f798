pub mod dto;
pub mod payment_service;
pub mod wallet_service;

pub use dto::*;
pub use payment_service::PaymentService;
pub use wallet_service::WalletService;
