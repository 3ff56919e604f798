pub mod errors;
pub mod payment_order;
pub mod signature;
pub mod value_objects;
pub mod wallet;

pub use errors::{DomainError, DomainResult};
pub use payment_order::{PaymentOrder, SIGNATURE_MISMATCH};
pub use signature::SignatureVerifier;
pub use value_objects::{Money, PaymentStatus, TransactionStatus, TransactionType};
pub use wallet::{Wallet, WalletSummary, WalletTransaction};
