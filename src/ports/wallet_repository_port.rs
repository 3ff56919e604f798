use crate::domain::errors::DomainResult;
use crate::domain::{Wallet, WalletTransaction};
use async_trait::async_trait;
use uuid::Uuid;

/// Wallet + ledger repository port.
///
/// `apply` must persist the balance update and the new transaction as one
/// atomic unit; callers serialize per customer, the store guards durability.
#[async_trait]
pub trait WalletRepositoryPort: Send + Sync {
    async fn find_by_customer(&self, customer_id: &str) -> DomainResult<Option<Wallet>>;

    /// Persist a freshly created wallet
    async fn insert(&self, wallet: &Wallet) -> DomainResult<()>;

    /// Persist a balance change together with its ledger entry
    async fn apply(&self, wallet: &Wallet, txn: &WalletTransaction) -> DomainResult<()>;

    /// Persist flag changes (lock/unlock, activate/deactivate)
    async fn update_flags(&self, wallet: &Wallet) -> DomainResult<()>;

    /// Ledger entries, most-recent-first; `limit` of None returns everything
    async fn transactions(
        &self,
        wallet_id: Uuid,
        limit: Option<usize>,
    ) -> DomainResult<Vec<WalletTransaction>>;
}
