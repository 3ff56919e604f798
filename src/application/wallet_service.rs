use crate::domain::errors::DomainResult;
use crate::domain::{Money, TransactionType, Wallet, WalletSummary, WalletTransaction};
use crate::ports::WalletRepositoryPort;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Wallet ledger service.
///
/// All balance-changing operations serialize per customer through a mutex
/// arena: the guard is held across the whole read-validate-write sequence,
/// so two concurrent debits can never both pass the balance check against a
/// stale balance.
pub struct WalletService<R: WalletRepositoryPort> {
    repository: Arc<R>,
    locks: DashMap<String, Arc<Mutex<()>>>,
    default_currency: String,
}

impl<R: WalletRepositoryPort> WalletService<R> {
    pub fn new(repository: Arc<R>, default_currency: String) -> Self {
        Self {
            repository,
            locks: DashMap::new(),
            default_currency,
        }
    }

    fn customer_lock(&self, customer_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(customer_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_or_create(&self, customer_id: &str) -> DomainResult<Wallet> {
        if let Some(wallet) = self.repository.find_by_customer(customer_id).await? {
            return Ok(wallet);
        }
        let wallet = Wallet::new(customer_id.to_string(), self.default_currency.clone());
        self.repository.insert(&wallet).await?;
        info!("Wallet created for customer: {}", customer_id);
        Ok(wallet)
    }

    /// Return the customer's wallet, creating an empty one on first access
    pub async fn get_or_create(&self, customer_id: &str) -> DomainResult<Wallet> {
        let lock = self.customer_lock(customer_id);
        let _guard = lock.lock().await;
        self.load_or_create(customer_id).await
    }

    pub async fn get_balance(&self, customer_id: &str) -> DomainResult<Money> {
        Ok(self.get_or_create(customer_id).await?.balance)
    }

    /// Add funds; refund/cashback/bonus flows share this primitive and are
    /// distinguished only by transaction type and reference fields
    pub async fn credit(
        &self,
        customer_id: &str,
        amount: Money,
        txn_type: TransactionType,
        description: String,
        reference_id: Option<String>,
        reference_type: Option<String>,
    ) -> DomainResult<WalletTransaction> {
        let lock = self.customer_lock(customer_id);
        let _guard = lock.lock().await;

        let mut wallet = self.load_or_create(customer_id).await?;
        let txn = wallet.credit(amount, txn_type, description, reference_id, reference_type)?;
        self.repository.apply(&wallet, &txn).await?;

        debug!(
            "Wallet credited: customer={} amount={} balance={}",
            customer_id, amount, wallet.balance
        );
        Ok(txn)
    }

    /// Remove funds; fails without effect on insufficient balance
    pub async fn debit(
        &self,
        customer_id: &str,
        amount: Money,
        txn_type: TransactionType,
        description: String,
        reference_id: Option<String>,
        reference_type: Option<String>,
    ) -> DomainResult<WalletTransaction> {
        let lock = self.customer_lock(customer_id);
        let _guard = lock.lock().await;

        let mut wallet = self.load_or_create(customer_id).await?;
        let txn = wallet.debit(amount, txn_type, description, reference_id, reference_type)?;
        self.repository.apply(&wallet, &txn).await?;

        debug!(
            "Wallet debited: customer={} amount={} balance={}",
            customer_id, amount, wallet.balance
        );
        Ok(txn)
    }

    /// Checkout via the wallet rail
    pub async fn pay_with_wallet(
        &self,
        customer_id: &str,
        amount: Money,
        order_id: &str,
    ) -> DomainResult<Wallet> {
        self.debit(
            customer_id,
            amount,
            TransactionType::Debit,
            format!("Payment for order {}", order_id),
            Some(order_id.to_string()),
            Some("order".to_string()),
        )
        .await?;
        self.get_or_create(customer_id).await
    }

    /// Withdraw to an external destination; method defaults to bank transfer
    pub async fn withdraw(
        &self,
        customer_id: &str,
        amount: Money,
        method: Option<String>,
    ) -> DomainResult<Wallet> {
        let method = method.unwrap_or_else(|| "bank_transfer".to_string());
        self.debit(
            customer_id,
            amount,
            TransactionType::Withdrawal,
            format!("Withdrawal via {}", method),
            None,
            Some("withdrawal".to_string()),
        )
        .await?;
        self.get_or_create(customer_id).await
    }

    /// Credit a voucher/bonus
    pub async fn apply_bonus(
        &self,
        customer_id: &str,
        amount: Money,
        voucher_code: &str,
        description: Option<String>,
    ) -> DomainResult<Wallet> {
        self.credit(
            customer_id,
            amount,
            TransactionType::Bonus,
            description.unwrap_or_else(|| format!("Bonus voucher {}", voucher_code)),
            Some(voucher_code.to_string()),
            Some("bonus".to_string()),
        )
        .await?;
        self.get_or_create(customer_id).await
    }

    /// Read-only balance check, no side effect beyond lazy wallet creation
    pub async fn has_sufficient_balance(
        &self,
        customer_id: &str,
        amount: Money,
    ) -> DomainResult<bool> {
        Ok(self.get_balance(customer_id).await? >= amount)
    }

    /// Full ledger, most-recent-first
    pub async fn transaction_history(
        &self,
        customer_id: &str,
    ) -> DomainResult<Vec<WalletTransaction>> {
        let wallet = self.get_or_create(customer_id).await?;
        self.repository.transactions(wallet.id, None).await
    }

    /// First `limit` entries of the ledger
    pub async fn recent_transactions(
        &self,
        customer_id: &str,
        limit: usize,
    ) -> DomainResult<Vec<WalletTransaction>> {
        let wallet = self.get_or_create(customer_id).await?;
        self.repository.transactions(wallet.id, Some(limit)).await
    }

    /// Dashboard aggregate over the full history
    pub async fn summary(&self, customer_id: &str) -> DomainResult<WalletSummary> {
        let wallet = self.get_or_create(customer_id).await?;
        let history = self.repository.transactions(wallet.id, None).await?;
        Ok(WalletSummary::from_history(&wallet, &history))
    }

    /// Hard-block all balance changes
    pub async fn lock(&self, customer_id: &str, reason: String) -> DomainResult<Wallet> {
        let lock = self.customer_lock(customer_id);
        let _guard = lock.lock().await;

        let mut wallet = self.load_or_create(customer_id).await?;
        wallet.lock(reason.clone());
        self.repository.update_flags(&wallet).await?;
        info!("Wallet locked: customer={} reason={}", customer_id, reason);
        Ok(wallet)
    }

    pub async fn unlock(&self, customer_id: &str) -> DomainResult<Wallet> {
        let lock = self.customer_lock(customer_id);
        let _guard = lock.lock().await;

        let mut wallet = self.load_or_create(customer_id).await?;
        wallet.unlock();
        self.repository.update_flags(&wallet).await?;
        info!("Wallet unlocked: customer={}", customer_id);
        Ok(wallet)
    }

    /// Soft-disable: debits refused, credits still land
    pub async fn deactivate(&self, customer_id: &str) -> DomainResult<Wallet> {
        let lock = self.customer_lock(customer_id);
        let _guard = lock.lock().await;

        let mut wallet = self.load_or_create(customer_id).await?;
        wallet.deactivate();
        self.repository.update_flags(&wallet).await?;
        info!("Wallet deactivated: customer={}", customer_id);
        Ok(wallet)
    }

    pub async fn reactivate(&self, customer_id: &str) -> DomainResult<Wallet> {
        let lock = self.customer_lock(customer_id);
        let _guard = lock.lock().await;

        let mut wallet = self.load_or_create(customer_id).await?;
        wallet.reactivate();
        self.repository.update_flags(&wallet).await?;
        info!("Wallet reactivated: customer={}", customer_id);
        Ok(wallet)
    }
}
