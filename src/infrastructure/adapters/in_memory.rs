use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::{PaymentOrder, Wallet, WalletTransaction};
use crate::ports::{PaymentRepositoryPort, WalletRepositoryPort};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory payment order store for tests and local runs
#[derive(Default, Clone)]
pub struct InMemoryPaymentRepository {
    orders: Arc<RwLock<HashMap<Uuid, PaymentOrder>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepositoryPort for InMemoryPaymentRepository {
    async fn save(&self, order: &PaymentOrder) -> DomainResult<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<PaymentOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn find_by_external_order_id(
        &self,
        external_order_id: &str,
    ) -> DomainResult<Option<PaymentOrder>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .find(|o| o.external_order_id.as_deref() == Some(external_order_id))
            .cloned())
    }

    async fn find_by_external_payment_id(
        &self,
        external_payment_id: &str,
    ) -> DomainResult<Option<PaymentOrder>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .find(|o| o.external_payment_id.as_deref() == Some(external_payment_id))
            .cloned())
    }

    async fn find_by_order_id(&self, order_id: &str) -> DomainResult<Option<PaymentOrder>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .find(|o| o.order_id.as_deref() == Some(order_id))
            .cloned())
    }

    async fn list_by_customer(&self, customer_id: &str) -> DomainResult<Vec<PaymentOrder>> {
        let orders = self.orders.read().await;
        let mut result: Vec<_> = orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list_by_vendor(&self, vendor_id: &str) -> DomainResult<Vec<PaymentOrder>> {
        let orders = self.orders.read().await;
        let mut result: Vec<_> = orders
            .values()
            .filter(|o| o.vendor_id.as_deref() == Some(vendor_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update(&self, order: &PaymentOrder) -> DomainResult<()> {
        let mut orders = self.orders.write().await;
        if !orders.contains_key(&order.id) {
            return Err(DomainError::PaymentRecordNotFound(order.id.to_string()));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }
}

/// In-memory wallet + ledger store.
///
/// Ledger entries are appended in arrival order and served newest-first,
/// matching the visible ordering contract of the SQL store.
#[derive(Default, Clone)]
pub struct InMemoryWalletRepository {
    wallets: Arc<RwLock<HashMap<String, Wallet>>>,
    ledgers: Arc<RwLock<HashMap<Uuid, Vec<WalletTransaction>>>>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletRepositoryPort for InMemoryWalletRepository {
    async fn find_by_customer(&self, customer_id: &str) -> DomainResult<Option<Wallet>> {
        let wallets = self.wallets.read().await;
        Ok(wallets.get(customer_id).cloned())
    }

    async fn insert(&self, wallet: &Wallet) -> DomainResult<()> {
        let mut wallets = self.wallets.write().await;
        wallets.insert(wallet.customer_id.clone(), wallet.clone());
        Ok(())
    }

    async fn apply(&self, wallet: &Wallet, txn: &WalletTransaction) -> DomainResult<()> {
        let mut wallets = self.wallets.write().await;
        let mut ledgers = self.ledgers.write().await;
        wallets.insert(wallet.customer_id.clone(), wallet.clone());
        ledgers.entry(wallet.id).or_default().push(txn.clone());
        Ok(())
    }

    async fn update_flags(&self, wallet: &Wallet) -> DomainResult<()> {
        let mut wallets = self.wallets.write().await;
        wallets.insert(wallet.customer_id.clone(), wallet.clone());
        Ok(())
    }

    async fn transactions(
        &self,
        wallet_id: Uuid,
        limit: Option<usize>,
    ) -> DomainResult<Vec<WalletTransaction>> {
        let ledgers = self.ledgers.read().await;
        let entries = ledgers.get(&wallet_id).cloned().unwrap_or_default();
        let mut newest_first: Vec<_> = entries.into_iter().rev().collect();
        if let Some(n) = limit {
            newest_first.truncate(n);
        }
        Ok(newest_first)
    }
}
