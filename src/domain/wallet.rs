use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, TransactionStatus, TransactionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-customer stored-value account.
///
/// Balance is never negative. Every mutation appends exactly one transaction
/// and updates the balance with it; the caller persists both atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,

    /// Unique per customer, one wallet each
    pub customer_id: String,

    pub balance: Money,

    /// Fixed at creation
    pub currency: String,

    /// Soft-disable: blocks debits, credits still land
    pub active: bool,

    /// Hard block on all balance-changing operations
    pub locked: bool,
    pub lock_reason: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(customer_id: String, currency: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            balance: Money::zero(),
            currency,
            active: true,
            locked: false,
            lock_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn ensure_unlocked(&self) -> DomainResult<()> {
        if self.locked {
            return Err(DomainError::WalletLocked {
                reason: self
                    .lock_reason
                    .clone()
                    .unwrap_or_else(|| "no reason recorded".to_string()),
            });
        }
        Ok(())
    }

    /// Add funds and produce the ledger entry.
    ///
    /// `txn_type` must be credit-like (credit/refund/cashback/bonus).
    pub fn credit(
        &mut self,
        amount: Money,
        txn_type: TransactionType,
        description: String,
        reference_id: Option<String>,
        reference_type: Option<String>,
    ) -> DomainResult<WalletTransaction> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount(
                "Credit amount must be greater than 0".to_string(),
            ));
        }
        if !txn_type.is_credit() {
            return Err(DomainError::ValidationError(format!(
                "Transaction type {} is not credit-like",
                txn_type
            )));
        }
        self.ensure_unlocked()?;

        self.balance = self.balance + amount;
        self.updated_at = Utc::now();

        Ok(WalletTransaction::new(
            self.id,
            txn_type,
            amount,
            self.balance,
            description,
            reference_id,
            reference_type,
        ))
    }

    /// Remove funds and produce the ledger entry. No partial debits.
    ///
    /// `txn_type` must be debit-like (debit/withdrawal).
    pub fn debit(
        &mut self,
        amount: Money,
        txn_type: TransactionType,
        description: String,
        reference_id: Option<String>,
        reference_type: Option<String>,
    ) -> DomainResult<WalletTransaction> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount(
                "Debit amount must be greater than 0".to_string(),
            ));
        }
        if txn_type.is_credit() {
            return Err(DomainError::ValidationError(format!(
                "Transaction type {} is not debit-like",
                txn_type
            )));
        }
        self.ensure_unlocked()?;
        if !self.active {
            return Err(DomainError::WalletInactive(self.customer_id.clone()));
        }
        if self.balance < amount {
            return Err(DomainError::InsufficientBalance {
                available: self.balance.amount(),
                requested: amount.amount(),
            });
        }

        self.balance = self.balance - amount;
        self.updated_at = Utc::now();

        Ok(WalletTransaction::new(
            self.id,
            txn_type,
            amount,
            self.balance,
            description,
            reference_id,
            reference_type,
        ))
    }

    pub fn lock(&mut self, reason: String) {
        self.locked = true;
        self.lock_reason = Some(reason);
        self.updated_at = Utc::now();
    }

    pub fn unlock(&mut self) {
        self.locked = false;
        self.lock_reason = None;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    pub fn reactivate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }
}

/// Immutable ledger entry; history is kept most-recent-first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub txn_type: TransactionType,

    /// Always positive; direction comes from `txn_type`
    pub amount: Money,

    /// Wallet balance immediately after this transaction
    pub balance_after: Money,

    pub description: String,

    /// Link to an order, voucher, withdrawal request, etc.
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,

    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn new(
        wallet_id: Uuid,
        txn_type: TransactionType,
        amount: Money,
        balance_after: Money,
        description: String,
        reference_id: Option<String>,
        reference_type: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            txn_type,
            amount,
            balance_after,
            description,
            reference_id,
            reference_type,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
        }
    }
}

/// Dashboard aggregate over a wallet's full history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSummary {
    pub customer_id: String,
    pub balance: Money,
    pub total_credits: Money,
    pub total_debits: Money,
    pub total_refunds: Money,
    pub total_cashback: Money,
    pub transaction_count: usize,
    pub locked: bool,
    pub active: bool,
}

impl WalletSummary {
    pub fn from_history(wallet: &Wallet, history: &[WalletTransaction]) -> Self {
        let mut total_credits = Money::zero();
        let mut total_debits = Money::zero();
        let mut total_refunds = Money::zero();
        let mut total_cashback = Money::zero();

        for txn in history {
            if txn.txn_type.is_credit() {
                total_credits = total_credits + txn.amount;
            } else {
                total_debits = total_debits + txn.amount;
            }
            match txn.txn_type {
                TransactionType::Refund => total_refunds = total_refunds + txn.amount,
                TransactionType::Cashback => total_cashback = total_cashback + txn.amount,
                _ => {}
            }
        }

        Self {
            customer_id: wallet.customer_id.clone(),
            balance: wallet.balance,
            total_credits,
            total_debits,
            total_refunds,
            total_cashback,
            transaction_count: history.len(),
            locked: wallet.locked,
            active: wallet.active,
        }
    }
}
