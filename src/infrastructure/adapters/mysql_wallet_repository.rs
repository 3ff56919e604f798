use crate::domain::errors::DomainResult;
use crate::domain::{Money, TransactionStatus, TransactionType, Wallet, WalletTransaction};
use crate::ports::WalletRepositoryPort;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// MySQL wallet + ledger repository.
///
/// `apply` writes the balance update and the ledger entry in one database
/// transaction so a crash between the two cannot desynchronize them.
#[derive(Clone)]
pub struct MySqlWalletRepository {
    pool: Arc<Pool<MySql>>,
}

impl MySqlWalletRepository {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletRepositoryPort for MySqlWalletRepository {
    async fn find_by_customer(&self, customer_id: &str) -> DomainResult<Option<Wallet>> {
        let query = r#"
            SELECT id, customer_id, balance, currency, active, locked, lock_reason,
                   created_at, updated_at
            FROM wallets
            WHERE customer_id = ?
        "#;

        let result = sqlx::query_as::<_, WalletRow>(query)
            .bind(customer_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(result.map(|row| row.into_wallet()))
    }

    async fn insert(&self, wallet: &Wallet) -> DomainResult<()> {
        let query = r#"
            INSERT INTO wallets (
                id, customer_id, balance, currency, active, locked, lock_reason,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(wallet.id)
            .bind(&wallet.customer_id)
            .bind(wallet.balance.amount())
            .bind(&wallet.currency)
            .bind(wallet.active)
            .bind(wallet.locked)
            .bind(&wallet.lock_reason)
            .bind(wallet.created_at)
            .bind(wallet.updated_at)
            .execute(self.pool.as_ref())
            .await?;

        debug!("Wallet created: {}", wallet.id);
        Ok(())
    }

    async fn apply(&self, wallet: &Wallet, txn: &WalletTransaction) -> DomainResult<()> {
        let mut db_txn = self.pool.begin().await?;

        sqlx::query("UPDATE wallets SET balance = ?, updated_at = ? WHERE id = ?")
            .bind(wallet.balance.amount())
            .bind(wallet.updated_at)
            .bind(wallet.id)
            .execute(&mut *db_txn)
            .await?;

        let insert = r#"
            INSERT INTO wallet_transactions (
                id, wallet_id, txn_type, amount, balance_after, description,
                reference_id, reference_type, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(insert)
            .bind(txn.id)
            .bind(txn.wallet_id)
            .bind(txn.txn_type.to_string())
            .bind(txn.amount.amount())
            .bind(txn.balance_after.amount())
            .bind(&txn.description)
            .bind(&txn.reference_id)
            .bind(&txn.reference_type)
            .bind(txn.status.to_string())
            .bind(txn.created_at)
            .execute(&mut *db_txn)
            .await?;

        db_txn.commit().await?;

        debug!("Wallet transaction applied: {} on {}", txn.id, wallet.id);
        Ok(())
    }

    async fn update_flags(&self, wallet: &Wallet) -> DomainResult<()> {
        let query = r#"
            UPDATE wallets
            SET active = ?, locked = ?, lock_reason = ?, updated_at = ?
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(wallet.active)
            .bind(wallet.locked)
            .bind(&wallet.lock_reason)
            .bind(wallet.updated_at)
            .bind(wallet.id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn transactions(
        &self,
        wallet_id: Uuid,
        limit: Option<usize>,
    ) -> DomainResult<Vec<WalletTransaction>> {
        let base = r#"
            SELECT id, wallet_id, txn_type, amount, balance_after, description,
                   reference_id, reference_type, status, created_at
            FROM wallet_transactions
            WHERE wallet_id = ?
            ORDER BY created_at DESC, id DESC
        "#;

        let rows = match limit {
            Some(n) => {
                sqlx::query_as::<_, WalletTransactionRow>(&format!("{} LIMIT ?", base))
                    .bind(wallet_id)
                    .bind(n as i64)
                    .fetch_all(self.pool.as_ref())
                    .await?
            }
            None => {
                sqlx::query_as::<_, WalletTransactionRow>(base)
                    .bind(wallet_id)
                    .fetch_all(self.pool.as_ref())
                    .await?
            }
        };

        Ok(rows.into_iter().map(|row| row.into_txn()).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WalletRow {
    id: Uuid,
    customer_id: String,
    balance: Decimal,
    currency: String,
    active: bool,
    locked: bool,
    lock_reason: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl WalletRow {
    fn into_wallet(self) -> Wallet {
        Wallet {
            id: self.id,
            customer_id: self.customer_id,
            balance: Money::new(self.balance),
            currency: self.currency,
            active: self.active,
            locked: self.locked,
            lock_reason: self.lock_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WalletTransactionRow {
    id: Uuid,
    wallet_id: Uuid,
    txn_type: String,
    amount: Decimal,
    balance_after: Decimal,
    description: String,
    reference_id: Option<String>,
    reference_type: Option<String>,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl WalletTransactionRow {
    fn into_txn(self) -> WalletTransaction {
        let txn_type = match self.txn_type.as_str() {
            "credit" => TransactionType::Credit,
            "debit" => TransactionType::Debit,
            "refund" => TransactionType::Refund,
            "cashback" => TransactionType::Cashback,
            "bonus" => TransactionType::Bonus,
            "withdrawal" => TransactionType::Withdrawal,
            _ => panic!("Invalid transaction type: {}", self.txn_type),
        };

        let status = match self.status.as_str() {
            "completed" => TransactionStatus::Completed,
            "pending" => TransactionStatus::Pending,
            "reversed" => TransactionStatus::Reversed,
            _ => panic!("Invalid transaction status: {}", self.status),
        };

        WalletTransaction {
            id: self.id,
            wallet_id: self.wallet_id,
            txn_type,
            amount: Money::new(self.amount),
            balance_after: Money::new(self.balance_after),
            description: self.description,
            reference_id: self.reference_id,
            reference_type: self.reference_type,
            status,
            created_at: self.created_at,
        }
    }
}
