use crate::domain::errors::DomainResult;
use crate::domain::{Money, PaymentOrder, PaymentStatus};
use crate::ports::PaymentRepositoryPort;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, receipt, external_order_id, external_payment_id, order_id,
           customer_id, vendor_id, amount, currency, status, signature,
           refund_id, refund_amount, refund_reason, refunded_at,
           error_code, error_description, description,
           created_at, completed_at, updated_at
    FROM payment_orders
"#;

/// MySQL payment order repository
#[derive(Clone)]
pub struct MySqlPaymentRepository {
    pool: Arc<Pool<MySql>>,
}

impl MySqlPaymentRepository {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepositoryPort for MySqlPaymentRepository {
    async fn save(&self, order: &PaymentOrder) -> DomainResult<()> {
        let query = r#"
            INSERT INTO payment_orders (
                id, receipt, external_order_id, external_payment_id, order_id,
                customer_id, vendor_id, amount, currency, status, signature,
                refund_id, refund_amount, refund_reason, refunded_at,
                error_code, error_description, description,
                created_at, completed_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(order.id)
            .bind(&order.receipt)
            .bind(&order.external_order_id)
            .bind(&order.external_payment_id)
            .bind(&order.order_id)
            .bind(&order.customer_id)
            .bind(&order.vendor_id)
            .bind(order.amount.amount())
            .bind(&order.currency)
            .bind(order.status.to_string())
            .bind(&order.signature)
            .bind(&order.refund_id)
            .bind(order.refund_amount.map(|m| m.amount()))
            .bind(&order.refund_reason)
            .bind(order.refunded_at)
            .bind(&order.error_code)
            .bind(&order.error_description)
            .bind(&order.description)
            .bind(order.created_at)
            .bind(order.completed_at)
            .bind(order.updated_at)
            .execute(self.pool.as_ref())
            .await?;

        debug!("Payment order saved: {}", order.id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<PaymentOrder>> {
        let query = format!("{} WHERE id = ?", SELECT_COLUMNS);

        let result = sqlx::query_as::<_, PaymentOrderRow>(&query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(result.map(|row| row.into_order()))
    }

    async fn find_by_external_order_id(
        &self,
        external_order_id: &str,
    ) -> DomainResult<Option<PaymentOrder>> {
        let query = format!("{} WHERE external_order_id = ?", SELECT_COLUMNS);

        let result = sqlx::query_as::<_, PaymentOrderRow>(&query)
            .bind(external_order_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(result.map(|row| row.into_order()))
    }

    async fn find_by_external_payment_id(
        &self,
        external_payment_id: &str,
    ) -> DomainResult<Option<PaymentOrder>> {
        let query = format!("{} WHERE external_payment_id = ?", SELECT_COLUMNS);

        let result = sqlx::query_as::<_, PaymentOrderRow>(&query)
            .bind(external_payment_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(result.map(|row| row.into_order()))
    }

    async fn find_by_order_id(&self, order_id: &str) -> DomainResult<Option<PaymentOrder>> {
        let query = format!("{} WHERE order_id = ?", SELECT_COLUMNS);

        let result = sqlx::query_as::<_, PaymentOrderRow>(&query)
            .bind(order_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(result.map(|row| row.into_order()))
    }

    async fn list_by_customer(&self, customer_id: &str) -> DomainResult<Vec<PaymentOrder>> {
        let query = format!(
            "{} WHERE customer_id = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<_, PaymentOrderRow>(&query)
            .bind(customer_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(|row| row.into_order()).collect())
    }

    async fn list_by_vendor(&self, vendor_id: &str) -> DomainResult<Vec<PaymentOrder>> {
        let query = format!(
            "{} WHERE vendor_id = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<_, PaymentOrderRow>(&query)
            .bind(vendor_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(|row| row.into_order()).collect())
    }

    async fn update(&self, order: &PaymentOrder) -> DomainResult<()> {
        let query = r#"
            UPDATE payment_orders
            SET external_payment_id = ?, status = ?, signature = ?,
                refund_id = ?, refund_amount = ?, refund_reason = ?, refunded_at = ?,
                error_code = ?, error_description = ?,
                completed_at = ?, updated_at = ?
            WHERE id = ?
        "#;

        let rows_affected = sqlx::query(query)
            .bind(&order.external_payment_id)
            .bind(order.status.to_string())
            .bind(&order.signature)
            .bind(&order.refund_id)
            .bind(order.refund_amount.map(|m| m.amount()))
            .bind(&order.refund_reason)
            .bind(order.refunded_at)
            .bind(&order.error_code)
            .bind(&order.error_description)
            .bind(order.completed_at)
            .bind(order.updated_at)
            .bind(order.id)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            error!("No payment order found to update: {}", order.id);
            return Err(crate::domain::errors::DomainError::PaymentRecordNotFound(
                order.id.to_string(),
            ));
        }

        debug!("Payment order updated: {}", order.id);
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentOrderRow {
    id: Uuid,
    receipt: String,
    external_order_id: Option<String>,
    external_payment_id: Option<String>,
    order_id: Option<String>,
    customer_id: String,
    vendor_id: Option<String>,
    amount: Decimal,
    currency: String,
    status: String,
    signature: Option<String>,
    refund_id: Option<String>,
    refund_amount: Option<Decimal>,
    refund_reason: Option<String>,
    refunded_at: Option<chrono::DateTime<chrono::Utc>>,
    error_code: Option<String>,
    error_description: Option<String>,
    description: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl PaymentOrderRow {
    fn into_order(self) -> PaymentOrder {
        let status = match self.status.as_str() {
            "created" => PaymentStatus::Created,
            "success" => PaymentStatus::Success,
            "failed" => PaymentStatus::Failed,
            "refunded" => PaymentStatus::Refunded,
            _ => panic!("Invalid payment status: {}", self.status),
        };

        PaymentOrder {
            id: self.id,
            receipt: self.receipt,
            external_order_id: self.external_order_id,
            external_payment_id: self.external_payment_id,
            order_id: self.order_id,
            customer_id: self.customer_id,
            vendor_id: self.vendor_id,
            amount: Money::new(self.amount),
            currency: self.currency,
            status,
            signature: self.signature,
            refund_id: self.refund_id,
            refund_amount: self.refund_amount.map(Money::new),
            refund_reason: self.refund_reason,
            refunded_at: self.refunded_at,
            error_code: self.error_code,
            error_description: self.error_description,
            description: self.description,
            created_at: self.created_at,
            completed_at: self.completed_at,
            updated_at: self.updated_at,
        }
    }
}
