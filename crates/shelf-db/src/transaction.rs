//! # Order Transactions
//!
//! The unit of work behind `POST /api/order`.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   One Order = One Transaction                           │
//! │                                                                         │
//! │  provider.begin()                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert_order(header)          totals = 0                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line:                                                        │
//! │       book_price(book_id)      read inside the same transaction        │
//! │       insert_item(line)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  update_totals(order_id)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  commit()  ─── any error before this point ──► rollback()              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dropping an unfinished [`SqliteOrderTransaction`] rolls it back, so an
//! early `?` return can never leave a half-written order behind.
//!
//! ## Why a Trait?
//! The order service only sees `dyn OrderTransaction`. Tests wrap the real
//! SQLite transaction and inject a failure at any step to prove nothing
//! leaks out of a rolled-back order.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use shelf_core::{Money, NewItem, NewOrder, OrderTotals};

// =============================================================================
// Traits
// =============================================================================

/// Operations available inside an open order transaction.
///
/// After `commit` or `rollback` every further call fails with
/// `DbError::TransactionFailed`.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Inserts the order header and returns its ID.
    async fn insert_order(&mut self, order: &NewOrder) -> DbResult<i64>;

    /// Price of a visible book, `None` if unknown or soft-deleted.
    async fn book_price(&mut self, book_id: i64) -> DbResult<Option<Money>>;

    /// Inserts one order line and returns its ID.
    async fn insert_item(&mut self, item: &NewItem) -> DbResult<i64>;

    /// Writes the final totals onto the order header.
    async fn update_totals(&mut self, order_id: i64, totals: &OrderTotals) -> DbResult<()>;

    /// Makes every write visible.
    async fn commit(&mut self) -> DbResult<()>;

    /// Discards every write.
    async fn rollback(&mut self) -> DbResult<()>;
}

/// Something that can open order transactions.
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    async fn begin(&self) -> DbResult<Box<dyn OrderTransaction>>;
}

// =============================================================================
// SQLite Implementation
// =============================================================================

/// [`OrderTransaction`] over a `sqlx` SQLite transaction.
pub struct SqliteOrderTransaction {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteOrderTransaction {
    /// Wraps an already-begun transaction.
    pub fn new(tx: Transaction<'static, Sqlite>) -> Self {
        SqliteOrderTransaction { tx: Some(tx) }
    }

    fn open(&mut self) -> DbResult<&mut Transaction<'static, Sqlite>> {
        self.tx
            .as_mut()
            .ok_or_else(|| DbError::TransactionFailed("transaction already finished".to_string()))
    }

    fn take(&mut self) -> DbResult<Transaction<'static, Sqlite>> {
        self.tx
            .take()
            .ok_or_else(|| DbError::TransactionFailed("transaction already finished".to_string()))
    }
}

#[async_trait]
impl OrderTransaction for SqliteOrderTransaction {
    async fn insert_order(&mut self, order: &NewOrder) -> DbResult<i64> {
        debug!(
            customer_id = order.customer_id,
            customer_reference = %order.customer_reference,
            "Inserting order header"
        );

        let tx = self.open()?;
        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                customer_id, customer_reference, receiver_name,
                address, city, district, postal_code,
                shipper, tracking_number, order_date,
                total_item, total_price_cents, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6, ?7,
                ?8, ?9, ?10,
                0, 0, ?10
            )
            "#,
        )
        .bind(order.customer_id)
        .bind(&order.customer_reference)
        .bind(&order.receiver_name)
        .bind(&order.address)
        .bind(&order.city)
        .bind(&order.district)
        .bind(&order.postal_code)
        .bind(&order.shipper)
        .bind(&order.tracking_number)
        .bind(order.order_date)
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn book_price(&mut self, book_id: i64) -> DbResult<Option<Money>> {
        let tx = self.open()?;
        let cents: Option<i64> = sqlx::query_scalar(
            "SELECT price_cents FROM books WHERE id = ?1 AND deleted_at IS NULL",
        )
        .bind(book_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(cents.map(Money::from_cents))
    }

    async fn insert_item(&mut self, item: &NewItem) -> DbResult<i64> {
        debug!(
            order_id = item.order_id,
            book_id = item.book_id,
            quantity = item.quantity,
            "Inserting order item"
        );

        let tx = self.open()?;
        let result = sqlx::query(
            r#"
            INSERT INTO items (book_id, quantity, order_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(item.book_id)
        .bind(item.quantity)
        .bind(item.order_id)
        .bind(item.created_at)
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_totals(&mut self, order_id: i64, totals: &OrderTotals) -> DbResult<()> {
        let tx = self.open()?;
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                total_item = ?2,
                total_price_cents = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(totals.total_item)
        .bind(totals.total_price.cents())
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }

    async fn commit(&mut self) -> DbResult<()> {
        self.take()?
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }

    async fn rollback(&mut self) -> DbResult<()> {
        self.take()?
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

impl Drop for SqliteOrderTransaction {
    fn drop(&mut self) {
        if self.tx.is_some() {
            // sqlx issues the ROLLBACK when the connection returns to the pool
            warn!("Order transaction dropped without commit; rolling back");
        }
    }
}

#[async_trait]
impl TransactionProvider for Database {
    async fn begin(&self) -> DbResult<Box<dyn OrderTransaction>> {
        let tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(Box::new(SqliteOrderTransaction::new(tx)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
