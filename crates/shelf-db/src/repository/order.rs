//! # Order Repository
//!
//! Read side of orders and items.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. WRITE (crate::transaction, all-or-nothing)                         │
//! │     └── insert_order → insert_item × N → update_totals → commit        │
//! │                                                                         │
//! │  2. READ (this repository)                                             │
//! │     └── history_for_customer() → newest first, deleted hidden          │
//! │     └── items_for_order()      → insertion order                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shelf_core::{Item, Order};

const ORDER_COLUMNS: &str = r#"
    id, customer_id, customer_reference, receiver_name,
    address, city, district, postal_code, shipper, tracking_number,
    order_date, total_item, total_price_cents, updated_at, deleted_at
"#;

/// Repository for reading orders and their items.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets a non-deleted order by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1 AND deleted_at IS NULL");

        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// All non-deleted orders of a customer, newest first.
    pub async fn history_for_customer(&self, customer_id: i64) -> DbResult<Vec<Order>> {
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE customer_id = ?1 AND deleted_at IS NULL
            ORDER BY order_date DESC, id DESC
            "#
        );

        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(customer_id, count = orders.len(), "Loaded order history");
        Ok(orders)
    }

    /// Items of an order in insertion order.
    pub async fn items_for_order(&self, order_id: i64) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, book_id, quantity, order_id, created_at
            FROM items
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts all order rows (deleted or not). Feeds [`crate::Database::stats`].
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts all item rows.
    pub async fn count_items(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
