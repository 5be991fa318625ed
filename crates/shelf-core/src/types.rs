//! # Domain Types
//!
//! Core domain types used throughout Shelf.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │      Order      │   │      Item       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  customer_id    │◄──│  order_id (FK)  │       │
//! │  │  title, author  │   │  customer_ref   │   │  book_id  (FK)  │──┐    │
//! │  │  price_cents    │   │  tracking_number│   │  quantity       │  │    │
//! │  │  category_id    │   │  totals         │   └─────────────────┘  │    │
//! │  └─────────────────┘   └─────────────────┘                        │    │
//! │          ▲                                                         │    │
//! │          └─────────────────────────────────────────────────────────┘    │
//! │                                                                         │
//! │  Rows (FromRow with the `sqlx` feature)  ──►  Views (JSON responses)   │
//! │  Book, Customer, Order, Item                  BookView, OrderView      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row vs View
//! Rows mirror the database columns and keep money as integer cents.
//! Views are what the HTTP layer serializes; they carry prices as decimal
//! numbers and never expose password hashes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Catalog
// =============================================================================

/// A book in the catalog.
///
/// Read-only from the order workflow's perspective. A set `deleted_at` hides
/// the book from every lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Data needed to insert a book row.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price_cents: i64,
    pub category_id: i64,
}

/// A book category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A catalog entry as returned by `GET /api/book`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub category: String,
}

impl BookView {
    /// Builds the view from a book row and its resolved category name.
    pub fn from_book(book: &Book, category: impl Into<String>) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price().to_major_units(),
            category: category.into(),
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
///
/// `email` is always stored lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub email: String,

    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert a customer row.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub email: String,
    pub password_hash: String,
    pub username: String,
}

// =============================================================================
// Order
// =============================================================================

/// An order header.
///
/// ## Lifecycle
/// ```text
/// insert (totals = 0) ──► items inserted ──► totals updated ──► commit
///        └──────────── any failure: rollback, nothing visible ───────┘
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,

    /// 8-character customer-facing code.
    pub customer_reference: String,

    pub receiver_name: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub postal_code: String,
    pub shipper: String,

    /// `<shipper>-<10 chars>` shipping code.
    pub tracking_number: String,

    pub order_date: DateTime<Utc>,
    pub total_item: i64,
    pub total_price_cents: i64,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// Data needed to insert an order header.
///
/// Totals start at zero and are written once all items are in.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub customer_reference: String,
    pub receiver_name: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub postal_code: String,
    pub shipper: String,
    pub tracking_number: String,
    pub order_date: DateTime<Utc>,
}

/// An order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub book_id: i64,
    pub quantity: i64,
    pub order_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert an order line.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub order_id: i64,
    pub book_id: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Totals
// =============================================================================

/// Running totals accumulated while an order's items are inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of quantities.
    pub total_item: i64,

    /// Sum of `price × quantity`.
    pub total_price: Money,
}

impl OrderTotals {
    /// Adds one line to the totals.
    ///
    /// Leaves the totals untouched and fails with `ValidationError::Overflow`
    /// when either sum would leave the i64 range.
    pub fn add_line(&mut self, unit_price: Money, quantity: i64) -> CoreResult<()> {
        let total_item = self
            .total_item
            .checked_add(quantity)
            .ok_or_else(|| overflow("total item"))?;
        let total_price = unit_price
            .checked_mul(quantity)
            .and_then(|line| self.total_price.checked_add(line))
            .ok_or_else(|| overflow("total price"))?;

        self.total_item = total_item;
        self.total_price = total_price;
        Ok(())
    }
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::Overflow {
        field: field.to_string(),
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One requested line of `POST /api/order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub book_id: i64,
    pub quantity: i64,
}

/// Body of `POST /api/order`.
///
/// `receiver_name` falls back to the customer's username when blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLine>,
    pub receiver_name: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub postal_code: String,
    pub shipper: String,
}

/// Body of `POST /api/customer/register`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Body of `POST /api/customer/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Result of a committed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: i64,
    pub customer_reference: String,
    pub tracking_number: String,

    /// RFC 3339 timestamp.
    pub order_date: String,
}

/// One line of an order in the history view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemView {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub quantity: i64,
    pub price: f64,
}

/// One order in the history view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub order_id: i64,
    pub customer_reference: String,
    pub receiver_name: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub postal_code: String,
    pub shipper: String,
    pub tracking_number: String,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
    pub total_item: i64,
    pub total_price: f64,
}

impl OrderView {
    /// Builds the view from an order header and its enriched lines.
    pub fn from_order(order: Order, items: Vec<OrderItemView>) -> Self {
        let total_price = order.total_price().to_major_units();
        Self {
            order_id: order.id,
            customer_reference: order.customer_reference,
            receiver_name: order.receiver_name,
            address: order.address,
            city: order.city,
            district: order.district,
            postal_code: order.postal_code,
            shipper: order.shipper,
            tracking_number: order.tracking_number,
            order_date: order.order_date,
            items,
            total_item: order.total_item,
            total_price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
