//! # shelf-db: Database Layer for Shelf
//!
//! This crate provides database access for the Shelf bookstore.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Shelf Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler ──► domain service (apps/api)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     shelf-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌────────────────┐  ┌──────────────────┐ │   │
//! │  │   │   Database    │  │  Repositories  │  │  Transactions    │ │   │
//! │  │   │   (pool.rs)   │  │  books         │  │  OrderTransaction│ │   │
//! │  │   │               │◄─│  customers     │  │  (begin/commit/  │ │   │
//! │  │   │  SqlitePool   │  │  orders        │  │   rollback)      │ │   │
//! │  │   └───────────────┘  └────────────────┘  └──────────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (./data/shelf.db)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Read/write repositories (book, customer, order)
//! - [`transaction`] - The order-creation unit of work
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelf_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./data/shelf.db")).await?;
//!
//! let books = db.books().list().await?;
//! let history = db.orders().history_for_customer(customer_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod transaction;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig, DbStats};

// Repository re-exports for convenience
pub use repository::book::BookRepository;
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
pub use transaction::{OrderTransaction, SqliteOrderTransaction, TransactionProvider};
