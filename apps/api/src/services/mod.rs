//! Domain services.
//!
//! Handlers stay thin: they parse and validate input, call one service
//! method, and wrap the result. Everything else lives here.
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │   BookService    │   │ CustomerService  │   │  OrderService    │
//! │                  │   │                  │   │                  │
//! │ • list_books     │   │ • register       │   │ • create_order   │
//! │                  │   │ • login          │   │ • order_history  │
//! └────────┬─────────┘   └────────┬─────────┘   └────────┬─────────┘
//!          │                      │                      │
//!          ▼                      ▼                      ▼
//!   category cache         argon2 + JWT          TransactionProvider
//!                          Notifier              price cache, Notifier
//! ```

pub mod book_service;
pub mod customer_service;
pub mod order_service;

use shelf_core::CoreError;
use shelf_db::DbError;
use thiserror::Error;

pub use book_service::BookService;
pub use customer_service::CustomerService;
pub use order_service::OrderService;

/// Errors surfaced by the domain services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failed while doing `context`.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: DbError,
    },

    /// Missing, malformed or expired token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Hashing, token signing and other non-storage failures.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Adapter for `map_err`: `.map_err(ServiceError::storage("loading books"))`.
    pub fn storage(context: &'static str) -> impl FnOnce(DbError) -> ServiceError {
        move |source| ServiceError::Storage { context, source }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
