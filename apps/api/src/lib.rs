//! # Shelf API
//!
//! REST server for the online bookstore.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Shelf API                                     │
//! │                                                                         │
//! │  client ──► axum router ──► handlers ──► services ──► SQLite           │
//! │               │                             │                           │
//! │          require_auth                 ┌─────┴──────┐                    │
//! │          (JWT bearer)                 │ caches     │  price, category   │
//! │                                       │ Notifier   │  SMTP (optional)   │
//! │                                       └────────────┘                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is read when present):
//! - `HTTP_PORT` - listen port (default: 8080)
//! - `BIND_ADDR` - listen address (default: 0.0.0.0)
//! - `DATABASE_PATH` - SQLite file (default: ./data/shelf.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `JWT_SECRET` - HS256 signing secret
//! - `JWT_LIFETIME_SECS` - token lifetime (default: 86400)
//! - `EMAIL_NOTIFICATIONS` - send welcome/confirmation emails (default: false)
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `SMTP_FROM`

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod notification;
pub mod services;

use std::sync::Arc;

use shelf_db::Database;

use crate::auth::JwtManager;
use crate::cache::{CategoryCache, PriceCache};
use crate::notification::Notifier;
use crate::services::{BookService, CustomerService, OrderService};

// Re-exports
pub use config::ApiConfig;
pub use error::ApiError;
pub use handlers::router;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub books: BookService,
    pub customers: CustomerService,
    pub orders: OrderService,
}

impl AppState {
    /// Wires the services. Both caches start empty and live as long as the state.
    pub fn new(db: Database, jwt: Arc<JwtManager>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        let books = BookService::new(db.clone(), Arc::new(CategoryCache::new()));
        let customers = CustomerService::new(db.clone(), jwt.clone(), notifier.clone());
        let orders = OrderService::new(
            db.clone(),
            Arc::new(db.clone()),
            Arc::new(PriceCache::new()),
            notifier,
        );

        AppState {
            db,
            jwt,
            books,
            customers,
            orders,
        }
    }
}
