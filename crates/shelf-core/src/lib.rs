//! # shelf-core: Pure Business Logic for the Shelf bookstore
//!
//! This crate holds the domain model and every rule that can be expressed
//! without touching a database or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Shelf Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    Auth middleware ──► Handlers ──► Services                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shelf-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ reference │  │ validation│  │   │
//! │  │   │   Book    │  │   Money   │  │ cust. ref │  │  order    │  │   │
//! │  │   │   Order   │  │  totals   │  │ tracking  │  │  customer │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shelf-db (Database Layer)                    │   │
//! │  │       SQLite queries, migrations, order transactions            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, Customer, Order, Item, views)
//! - [`money`] - Money type with integer arithmetic
//! - [`reference`] - Customer reference and tracking number generation
//! - [`error`] - Domain error types
//! - [`validation`] - Request validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use shelf_core::money::Money;
//! use shelf_core::types::OrderTotals;
//!
//! let mut totals = OrderTotals::default();
//! totals.add_line(Money::from_cents(1000), 5).unwrap();
//!
//! assert_eq!(totals.total_item, 5);
//! assert_eq!(totals.total_price.cents(), 5000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod reference;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;
