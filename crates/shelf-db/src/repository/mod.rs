//! # Repository Module
//!
//! Database repository implementations for Shelf.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Domain service                                                        │
//! │       │                                                                 │
//! │       │  db.books().list()                                             │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── list(&self)                                                       │
//! │  ├── get_any_by_id(&self, id)                                          │
//! │  └── get_category(&self, id)                                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Writes that must be atomic (order + items) do NOT go through the      │
//! │  repositories; they use crate::transaction::OrderTransaction.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`book::BookRepository`] - Catalog reads, category lookups, seeding
//! - [`customer::CustomerRepository`] - Registration and login lookups
//! - [`order::OrderRepository`] - Order history reads

pub mod book;
pub mod customer;
pub mod order;
