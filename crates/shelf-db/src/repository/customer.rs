//! # Customer Repository
//!
//! Database operations for customer accounts.
//!
//! Emails are compared case-insensitively: the column is declared
//! `UNIQUE COLLATE NOCASE`, so `Reader@Example.com` and `reader@example.com`
//! collide even if a caller forgets to normalize.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shelf_core::{Customer, NewCustomer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a customer and returns the stored row.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation { field: "customers.email", .. }` when the
    /// email is already registered.
    pub async fn insert(&self, customer: &NewCustomer) -> DbResult<Customer> {
        debug!(email = %customer.email, username = %customer.username, "Inserting customer");

        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO customers (email, password_hash, username, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&customer.email)
        .bind(&customer.password_hash)
        .bind(&customer.username)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Customer {
            id: result.last_insert_rowid(),
            email: customer.email.clone(),
            password_hash: customer.password_hash.clone(),
            username: customer.username.clone(),
            created_at,
        })
    }

    /// Gets a customer by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, email, password_hash, username, created_at
            FROM customers
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Checks whether an account exists for `email`.
    pub async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
