//! # Shelf Database Handle
//!
//! Opens the bookstore's SQLite file, applies the schema and hands out
//! repositories.
//!
//! ```text
//! DbConfig::new(DATABASE_PATH).max_connections(n)
//!        │
//!        ▼
//! Database::new ──► open pool (WAL, FKs on, busy timeout) ──► migrate
//!        │
//!        ├── books()      catalog reads, seed writes
//!        ├── customers()  registration / login
//!        ├── orders()     history reads
//!        └── begin()      order writes (see `transaction`)
//! ```
//!
//! One `POST /api/order` holds a connection for its whole transaction while
//! catalog and history reads use the others. SQLite still serializes
//! writers; the busy timeout makes a second order wait for the first one to
//! commit instead of failing with `SQLITE_BUSY`.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::book::BookRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::order::OrderRepository;

const MEMORY_PATH: &str = ":memory:";

/// How long a request waits for a pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a writer waits on SQLite's lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how many connections the API may hold.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created on first open. `:memory:` for tests.
    pub database_path: PathBuf,

    /// Pool size (`DB_MAX_CONNECTIONS`, default 5).
    pub max_connections: u32,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Private, empty database for tests.
    ///
    /// Every connection to `:memory:` would see its own database, so the
    /// pool is pinned to one connection. Code running inside an order
    /// transaction must therefore read through the transaction.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
        };

        Ok(options.foreign_keys(true).busy_timeout(BUSY_TIMEOUT))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Row counts logged at startup.
///
/// `books` skips withdrawn titles; `orders` and `items` count every stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStats {
    pub books: i64,
    pub orders: i64,
    pub items: i64,
}

/// Shared database handle. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening database"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        migrations::run_migrations(&pool).await?;

        Ok(Database { pool })
    }

    /// Raw pool, for migration status and ad-hoc queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    /// Read side of orders. Writes go through [`crate::transaction::TransactionProvider`].
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub async fn stats(&self) -> DbResult<DbStats> {
        Ok(DbStats {
            books: self.books().count().await?,
            orders: self.orders().count().await?,
            items: self.orders().count_items().await?,
        })
    }

    /// Waits for checked-out connections, then closes the pool.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// Backs `GET /health`.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::NewBook;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[test]
    fn test_config() {
        let config = DbConfig::new("./data/shelf.db").max_connections(10);
        assert_eq!(config.max_connections, 10);
        assert!(!config.is_in_memory());

        let config = DbConfig::in_memory();
        assert_eq!(config.max_connections, 1);
        assert!(config.is_in_memory());
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let path = std::env::temp_dir().join(format!("shelf-pool-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(db.health_check().await);
        db.close().await;

        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_schema_is_applied() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        for table in ["books", "categories", "customers", "items", "orders"] {
            assert!(tables.iter().any(|t| t == table), "missing table {table}");
        }
    }

    #[tokio::test]
    async fn test_stats() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(
            db.stats().await.unwrap(),
            DbStats {
                books: 0,
                orders: 0,
                items: 0
            }
        );

        let category_id = db.books().insert_category("Poetry").await.unwrap();
        db.books()
            .insert(&NewBook {
                title: "Odes".to_string(),
                author: "Keats".to_string(),
                price_cents: 1200,
                category_id,
            })
            .await
            .unwrap();

        assert_eq!(db.stats().await.unwrap().books, 1);
    }
}
