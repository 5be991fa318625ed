//! # Schema Migrations
//!
//! The bookstore schema ships inside the binary: every file under
//! `migrations/sqlite/` is embedded at compile time and applied in filename
//! order when [`crate::Database`] opens.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql   categories, books, customers, orders, items
//! ```
//!
//! New schema goes into a new `NNN_description.sql` file. Applied files are
//! checksummed by sqlx, so editing one breaks every existing database.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Embedded vs applied schema versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    pub embedded: usize,
    pub applied: usize,
}

impl MigrationStatus {
    /// True when every embedded migration has been applied.
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

/// Applies pending migrations. Already-applied versions are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying migrations");
    MIGRATOR.run(pool).await?;
    info!("Schema up to date");
    Ok(())
}

/// Reports how many embedded migrations the database has applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let embedded = MIGRATOR.migrations.len();

    let has_table: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if has_table == 0 {
        return Ok(MigrationStatus {
            embedded,
            applied: 0,
        });
    }

    let versions: Vec<i64> =
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success = 1")
            .fetch_all(pool)
            .await?;

    let applied = MIGRATOR
        .migrations
        .iter()
        .filter(|m| versions.contains(&m.version))
        .count();

    Ok(MigrationStatus { embedded, applied })
}
