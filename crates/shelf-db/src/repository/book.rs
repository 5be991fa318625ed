//! # Book Repository
//!
//! Database operations for the catalog: books and their categories.
//!
//! ## Soft Delete
//! ```text
//! books.deleted_at IS NULL      → visible to list / count / price lookups
//! books.deleted_at IS NOT NULL  → hidden, but still resolvable from order
//!                                 history through get_any_by_id
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shelf_core::{Book, Category, NewBook};

const BOOK_COLUMNS: &str = "id, title, author, price_cents, category_id, created_at, deleted_at";

/// Repository for book and category operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookRepository::new(pool);
///
/// let books = repo.list().await?;
/// let book = repo.get_any_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Lists every visible book, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE deleted_at IS NULL ORDER BY id"
        );

        let books = sqlx::query_as::<_, Book>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = books.len(), "Listed books");
        Ok(books)
    }

    /// Gets a book by ID even if it has been soft-deleted.
    ///
    /// Order history must keep rendering lines whose book was later
    /// withdrawn from the catalog.
    pub async fn get_any_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1");

        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Inserts a book and returns its ID.
    pub async fn insert(&self, book: &NewBook) -> DbResult<i64> {
        debug!(title = %book.title, category_id = book.category_id, "Inserting book");

        let result = sqlx::query(
            r#"
            INSERT INTO books (title, author, price_cents, category_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price_cents)
        .bind(book.category_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Hides a book from the catalog.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE books SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }

        Ok(())
    }

    /// Counts visible books.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Gets a category by ID.
    pub async fn get_category(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Inserts a category and returns its ID.
    pub async fn insert_category(&self, name: &str) -> DbResult<i64> {
        debug!(name = %name, "Inserting category");

        let result = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category_id = db.books().insert_category("Fiction").await.unwrap();
        (db, category_id)
    }

    fn new_book(title: &str, price_cents: i64, category_id: i64) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            price_cents,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (db, category_id) = setup().await;
        let repo = db.books();

        let id = repo.insert(&new_book("Dune", 1000, category_id)).await.unwrap();
        let book = repo.get_any_by_id(id).await.unwrap().unwrap();

        assert_eq!(book.title, "Dune");
        assert_eq!(book.price().cents(), 1000);
        assert!(book.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_soft_deleted_book_is_hidden() {
        let (db, category_id) = setup().await;
        let repo = db.books();

        let kept = repo.insert(&new_book("Kept", 500, category_id)).await.unwrap();
        let gone = repo.insert(&new_book("Gone", 700, category_id)).await.unwrap();
        repo.soft_delete(gone).await.unwrap();

        let books = repo.list().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, kept);

        assert!(repo.get_any_by_id(gone).await.unwrap().is_some());
        assert_eq!(repo.count().await.unwrap(), 1);

        // Second delete finds nothing left to hide
        assert!(matches!(
            repo.soft_delete(gone).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_category_lookup() {
        let (db, category_id) = setup().await;

        let category = db.books().get_category(category_id).await.unwrap().unwrap();
        assert_eq!(category.name, "Fiction");
        assert!(db.books().get_category(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let (db, _) = setup().await;

        let err = db.books().insert(&new_book("Orphan", 100, 999)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_category_rejected() {
        let (db, _) = setup().await;

        let err = db.books().insert_category("Fiction").await.unwrap_err();
        assert!(err.is_unique_violation_on("categories.name"));
    }
}
