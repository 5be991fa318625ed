//! Catalog listing.

use std::sync::Arc;

use tracing::debug;

use super::{ServiceError, ServiceResult};
use crate::cache::CategoryCache;
use shelf_core::BookView;
use shelf_db::{Database, DbError};

/// Lists books with their category names.
#[derive(Clone)]
pub struct BookService {
    db: Database,
    categories: Arc<CategoryCache>,
}

impl BookService {
    pub fn new(db: Database, categories: Arc<CategoryCache>) -> Self {
        BookService { db, categories }
    }

    /// Every visible book, with the category resolved through the cache.
    pub async fn list_books(&self) -> ServiceResult<Vec<BookView>> {
        let books = self
            .db
            .books()
            .list()
            .await
            .map_err(ServiceError::storage("listing books"))?;

        let mut views = Vec::with_capacity(books.len());
        for book in &books {
            let category = self.category_name(book.category_id).await?;
            views.push(BookView::from_book(book, category));
        }

        Ok(views)
    }

    async fn category_name(&self, category_id: i64) -> ServiceResult<String> {
        if let Some(name) = self.categories.get(&category_id).await {
            return Ok(name);
        }

        debug!(category_id, "Category cache miss");
        let category = self
            .db
            .books()
            .get_category(category_id)
            .await
            .map_err(ServiceError::storage("loading category"))?
            .ok_or_else(|| ServiceError::Storage {
                context: "loading category",
                source: DbError::not_found("Category", category_id),
            })?;

        self.categories.insert(category_id, category.name.clone()).await;
        Ok(category.name)
    }
}
