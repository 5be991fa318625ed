//! Catalog endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use shelf_core::BookView;

use super::DataResponse;
use crate::error::ApiError;
use crate::AppState;

/// `GET /api/book`
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DataResponse<Vec<BookView>>>, ApiError> {
    let books = state.books.list_books().await?;
    Ok(DataResponse::ok(books))
}
