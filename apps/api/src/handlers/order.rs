//! Order endpoints. Both sit behind `require_auth`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use shelf_core::validation::validate_order_request;
use shelf_core::{CreateOrderRequest, OrderReceipt, OrderView};

use super::DataResponse;
use crate::auth::CustomerContext;
use crate::error::ApiError;
use crate::AppState;

/// `POST /api/order`
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(customer): Extension<CustomerContext>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<DataResponse<OrderReceipt>>, ApiError> {
    let Json(req) = body?;
    validate_order_request(&req)?;

    let receipt = state.orders.create_order(&customer, req).await?;
    Ok(DataResponse::ok(receipt))
}

/// `GET /api/order/order-history`
pub async fn order_history(
    State(state): State<Arc<AppState>>,
    Extension(customer): Extension<CustomerContext>,
) -> Result<Json<DataResponse<Vec<OrderView>>>, ApiError> {
    let orders = state.orders.order_history(&customer).await?;
    Ok(DataResponse::ok(orders))
}
