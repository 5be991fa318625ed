//! Registration and login endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use shelf_core::validation::validate_registration;
use shelf_core::{CoreError, LoginRequest, RegisterRequest};
use tracing::debug;

use super::TokenResponse;
use crate::error::ApiError;
use crate::AppState;

/// `POST /api/customer/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(req) = body?;

    if let Err(e) = validate_registration(&req) {
        debug!(error = %e, "Registration rejected");
        return Err(CoreError::from(e).into());
    }

    let token = state.customers.register(req).await?;
    Ok(TokenResponse::ok(token))
}

/// `POST /api/customer/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(req) = body?;

    let token = state.customers.login(req).await?;
    Ok(TokenResponse::ok(token))
}
