// ============================
// crates/backend-lib/src/handlers/account.rs
// ============================
//! Registration and login.
use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use hwcatalog_common::{LoginRequest, LoginResponse, RegisterRequest};

use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// `POST /register`. Replies 200 with an empty body.
pub async fn register<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = payload?;
    state.auth.register(request).await?;
    Ok(StatusCode::OK)
}

/// `POST /auth`
pub async fn login<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload?;
    let token = state.auth.login(request).await?;
    Ok(Json(LoginResponse { token }))
}
