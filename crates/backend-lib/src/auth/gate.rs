// ============================
// crates/backend-lib/src/auth/gate.rs
// ============================
//! Authorization gate applied before every protected handler.
//!
//! Order is fixed: extract the bearer token, resolve it through the identity
//! table, then check the admin flag for mutating operations. Nothing is
//! cached between requests.
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use metrics::counter;
use tracing::warn;

use crate::error::AppError;
use crate::events::AUDIT;
use crate::storage::{Account, Storage};
use crate::telemetry::{GATE_FORBIDDEN, GATE_UNAUTHENTICATED};
use crate::AppState;

/// What a protected operation needs from its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any authenticated account
    Read,
    /// Administrators only
    Mutate,
}

/// Token carried in the `Authorization` header.
///
/// Accepts the raw token or `Bearer <token>`. The remainder is only ever
/// looked up in the identity table, never trusted as an identity.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value.trim_end(),
    };
    (!token.is_empty()).then_some(token)
}

/// Privilege check for an already resolved account
pub fn check_access(account: &Account, access: Access) -> Result<(), AppError> {
    match access {
        Access::Read => Ok(()),
        Access::Mutate if account.is_admin => Ok(()),
        Access::Mutate => Err(AppError::Forbidden(format!(
            "{} is not an administrator",
            account.username
        ))),
    }
}

/// Run the full gate for one request
pub fn authorize<S: Storage>(
    state: &AppState<S>,
    headers: &HeaderMap,
    access: Access,
    operation: &str,
) -> Result<Account, AppError> {
    let Some(token) = bearer_token(headers) else {
        counter!(GATE_UNAUTHENTICATED).increment(1);
        return Err(AppError::Unauthenticated("missing bearer token".to_string()));
    };

    let Some(account) = state.auth.resolve(token) else {
        counter!(GATE_UNAUTHENTICATED).increment(1);
        return Err(AppError::Unauthenticated("unknown bearer token".to_string()));
    };

    if let Err(err) = check_access(&account, access) {
        counter!(GATE_FORBIDDEN).increment(1);
        warn!(username = %account.username, operation, "non-admin attempted a mutating operation");
        state.events.publish(
            AUDIT,
            format!("{} was refused {operation}: not an administrator", account.username),
        );
        return Err(err);
    }

    Ok(account)
}

/// Any authenticated caller
#[derive(Debug, Clone)]
pub struct Caller(pub Account);

/// An authenticated administrator
#[derive(Debug, Clone)]
pub struct Admin(pub Account);

impl<S: Storage> FromRequestParts<Arc<AppState<S>>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        authorize(state, &parts.headers, Access::Read, parts.uri.path()).map(Caller)
    }
}

impl<S: Storage> FromRequestParts<Arc<AppState<S>>> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        authorize(state, &parts.headers, Access::Mutate, parts.uri.path()).map(Admin)
    }
}
