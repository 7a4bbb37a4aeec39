// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers.
use axum::Json;
use serde_json::{json, Value};

pub mod account;
pub mod catalog;

pub use account::{login, register};
pub use catalog::{create_display, create_monitor, get_monitor, list_monitors};

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
