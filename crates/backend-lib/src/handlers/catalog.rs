// ============================
// crates/backend-lib/src/handlers/catalog.rs
// ============================
//! Display and monitor records.
//!
//! The gate extractors (`Admin`, `Caller`) come before the payload, so an
//! unauthenticated request is refused before its body or query is parsed.
use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    Json,
};
use hwcatalog_common::{CreatedResponse, Display, Monitor, MonitorList, MonitorRecord, RecordId};
use metrics::counter;
use serde::Deserialize;
use tracing::info;

use crate::auth::{Admin, Caller};
use crate::error::{report_storage_error, AppError};
use crate::events::CATALOG;
use crate::storage::Storage;
use crate::telemetry::{DISPLAY_CREATED, MONITOR_CREATED};
use crate::validation::{validate_display, validate_monitor};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MonitorQuery {
    pub id: RecordId,
}

/// `POST /addDisplay`
pub async fn create_display<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Admin(admin): Admin,
    payload: Result<Json<Display>, JsonRejection>,
) -> Result<Json<CreatedResponse>, AppError> {
    let Json(display) = payload?;
    validate_display(&display)?;

    let id = state
        .storage
        .insert_display(display)
        .await
        .map_err(|err| report_storage_error(err, "insert_display", state.events.as_ref()))?;

    counter!(DISPLAY_CREATED).increment(1);
    info!(display_id = id, by = %admin.username, "display created");
    state
        .events
        .publish(CATALOG, format!("display {id} added by {}", admin.username));
    Ok(Json(CreatedResponse { id }))
}

/// `POST /addMonitor`
pub async fn create_monitor<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Admin(admin): Admin,
    payload: Result<Json<Monitor>, JsonRejection>,
) -> Result<Json<CreatedResponse>, AppError> {
    let Json(monitor) = payload?;
    validate_monitor(&monitor)?;
    let display_id = monitor.type_display_id;

    let id = state
        .storage
        .insert_monitor(monitor)
        .await
        .map_err(|err| report_storage_error(err, "insert_monitor", state.events.as_ref()))?;

    counter!(MONITOR_CREATED).increment(1);
    info!(monitor_id = id, display_id, by = %admin.username, "monitor created");
    state.events.publish(
        CATALOG,
        format!("monitor {id} (display {display_id}) added by {}", admin.username),
    );
    Ok(Json(CreatedResponse { id }))
}

/// `GET /getAll`
pub async fn list_monitors<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Caller(_caller): Caller,
) -> Result<Json<MonitorList>, AppError> {
    let monitors = state
        .storage
        .list_monitors_joined()
        .await
        .map_err(|err| report_storage_error(err, "list_monitors_joined", state.events.as_ref()))?;
    Ok(Json(MonitorList { monitors }))
}

/// `GET /getMonitor?id=N`
pub async fn get_monitor<S: Storage>(
    State(state): State<Arc<AppState<S>>>,
    Caller(_caller): Caller,
    query: Result<Query<MonitorQuery>, QueryRejection>,
) -> Result<Json<MonitorRecord>, AppError> {
    let Query(MonitorQuery { id }) = query?;

    state
        .storage
        .get_monitor_joined(id)
        .await
        .map_err(|err| report_storage_error(err, "get_monitor_joined", state.events.as_ref()))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("monitor {id} does not exist")))
}
