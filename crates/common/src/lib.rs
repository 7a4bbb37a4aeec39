// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between catalog clients and the server.
//! Field names are part of the HTTP contract and must not change.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier for accounts, displays and monitors
pub type RecordId = i64;

/// A display panel as submitted by a client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Display {
    /// Diagonal size in inches
    #[serde(rename = "diag")]
    pub diagonal: f64,
    /// Free-text resolution, e.g. "2560x1440"
    #[serde(alias = "res")]
    pub resolution: String,
    /// Panel type, e.g. "IPS"
    #[serde(alias = "matrix")]
    pub type_matrix: String,
    /// Adaptive-sync support
    pub gsync: bool,
}

/// A stored display together with its identifier
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub display: Display,
}

/// A monitor as submitted by a client.
///
/// Older clients also send an embedded `display` object. It is ignored and the
/// display is always taken from `type_display_id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Monitor {
    /// Supply voltage
    pub voltage: f64,
    /// Premium adaptive-sync support
    pub gsync_prem: bool,
    pub curved: bool,
    /// Identifier of an existing display
    #[serde(alias = "display_id")]
    pub type_display_id: RecordId,
}

/// A stored monitor joined with the display it references
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonitorRecord {
    pub id: RecordId,
    pub voltage: f64,
    pub display: DisplayRecord,
    pub gsync_prem: bool,
    pub curved: bool,
    pub type_display_id: RecordId,
}

/// Body of `POST /register`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Body of `POST /auth`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login reply
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// Opaque bearer token for the `Authorization` header
    pub token: String,
}

/// Reply to a successful create operation
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedResponse {
    pub id: RecordId,
}

/// Reply to `GET /getAll`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonitorList {
    pub monitors: Vec<MonitorRecord>,
}
