// ==============
// crates/backend-lib/src/telemetry.rs

//! Central place for metric keys
pub const AUTH_REGISTER: &str = "auth.register";
pub const AUTH_LOGIN_SUCCESS: &str = "auth.login.success";
pub const AUTH_LOGIN_FAILURE: &str = "auth.login.failure";
pub const GATE_UNAUTHENTICATED: &str = "gate.unauthenticated";
pub const GATE_FORBIDDEN: &str = "gate.forbidden";
pub const DISPLAY_CREATED: &str = "catalog.display.created";
pub const MONITOR_CREATED: &str = "catalog.monitor.created";
pub const STORAGE_FAULT: &str = "storage.fault";
pub const IDENTITY_ACTIVE: &str = "identity.active";
