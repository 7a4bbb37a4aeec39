// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the hardware catalog service.

pub mod request_id;

pub use request_id::{request_id, RequestId, REQUEST_ID_HEADER};
