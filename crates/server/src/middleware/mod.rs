//! HTTP middleware stack for the directory.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)

pub mod auth;
pub mod extract;
pub mod request_id;

pub use auth::Caller;
pub use extract::{ApiJson, ApiPath};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
