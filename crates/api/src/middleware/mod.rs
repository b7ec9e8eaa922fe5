//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first at request time)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Dev bypass (only registered when `KIOSK_DEV_AUTH` is set)
//! 5. Authentication gate (credential verification + identity resolution)

pub mod auth;
pub mod dev_bypass;
pub mod request_id;

pub use auth::{EXEMPT_PATHS, RequireAdmin, RequireAuth, auth_gate};
pub use dev_bypass::{DEV_USER_HEADER, dev_bypass};
pub use request_id::request_id_middleware;
