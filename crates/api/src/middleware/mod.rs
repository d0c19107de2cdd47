//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. CORS (when origins are configured)
//! 3. Timeout
//! 4. `TraceLayer` (request span)
//! 5. Request ID (recorded into the span)
//! 6. Security headers
//! 7. Rate limiting (per route group)
//!
//! Authentication is not a layer: handlers opt in with the [`RequireAuth`] and
//! [`RequireAdmin`] extractors.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use auth::{RequireAdmin, RequireAuth};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
