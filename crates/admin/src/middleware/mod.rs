//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (recorded in the span, Sentry scope and response)
//! 4. Security headers (stricter than the storefront, nothing is cacheable)
//! 5. CORS (any origin)
//!
//! Authentication is an extractor, [`RequireAdminAuth`], rather than a layer.

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{AdminAuthRejection, RequireAdminAuth};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
