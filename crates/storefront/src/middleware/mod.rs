//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry hub and transaction layers
//! 2. `TraceLayer` (request spans)
//! 3. Request ID
//! 4. Security headers
//! 5. Per-session write lock (wraps the session save)
//! 6. Session layer (in-memory store)
//! 7. Rate limiting on form posts (per route)
//!
//! Customer resolution is an extractor ([`CurrentCustomer`]) rather than a
//! layer so that pages that never show account state skip the Shopify check.

pub mod customer;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use customer::CurrentCustomer;
pub use rate_limit::{auth_rate_limiter, contact_rate_limiter};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, serialize_session_writes};
