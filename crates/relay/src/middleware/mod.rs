//! HTTP middleware stack for the relay.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS headers (every response, errors included)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded on the request span)
//! 5. Panic guard (turn handler panics into a JSON 500)

pub mod cors;
pub mod panic;
pub mod request_id;

pub use cors::cors_middleware;
pub use panic::catch_panic_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
