//! Panic guard.
//!
//! A panic inside a handler would otherwise drop the connection, leaving the
//! browser with an opaque network error instead of the JSON failure body.

use std::panic::AssertUnwindSafe;

use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response};
use futures::FutureExt;

use crate::error::RelayError;

/// Convert a panicking handler into a 500 `RelayError::Internal` response.
pub async fn catch_panic_middleware(request: Request, next: Next) -> Response {
    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "request handler panicked".to_string());
            RelayError::Internal(detail).into_response()
        }
    }
}
