//! HTTP route handlers for the relay.
//!
//! # Route Structure
//!
//! ```text
//! GET     /health               - Liveness check
//! POST    /send-contact-email   - Relay a contact submission to Resend
//! OPTIONS /send-contact-email   - CORS preflight
//! ```
//!
//! Any other method on `/send-contact-email` is handled like `POST`.

pub mod contact;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Path of the relay endpoint.
pub const CONTACT_PATH: &str = "/send-contact-email";

/// Create all routes for the relay.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            CONTACT_PATH,
            post(contact::send_contact_email)
                .options(contact::preflight)
                .fallback(contact::send_contact_email),
        )
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
