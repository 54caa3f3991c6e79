//! Unified error handling with Sentry integration.
//!
//! Every failure of the relay endpoint becomes a `RelayError`, which renders
//! as `{"success": false, "error": "..."}` so the browser-side caller can
//! always read a JSON body. Server-side failures are captured to Sentry
//! before responding; their details never reach the caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portfolio_core::{Field, FieldErrorSet, RelayResponse};
use thiserror::Error;

use crate::services::ResendError;

/// Message returned when no provider credential is configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "Email service not configured";

/// Message returned when the provider call fails.
pub const SEND_FAILED_MESSAGE: &str = "Failed to send email";

/// Application-level error type for the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Request body is not valid JSON.
    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),

    /// One or more required fields are absent or empty.
    #[error("Missing required fields: {}", join_fields(.0))]
    MissingField(Vec<Field>),

    /// Email does not match the basic address pattern.
    #[error("Invalid email format")]
    InvalidEmail,

    /// Sanitized submission failed the validation schema.
    #[error("Invalid submission")]
    Validation(FieldErrorSet),

    /// No provider credential configured.
    #[error("Email service not configured")]
    ServiceUnavailable,

    /// Provider rejected the email or could not be reached.
    #[error("Email provider error: {0}")]
    Provider(#[from] ResendError),

    /// Email template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Handler panicked.
    #[error("Internal error: {0}")]
    Internal(String),

    /// No such route.
    #[error("Not found")]
    NotFound,
}

impl RelayError {
    /// HTTP status for this error.
    ///
    /// Input problems are 4xx; configuration and provider problems are 500.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_)
            | Self::MissingField(_)
            | Self::InvalidEmail
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable
            | Self::Provider(_)
            | Self::Template(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::ServiceUnavailable => {
                tracing::error!("RESEND_API_KEY not configured");
            }
            Self::Provider(_) | Self::Template(_) | Self::Internal(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Error in send-contact-email"
                );
            }
            _ => {
                tracing::info!(error = %self, "Rejected contact submission");
            }
        }

        // Don't expose provider or template details to clients
        let body = match self {
            Self::Validation(errors) => RelayResponse::invalid("Invalid submission", errors),
            Self::Provider(_) | Self::Template(_) => RelayResponse::failed(SEND_FAILED_MESSAGE),
            Self::Internal(_) => RelayResponse::failed("Internal server error"),
            other => RelayResponse::failed(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for `RelayError`.
pub type Result<T> = std::result::Result<T, RelayError>;
