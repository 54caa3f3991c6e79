//! Contact relay handler.
//!
//! Revalidates a submission coming from the portfolio page and forwards it
//! to the owner's inbox through Resend.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use portfolio_core::{ContactRequest, Email, RelayResponse, sanitize, validate};
use tracing::instrument;

use crate::error::{RelayError, Result};
use crate::services::email::compose;
use crate::state::AppState;

/// Body message of a successful relay.
pub const SUCCESS_MESSAGE: &str = "Email enviado com sucesso!";

/// CORS preflight.
///
/// OPTIONS /send-contact-email
///
/// Always succeeds with an empty body; the CORS headers come from the
/// middleware stack.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Relay a contact submission.
///
/// POST /send-contact-email
///
/// Checks, in order: provider credential, JSON body, required fields, email
/// shape. The request is then trimmed and truncated to the field caps and
/// validated again before a single Resend call is made.
#[instrument(skip_all, fields(form = tracing::field::Empty))]
pub async fn send_contact_email(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RelayResponse>> {
    let config = &state.config().resend;
    let Some(api_key) = config.api_key.as_ref() else {
        return Err(RelayError::ServiceUnavailable);
    };

    let request: ContactRequest = serde_json::from_slice(&body).map_err(RelayError::InvalidBody)?;

    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(RelayError::MissingField(missing));
    }

    let raw = request.into_raw();
    tracing::Span::current().record("form", tracing::field::debug(raw.kind));

    if !Email::matches_basic_pattern(raw.email.trim()) {
        return Err(RelayError::InvalidEmail);
    }

    let submission = validate(&sanitize(&raw)).map_err(RelayError::Validation)?;
    let email = compose(&submission, config)?;

    let sent = state.mailer().send(api_key, &email).await?;
    tracing::info!(
        resend_id = sent.id.as_deref().unwrap_or("-"),
        "Contact email sent"
    );

    Ok(Json(RelayResponse::sent(SUCCESS_MESSAGE)))
}
