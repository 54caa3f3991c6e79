//! Outcome of one submit attempt.

use super::field::FieldErrorSet;

/// Result of a single submit attempt, created per attempt and discarded
/// once the form returns to idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    /// The relay accepted the submission and the email was sent.
    Success { message: String },
    /// One or more fields failed validation; nothing was sent.
    ValidationFailed(FieldErrorSet),
    /// The request failed in transit or the relay reported a failure.
    TransportFailed(String),
}

impl SubmissionResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Field errors, when validation failed.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrorSet> {
        match self {
            Self::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}
