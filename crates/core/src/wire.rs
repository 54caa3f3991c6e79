//! JSON bodies exchanged with the relay endpoint.
//!
//! ```text
//! POST /send-contact-email
//! { "name": "...", "email": "...", "message": "...", "company"?: "...", "github"?: "..." }
//!
//! 200 { "success": true,  "message": "..." }
//! 4xx/500 { "success": false, "error": "...", "fieldErrors"?: { "name": "..." } }
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{ContactSubmission, ContextField, Field, FieldErrorSet, FormKind, RawSubmission};

/// Request body of the relay endpoint.
///
/// Every field is optional at the JSON level so that a missing field is
/// reported as such by the relay instead of as a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

impl ContactRequest {
    /// Required fields that are absent or empty, in field order.
    ///
    /// Whitespace-only values are not missing; the schema reports them.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<Field> {
        [
            (Field::Name, &self.name),
            (Field::Email, &self.email),
            (Field::Message, &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(field, _)| field)
        .collect()
    }

    /// Convert into raw form input.
    ///
    /// A request carrying a company is treated as the client form, anything
    /// else as the developer form.
    #[must_use]
    pub fn into_raw(self) -> RawSubmission {
        let kind = if self.company.is_some() {
            FormKind::Client
        } else {
            FormKind::Dev
        };
        RawSubmission {
            kind,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            company: self.company,
            github: self.github,
        }
    }
}

impl From<&ContactSubmission> for ContactRequest {
    fn from(submission: &ContactSubmission) -> Self {
        let (company, github) = match submission.context() {
            Some(ContextField::Company(v)) => (Some(v.clone()), None),
            Some(ContextField::Github(v)) => (None, Some(v.clone())),
            None => (None, None),
        };
        Self {
            name: Some(submission.name().to_owned()),
            email: Some(submission.email().as_str().to_owned()),
            message: Some(submission.message().to_owned()),
            company,
            github,
        }
    }
}

/// Response body of the relay endpoint, for success and failure alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(
        default,
        rename = "fieldErrors",
        skip_serializing_if = "Option::is_none"
    )]
    pub field_errors: Option<FieldErrorSet>,
}

impl RelayResponse {
    /// Success body.
    #[must_use]
    pub fn sent(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            field_errors: None,
        }
    }

    /// Failure body.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            field_errors: None,
        }
    }

    /// Failure body carrying per-field validation errors.
    #[must_use]
    pub fn invalid(error: impl Into<String>, field_errors: FieldErrorSet) -> Self {
        Self {
            field_errors: Some(field_errors),
            ..Self::failed(error)
        }
    }
}
