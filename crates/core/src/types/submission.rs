//! Contact submissions, raw and validated.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::field::Field;

/// Which contact form the visitor filled in.
///
/// The client form asks about a project and an optional company; the
/// developer form asks for a message and an optional GitHub profile. Both
/// produce the same submission shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    #[default]
    Client,
    Dev,
}

impl FormKind {
    /// The optional context field this form carries.
    #[must_use]
    pub const fn context_field(self) -> Field {
        match self {
            Self::Client => Field::Company,
            Self::Dev => Field::Github,
        }
    }
}

/// Untyped form input, exactly as entered.
///
/// Missing fields are empty strings; nothing is trimmed or checked until
/// [`crate::validate`] runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSubmission {
    pub kind: FormKind,
    pub name: String,
    pub email: String,
    pub message: String,
    pub company: Option<String>,
    pub github: Option<String>,
}

impl RawSubmission {
    /// Build a raw submission from `(field name, value)` pairs.
    ///
    /// Accepts `project` as an alias for `message` (the client form's name
    /// for it). Unknown keys are ignored.
    pub fn from_fields<I, K, V>(kind: FormKind, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self {
            kind,
            ..Self::default()
        };
        for (key, value) in fields {
            match key.as_ref() {
                "name" => raw.name = value.into(),
                "email" => raw.email = value.into(),
                "message" | "project" => raw.message = value.into(),
                "company" => raw.company = Some(value.into()),
                "github" => raw.github = Some(value.into()),
                _ => {}
            }
        }
        raw
    }

    /// The context value relevant to this form kind, if provided.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self.kind {
            FormKind::Client => self.company.as_deref(),
            FormKind::Dev => self.github.as_deref(),
        }
    }

    /// Reset every field to empty, keeping the form kind.
    pub fn clear(&mut self) {
        *self = Self {
            kind: self.kind,
            ..Self::default()
        };
    }
}

/// Optional extra detail attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextField {
    Company(String),
    Github(String),
}

impl ContextField {
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Company(_) => Field::Company,
            Self::Github(_) => Field::Github,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Company(v) | Self::Github(v) => v,
        }
    }

    /// Human-readable label used in the email body.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Company(_) => "Empresa",
            Self::Github(_) => "GitHub",
        }
    }
}

/// A contact submission that passed validation.
///
/// All values are trimmed and within their length limits. The only way to
/// obtain one is through [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    kind: FormKind,
    name: String,
    email: Email,
    message: String,
    context: Option<ContextField>,
}

impl ContactSubmission {
    pub(crate) const fn new(
        kind: FormKind,
        name: String,
        email: Email,
        message: String,
        context: Option<ContextField>,
    ) -> Self {
        Self {
            kind,
            name,
            email,
            message,
            context,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn context(&self) -> Option<&ContextField> {
        self.context.as_ref()
    }
}
