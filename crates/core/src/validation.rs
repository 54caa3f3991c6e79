//! Contact form validation schema.
//!
//! The same rules run in the submission controller before anything touches
//! the network and again inside the relay before anything reaches the email
//! provider.
//!
//! # Rules
//!
//! | Field     | Trimmed | Min | Max  | Shape          |
//! |-----------|---------|-----|------|----------------|
//! | `name`    | yes     | 2   | 100  |                |
//! | `email`   | yes     |     | 255  | email address  |
//! | `message` | yes     | 10  | 1000 |                |
//! | context   | yes     |     | 100  | optional       |
//!
//! Lengths count characters, not bytes. Fields are checked in the order
//! above, every failing field is reported, and each field reports only its
//! first violation.

use crate::types::{
    ContactSubmission, ContextField, Email, EmailError, Field, FieldErrorSet, FormKind,
    RawSubmission,
};

/// Minimum name length.
pub const NAME_MIN: usize = 2;
/// Maximum name length.
pub const NAME_MAX: usize = 100;
/// Maximum email length.
pub const EMAIL_MAX: usize = Email::MAX_LENGTH;
/// Minimum message length.
pub const MESSAGE_MIN: usize = 10;
/// Maximum message length.
pub const MESSAGE_MAX: usize = 1000;
/// Maximum length of the optional company / GitHub field.
pub const CONTEXT_MAX: usize = 100;

/// User-facing validation messages.
pub mod messages {
    pub const NAME_TOO_SHORT: &str = "Nome deve ter pelo menos 2 caracteres";
    pub const NAME_TOO_LONG: &str = "Nome deve ter no máximo 100 caracteres";
    pub const EMAIL_INVALID: &str = "Email inválido";
    pub const EMAIL_TOO_LONG: &str = "Email deve ter no máximo 255 caracteres";
    pub const PROJECT_TOO_SHORT: &str = "Descreva seu projeto com mais detalhes";
    pub const MESSAGE_TOO_SHORT: &str = "Mensagem deve ter pelo menos 10 caracteres";
    pub const MESSAGE_TOO_LONG: &str = "Mensagem deve ter no máximo 1000 caracteres";
    pub const COMPANY_TOO_LONG: &str = "Empresa deve ter no máximo 100 caracteres";
    pub const GITHUB_TOO_LONG: &str = "GitHub deve ter no máximo 100 caracteres";
}

/// Validate raw form input.
///
/// Returns the trimmed submission when every field passes, otherwise an
/// error set with one entry per failing field.
///
/// # Errors
///
/// Returns a non-empty [`FieldErrorSet`] if any field violates its rules.
pub fn validate(raw: &RawSubmission) -> Result<ContactSubmission, FieldErrorSet> {
    let mut errors = FieldErrorSet::new();

    let name = raw.name.trim();
    if let Some(message) = check_length(
        name,
        NAME_MIN,
        NAME_MAX,
        messages::NAME_TOO_SHORT,
        messages::NAME_TOO_LONG,
    ) {
        errors.insert(Field::Name, message);
    }

    let email = match Email::parse(raw.email.trim()) {
        Ok(email) => Some(email),
        Err(EmailError::TooLong { .. }) => {
            errors.insert(Field::Email, messages::EMAIL_TOO_LONG);
            None
        }
        Err(_) => {
            errors.insert(Field::Email, messages::EMAIL_INVALID);
            None
        }
    };

    let message = raw.message.trim();
    let too_short = match raw.kind {
        FormKind::Client => messages::PROJECT_TOO_SHORT,
        FormKind::Dev => messages::MESSAGE_TOO_SHORT,
    };
    if let Some(error) = check_length(
        message,
        MESSAGE_MIN,
        MESSAGE_MAX,
        too_short,
        messages::MESSAGE_TOO_LONG,
    ) {
        errors.insert(Field::Message, error);
    }

    let context = raw.context().map(str::trim).filter(|v| !v.is_empty());
    if let Some(value) = context
        && char_len(value) > CONTEXT_MAX
    {
        let error = match raw.kind {
            FormKind::Client => messages::COMPANY_TOO_LONG,
            FormKind::Dev => messages::GITHUB_TOO_LONG,
        };
        errors.insert(raw.kind.context_field(), error);
    }

    match email {
        Some(email) if errors.is_empty() => Ok(ContactSubmission::new(
            raw.kind,
            name.to_owned(),
            email,
            message.to_owned(),
            context.map(|value| match raw.kind {
                FormKind::Client => ContextField::Company(value.to_owned()),
                FormKind::Dev => ContextField::Github(value.to_owned()),
            }),
        )),
        _ => Err(errors),
    }
}

/// Trim every field and cut it to its length cap.
///
/// This never rejects input; it only bounds it. Running it twice gives the
/// same result as running it once. Blank context values become absent.
#[must_use]
pub fn sanitize(raw: &RawSubmission) -> RawSubmission {
    let context = |value: &Option<String>| {
        value
            .as_deref()
            .map(|v| clamp(v, CONTEXT_MAX))
            .filter(|v| !v.is_empty())
    };

    RawSubmission {
        kind: raw.kind,
        name: clamp(&raw.name, NAME_MAX),
        email: clamp(&raw.email, EMAIL_MAX),
        message: clamp(&raw.message, MESSAGE_MAX),
        company: context(&raw.company),
        github: context(&raw.github),
    }
}

/// Trim, truncate to `max` characters, then trim the cut end again so the
/// result is stable under repeated application.
fn clamp(value: &str, max: usize) -> String {
    let truncated: String = value.trim().chars().take(max).collect();
    truncated.trim_end().to_owned()
}

fn check_length(
    value: &str,
    min: usize,
    max: usize,
    too_short: &'static str,
    too_long: &'static str,
) -> Option<&'static str> {
    let len = char_len(value);
    if len < min {
        Some(too_short)
    } else if len > max {
        Some(too_long)
    } else {
        None
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}
