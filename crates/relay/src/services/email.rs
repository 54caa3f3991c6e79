//! Contact email composition.
//!
//! Renders a submission into the HTML and plain-text parts sent to the
//! portfolio owner. The HTML template escapes every submitted value.

use askama::Template;
use portfolio_core::ContactSubmission;

use super::resend::OutboundEmail;
use crate::config::ResendConfig;

/// Subject prefix; the submitter's name follows.
const SUBJECT_PREFIX: &str = "Nova mensagem do portfólio";

/// HTML template for a contact message.
#[derive(Template)]
#[template(path = "email/contact_message.html")]
struct ContactMessageHtml<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
    context: Option<(&'a str, &'a str)>,
}

/// Plain text template for a contact message.
#[derive(Template)]
#[template(path = "email/contact_message.txt")]
struct ContactMessageText<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
    context: Option<(&'a str, &'a str)>,
}

/// Build the outbound email for a validated submission.
///
/// # Errors
///
/// Returns error if a template fails to render.
pub fn compose(
    submission: &ContactSubmission,
    config: &ResendConfig,
) -> Result<OutboundEmail, askama::Error> {
    let name = submission.name();
    let email = submission.email().as_str();
    let message = submission.message();
    let context = submission.context().map(|c| (c.label(), c.value()));

    let html = ContactMessageHtml {
        name,
        email,
        message,
        context,
    }
    .render()?;
    let text = ContactMessageText {
        name,
        email,
        message,
        context,
    }
    .render()?;

    Ok(OutboundEmail {
        from: config.sender.clone(),
        to: vec![config.recipient.clone()],
        subject: subject_for(name),
        html,
        text,
        reply_to: Some(email.to_owned()),
    })
}

/// Subject line for a submission from `name`.
///
/// Control characters are replaced so a name cannot break the header.
fn subject_for(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    format!("{SUBJECT_PREFIX}: {name}")
}
