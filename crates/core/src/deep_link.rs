//! WhatsApp deep links.
//!
//! After a successful submission the site offers to continue the
//! conversation on WhatsApp with a prefilled message. The link is a plain
//! `https://wa.me/<phone>?text=<encoded>` URL.

use core::fmt;

use crate::types::ContactSubmission;

/// Base URL of the WhatsApp click-to-chat service.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Message used by the floating WhatsApp button when nothing was submitted.
pub const DEFAULT_GREETING: &str = "Olá Vinicius! Vi seu portfólio e gostaria de conversar.";

/// A click-to-chat link with an optional prefilled message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppLink {
    phone: String,
    text: Option<String>,
}

impl WhatsAppLink {
    /// Create a link to `phone`, in international format.
    ///
    /// Anything that is not a digit (`+`, spaces, dashes) is dropped, which
    /// is the form `wa.me` expects.
    #[must_use]
    pub fn new(phone: &str) -> Self {
        Self {
            phone: phone.chars().filter(char::is_ascii_digit).collect(),
            text: None,
        }
    }

    /// Prefill the chat with `text`.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Link prefilled with the default greeting.
    #[must_use]
    pub fn greeting(phone: &str) -> Self {
        Self::new(phone).with_text(DEFAULT_GREETING)
    }

    /// Link prefilled with the submitter's name and message.
    #[must_use]
    pub fn for_submission(phone: &str, submission: &ContactSubmission) -> Self {
        Self::for_message(phone, submission.name(), submission.message())
    }

    /// Link prefilled with a name and message.
    #[must_use]
    pub fn for_message(phone: &str, name: &str, message: &str) -> Self {
        Self::new(phone).with_text(format!("Olá Vinicius! Sou {name}.\n\n{message}"))
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Render the full URL.
    #[must_use]
    pub fn to_url(&self) -> String {
        match &self.text {
            Some(text) => format!(
                "{WHATSAPP_BASE_URL}/{}?text={}",
                self.phone,
                urlencoding::encode(text)
            ),
            None => format!("{WHATSAPP_BASE_URL}/{}", self.phone),
        }
    }
}

impl fmt::Display for WhatsAppLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}
