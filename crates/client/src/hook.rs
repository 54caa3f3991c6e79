//! Post-success side channel.
//!
//! After a successful submission the site opens a WhatsApp chat prefilled
//! with the submitter's name and message. This runs outside the
//! success/failure contract: a hook failure is logged and nothing else.

use std::sync::Arc;

use portfolio_core::{ContactSubmission, WhatsAppLink};
use thiserror::Error;

/// Errors raised by success hooks.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("Failed to open link: {0}")]
    Open(String),
}

/// Opens a URL in a new browsing context.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait LinkOpener: Send + Sync + 'static {
    /// Open `url` without waiting for it to load.
    ///
    /// # Errors
    ///
    /// Returns `HookError` if the link cannot be handed off.
    fn open(&self, url: &str) -> Result<(), HookError>;
}

/// Runs after the relay confirms a submission.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait SuccessHook: Send + Sync + 'static {
    /// React to a sent submission.
    ///
    /// # Errors
    ///
    /// Returns `HookError` on failure; the controller only logs it.
    fn on_success(&self, submission: &ContactSubmission) -> Result<(), HookError>;
}

/// Opens a WhatsApp deep link prefilled with the submission.
pub struct DeepLinkHook {
    phone: String,
    opener: Arc<dyn LinkOpener>,
}

impl DeepLinkHook {
    #[must_use]
    pub fn new(phone: impl Into<String>, opener: Arc<dyn LinkOpener>) -> Self {
        Self {
            phone: phone.into(),
            opener,
        }
    }

    /// The link that would be opened for `submission`.
    #[must_use]
    pub fn link_for(&self, submission: &ContactSubmission) -> WhatsAppLink {
        WhatsAppLink::for_submission(&self.phone, submission)
    }
}

impl SuccessHook for DeepLinkHook {
    fn on_success(&self, submission: &ContactSubmission) -> Result<(), HookError> {
        let url = self.link_for(submission).to_url();
        tracing::debug!(url = %url, "Opening WhatsApp deep link");
        self.opener.open(&url)
    }
}
