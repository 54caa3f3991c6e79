//! Send command.
//!
//! Runs one submit through the same controller the site uses, against the
//! relay named by `PORTFOLIO_RELAY_URL`.
//!
//! # Environment Variables
//!
//! - `PORTFOLIO_RELAY_URL` - Relay endpoint (required)
//! - `PORTFOLIO_RELAY_KEY` - Relay key (optional)
//! - `PORTFOLIO_WHATSAPP_PHONE` - Follow-up link target

use std::sync::Arc;

use portfolio_client::{
    ClientConfig, DeepLinkHook, HookError, HttpRelayTransport, LinkOpener, SubmissionController,
    SubmitOutcome,
};
use portfolio_core::{RawSubmission, SubmissionResult};

use super::{CommandError, print_field_errors};

/// Terminal stand-in for a new browser tab: prints the link.
struct PrintLink;

impl LinkOpener for PrintLink {
    #[allow(clippy::print_stdout)]
    fn open(&self, url: &str) -> Result<(), HookError> {
        println!("Continue on WhatsApp: {url}");
        Ok(())
    }
}

/// Validate and send `raw` through the relay.
///
/// # Errors
///
/// Returns `CommandError` if configuration is missing, validation fails or
/// the relay does not send the message.
#[allow(clippy::print_stdout)]
pub async fn run(raw: RawSubmission, deep_link: bool) -> Result<(), CommandError> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(?config, "Loaded client configuration");

    let transport = Arc::new(HttpRelayTransport::new(&config)?);
    let controller = if deep_link {
        let hook = DeepLinkHook::new(config.whatsapp_phone.clone(), Arc::new(PrintLink));
        SubmissionController::with_hook(transport, Arc::new(hook), config.display_window)
    } else {
        SubmissionController::new(transport, config.display_window)
    };

    match controller.submit(raw).await {
        SubmitOutcome::Completed(SubmissionResult::Success { message }) => {
            println!("{message}");
            Ok(())
        }
        SubmitOutcome::Completed(SubmissionResult::ValidationFailed(errors)) => {
            println!("Invalid submission:");
            print_field_errors(&errors);
            Err(CommandError::Invalid(errors))
        }
        SubmitOutcome::Completed(SubmissionResult::TransportFailed(reason)) => {
            Err(CommandError::Failed(reason))
        }
        SubmitOutcome::Ignored => Err(CommandError::Ignored),
    }
}
