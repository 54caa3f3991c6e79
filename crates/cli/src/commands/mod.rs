//! CLI subcommands.

pub mod deep_link;
pub mod send;
pub mod validate;

use portfolio_client::{ClientConfigError, TransportError};
use portfolio_core::FieldErrorSet;
use thiserror::Error;

/// Errors that end a CLI command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Client configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(#[from] ClientConfigError),

    /// Relay transport could not be built.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// One or more fields failed validation.
    #[error("Validation failed for {} field(s)", .0.len())]
    Invalid(FieldErrorSet),

    /// The relay did not send the message.
    #[error("Send failed: {0}")]
    Failed(String),

    /// Another submit was already in flight.
    #[error("Submit ignored")]
    Ignored,
}

/// Print field errors, one per line.
#[allow(clippy::print_stdout)]
pub fn print_field_errors(errors: &FieldErrorSet) {
    for (field, message) in errors.iter() {
        println!("  {field}: {message}");
    }
}
