//! Local validation command.
//!
//! # Usage
//!
//! ```bash
//! portfolio-cli validate --form dev -n "Jo" -e jo@x.com -m "Hello there, this is long enough."
//! ```

use portfolio_core::{RawSubmission, validate};

use super::{CommandError, print_field_errors};

/// Run the validation schema and report the result.
///
/// # Errors
///
/// Returns `CommandError::Invalid` if any field fails.
#[allow(clippy::print_stdout)]
pub fn run(raw: &RawSubmission) -> Result<(), CommandError> {
    match validate(raw) {
        Ok(submission) => {
            println!("Valid submission from {} <{}>", submission.name(), submission.email());
            Ok(())
        }
        Err(errors) => {
            println!("Invalid submission:");
            print_field_errors(&errors);
            Err(CommandError::Invalid(errors))
        }
    }
}
