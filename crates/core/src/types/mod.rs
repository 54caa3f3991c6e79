//! Core types for the contact flow.
//!
//! This module provides type-safe wrappers for the contact form domain.

pub mod email;
pub mod field;
pub mod result;
pub mod submission;

pub use email::{Email, EmailError};
pub use field::{Field, FieldErrorSet};
pub use result::SubmissionResult;
pub use submission::{ContactSubmission, ContextField, FormKind, RawSubmission};
