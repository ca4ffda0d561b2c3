//! Diagnostic system for structured error reporting.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Context labels (why it's wrong)
//!
//! The export engine never aborts on the first user-facing error: every
//! rejection is recorded in a [`DiagnosticQueue`] and processing continues
//! with the next declaration. The unit as a whole fails iff the queue
//! recorded at least one error after all declarations were processed.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::{ErrorCode, Phase};
pub use queue::{DiagnosticConfig, DiagnosticQueue};
