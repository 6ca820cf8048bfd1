//! Time-based one-time passwords (RFC 6238) with HMAC-SHA1, six digits and a
//! 30 second step.
//!
//! Secrets travel as Base32 strings. [`secret::generate`] issues new ones,
//! [`code::calculate_code`] derives the code for a time step and
//! [`verify::compare_code`] checks a submitted code against a window of steps.
//! Nothing here keeps state between calls.

pub mod code;
pub mod compare;
pub mod encoding;
pub mod error;
pub mod secret;
pub mod uri;
pub mod verify;

pub use code::{calculate_code, current_time_step, time_step_at};
pub use encoding::Base32Mode;
pub use error::{DecodeError, Error, Result};
pub use verify::{compare_code, Verifier};
