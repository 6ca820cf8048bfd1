use tracing::debug;

use crate::code::{self, DEFAULT_DIGITS, MAX_DIGITS};
use crate::compare::constant_time_eq;
use crate::encoding::{self, Base32Mode};

/// Number of steps accepted on either side of the current one.
pub const DEFAULT_WINDOW: u32 = 1;

/// Largest accepted window. Verification cost grows with the window, and a
/// wide one accepts most codes.
pub const MAX_WINDOW: u32 = 10;

/// Checks submitted codes against a secret.
///
/// Every failure, including a malformed secret, a code of the wrong length or
/// a window above [`MAX_WINDOW`], is reported as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verifier {
    code_length: u32,
    window: u32,
    mode: Base32Mode,
}

impl Default for Verifier {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_DIGITS,
            window: DEFAULT_WINDOW,
            mode: Base32Mode::Compat,
        }
    }
}

impl Verifier {
    pub fn new(code_length: u32, window: u32) -> Self {
        Self {
            code_length,
            window,
            ..Self::default()
        }
    }

    pub fn with_mode(self, mode: Base32Mode) -> Self {
        Self { mode, ..self }
    }

    pub fn code_length(&self) -> u32 {
        self.code_length
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    /// Accept `submitted` if it matches the code of any step in
    /// `[base - window, base + window]`, where `base` is `time_step` or the
    /// current step. Candidates are tried from the oldest step forward.
    pub fn compare_code(&self, secret: &str, submitted: &str, time_step: Option<u64>) -> bool {
        if submitted.len() != self.code_length as usize {
            debug!(
                expected = self.code_length,
                got = submitted.len(),
                "rejecting code of wrong length"
            );
            return false;
        }
        if !(1..=MAX_DIGITS).contains(&self.code_length) {
            debug!(code_length = self.code_length, "unsupported code length");
            return false;
        }
        if self.window > MAX_WINDOW {
            debug!(window = self.window, max = MAX_WINDOW, "window too wide");
            return false;
        }

        let key = match encoding::decode_with(secret, self.mode) {
            Ok(key) => key,
            Err(err) => {
                debug!(error = %err, "secret could not be decoded");
                return false;
            }
        };

        let base = time_step.unwrap_or_else(code::current_time_step);
        let window = i64::from(self.window);
        let mut checked = 0u32;
        for offset in -window..=window {
            let Some(step) = base.checked_add_signed(offset) else {
                continue;
            };
            checked += 1;
            match code::code_for_key(&key, step, self.code_length) {
                Ok(candidate) if constant_time_eq(candidate.as_bytes(), submitted.as_bytes()) => {
                    debug!(offset, "code accepted");
                    return true;
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(error = %err, "code calculation failed");
                    return false;
                }
            }
        }

        debug!(base, window = self.window, checked, "no step matched");
        false
    }
}

/// Verify with the default code length and the given window.
pub fn compare_code(
    secret: &str,
    submitted: &str,
    time_discrepancy: u32,
    time_step: Option<u64>,
) -> bool {
    Verifier::new(DEFAULT_DIGITS, time_discrepancy).compare_code(secret, submitted, time_step)
}
