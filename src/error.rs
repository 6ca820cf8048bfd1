use thiserror::Error;

/// Reasons a Base32 secret can be rejected.
///
/// Positions are reported instead of the offending characters so that an
/// error message never carries secret material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("base32 input is empty")]
    Empty,
    #[error("base32 padding is malformed")]
    InvalidPadding,
    #[error("invalid base32 character at position {position}")]
    InvalidCharacter { position: usize },
}

/// Errors returned by the OTP operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("secret length must be between 32 and 128, got {0}")]
    InvalidLength(usize),
    #[error("no cryptographically secure random source available")]
    NoSecureRandom(#[source] rand::Error),
    #[error("invalid base32 secret")]
    InvalidBase32(#[from] DecodeError),
    #[error("code length must be between 1 and 9 digits, got {0}")]
    InvalidCodeLength(u32),
    /// HMAC takes keys of any length, so this is not produced in practice.
    /// It stands in for the `InvalidLength` that the `hmac` API still returns.
    #[error("secret was rejected as an HMAC key")]
    Key,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
