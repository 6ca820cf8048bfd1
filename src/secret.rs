use std::ops::RangeInclusive;

use rand::{rngs::OsRng, RngCore};

use crate::encoding::ALPHABET;
use crate::error::{Error, Result};

/// Accepted secret lengths, in Base32 symbols.
pub const SECRET_LENGTH: RangeInclusive<usize> = 32..=128;

/// Generate a random secret of `length` Base32 symbols.
///
/// Each random byte picks one symbol through its low five bits
/// (`ALPHABET[byte & 31]`). This is symbol selection, not a Base32 encoding of
/// the random bytes, and it must stay that way for previously issued secrets
/// to keep their shape. The result carries no padding.
///
/// Randomness comes from the operating system only. If it is unavailable the
/// call fails with [`Error::NoSecureRandom`].
pub fn generate(length: usize) -> Result<String> {
    if !SECRET_LENGTH.contains(&length) {
        return Err(Error::InvalidLength(length));
    }

    let mut bytes = vec![0u8; length];
    OsRng.try_fill_bytes(&mut bytes).map_err(|err| {
        tracing::error!(error = %err, "operating system random source failed");
        Error::NoSecureRandom(err)
    })?;

    Ok(symbols_from_bytes(&bytes))
}

fn symbols_from_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| char::from(ALPHABET[usize::from(b & 31)]))
        .collect()
}
