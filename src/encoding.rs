//! RFC 4648 Base32 for OTP secrets.
//!
//! Secrets issued by older deployments rely on a lenient decoder: it accepts
//! only the padding counts {0, 1, 2, 4, 6}, fills a short trailing group with
//! zero bits, and drops every decoded byte equal to zero. That decoder is
//! [`decode`], written out here since no Base32 crate behaves that way. It
//! corrupts any key containing an embedded `0x00` byte, so [`decode_strict`]
//! is provided for secrets produced by a real Base32 encoder. It validates the
//! input here for precise errors, then decodes through the `base32` crate.

use base32::Alphabet::Rfc4648;

use crate::error::DecodeError;

/// The 32 symbols of the RFC 4648 alphabet, in value order.
pub const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

const PAD: u8 = b'=';

const COMPAT_PADDING: [usize; 5] = [0, 1, 2, 4, 6];
const STRICT_PADDING: [usize; 5] = [0, 1, 3, 4, 6];

/// Selects how [`decode_with`] interprets its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Base32Mode {
    /// Lenient decoding that discards zero bytes. Matches secrets already in
    /// circulation.
    #[default]
    Compat,
    /// Plain RFC 4648 decoding.
    Strict,
}

/// Encode `bytes` as uppercase, `=`-padded Base32.
pub fn encode(bytes: &[u8]) -> String {
    base32::encode(Rfc4648 { padding: true }, bytes)
}

/// Decode with the compatibility rules. See the module docs.
pub fn decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    decode_with(input, Base32Mode::Compat)
}

/// Decode as plain RFC 4648 Base32, keeping zero bytes.
pub fn decode_strict(input: &str) -> Result<Vec<u8>, DecodeError> {
    decode_with(input, Base32Mode::Strict)
}

pub fn decode_with(text: &str, mode: Base32Mode) -> Result<Vec<u8>, DecodeError> {
    let input = text.as_bytes();
    if input.is_empty() {
        return Err(DecodeError::Empty);
    }

    let allowed = match mode {
        Base32Mode::Compat => &COMPAT_PADDING,
        Base32Mode::Strict => &STRICT_PADDING,
    };
    let data = strip_padding(input, allowed)?;
    if data.is_empty() {
        return Err(DecodeError::Empty);
    }

    let values = data
        .iter()
        .enumerate()
        .map(|(position, &b)| symbol_value(b).ok_or(DecodeError::InvalidCharacter { position }))
        .collect::<Result<Vec<u8>, _>>()?;

    match mode {
        Base32Mode::Compat => decode_groups(&values),
        Base32Mode::Strict => {
            // A trailing group of 1, 3 or 6 symbols cannot end on a byte boundary.
            if matches!(values.len() % 8, 1 | 3 | 6) {
                return Err(DecodeError::InvalidPadding);
            }
            base32::decode(Rfc4648 { padding: true }, text).ok_or(DecodeError::InvalidPadding)
        }
    }
}

/// Validate the trailing `=` run and return the unpadded symbols.
fn strip_padding<'a>(input: &'a [u8], allowed: &[usize]) -> Result<&'a [u8], DecodeError> {
    let total = input.iter().filter(|&&b| b == PAD).count();
    let trailing = input.iter().rev().take_while(|&&b| b == PAD).count();

    if total != trailing || !allowed.contains(&trailing) {
        return Err(DecodeError::InvalidPadding);
    }
    if trailing > 0 && input.len() % 8 != 0 {
        return Err(DecodeError::InvalidPadding);
    }
    Ok(&input[..input.len() - trailing])
}

fn symbol_value(b: u8) -> Option<u8> {
    match b {
        b'A'..=b'Z' => Some(b - b'A'),
        b'2'..=b'7' => Some(b - b'2' + 26),
        _ => None,
    }
}

/// Every group of eight symbols becomes 40 bits and five bytes; missing
/// symbols in the last group count as zero. Zero bytes are discarded.
fn decode_groups(values: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(values.len() * 5 / 8 + 5);
    for group in values.chunks(8) {
        let mut bits = 0u64;
        for i in 0..8 {
            bits = (bits << 5) | u64::from(group.get(i).copied().unwrap_or(0));
        }
        out.extend(
            bits.to_be_bytes()[3..]
                .iter()
                .copied()
                .filter(|&byte| byte != 0),
        );
    }

    if out.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(out)
}
