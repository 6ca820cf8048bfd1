//! TOTP code calculation, RFC 6238 over HMAC-SHA1 with a 30 second step.

use hmac::{digest::InvalidLength, Hmac, Mac};
use sha1::Sha1;
use time::OffsetDateTime;

use crate::encoding::{self, Base32Mode};
use crate::error::{Error, Result};

type HmacSha1 = Hmac<Sha1>;

/// Length of a time step in seconds.
pub const PERIOD: u64 = 30;

/// Number of digits in a code unless asked otherwise.
pub const DEFAULT_DIGITS: u32 = 6;

pub(crate) const MAX_DIGITS: u32 = 9;

/// Time step for the given unix time. Instants before the epoch map to step 0.
pub fn time_step_at(unix_seconds: i64) -> u64 {
    u64::try_from(unix_seconds).unwrap_or(0) / PERIOD
}

/// Time step for the current wall-clock time.
pub fn current_time_step() -> u64 {
    time_step_at(OffsetDateTime::now_utc().unix_timestamp())
}

/// Compute the code for `secret` at `time_step`, or at the current step when
/// `None`. The secret is decoded with the compatibility Base32 rules.
pub fn calculate_code(secret: &str, time_step: Option<u64>, digits: u32) -> Result<String> {
    calculate_code_with(secret, time_step, digits, Base32Mode::Compat)
}

pub fn calculate_code_with(
    secret: &str,
    time_step: Option<u64>,
    digits: u32,
    mode: Base32Mode,
) -> Result<String> {
    if !(1..=MAX_DIGITS).contains(&digits) {
        return Err(Error::InvalidCodeLength(digits));
    }
    let key = encoding::decode_with(secret, mode)?;
    let step = time_step.unwrap_or_else(current_time_step);
    code_for_key(&key, step, digits)
}

pub(crate) fn code_for_key(key: &[u8], time_step: u64, digits: u32) -> Result<String> {
    // HMAC hashes or pads any key, so `Error::Key` is unreachable here.
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_: InvalidLength| Error::Key)?;
    mac.update(&step_message(time_step));
    let digest = mac.finalize().into_bytes();

    let code = truncate(&digest) % 10u32.pow(digits);
    Ok(format!("{code:0width$}", width = digits as usize))
}

/// Eight byte big-endian message: four zero bytes, then the step as a u32.
/// Steps beyond `u32::MAX` wrap.
fn step_message(time_step: u64) -> [u8; 8] {
    let mut message = [0u8; 8];
    message[4..].copy_from_slice(&(time_step as u32).to_be_bytes());
    message
}

/// Dynamic truncation (RFC 4226 section 5.3). The offset is the low nibble of
/// the last digest byte.
fn truncate(digest: &[u8]) -> u32 {
    let offset = usize::from(digest[digest.len() - 1] & 0x0f);
    let window = [
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ];
    u32::from_be_bytes(window) & 0x7fff_ffff
}

/// Split a code in two halves for display, e.g. `123 456`.
pub fn group_code(code: &str) -> String {
    if code.len() < 4 || !code.is_ascii() {
        return code.to_string();
    }
    let (head, tail) = code.split_at(code.len() / 2);
    format!("{head} {tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    // "12345678901234567890" in Base32
    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn rfc6238_sha1_at_59_seconds() {
        let step = time_step_at(59);
        assert_eq!(step, 1);
        assert_eq!(calculate_code(RFC_SECRET, Some(step), 6).unwrap(), "287082");
        assert_eq!(calculate_code(RFC_SECRET, Some(step), 8).unwrap(), "94287082");
    }

    #[test]
    fn rfc4226_counter_vectors() {
        let expected = [
            "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583",
            "399871", "520489",
        ];
        for (step, code) in expected.iter().enumerate() {
            assert_eq!(
                calculate_code(RFC_SECRET, Some(step as u64), DEFAULT_DIGITS).unwrap(),
                *code,
                "step {step}"
            );
        }
    }

    #[test]
    fn calculation_is_deterministic() {
        let first = calculate_code(RFC_SECRET, Some(37_037_036), 6).unwrap();
        let second = calculate_code(RFC_SECRET, Some(37_037_036), 6).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "081804");
    }

    #[test]
    fn codes_are_zero_padded() {
        // 1234567890 -> 89005924
        let code = calculate_code(RFC_SECRET, Some(time_step_at(1_234_567_890)), 6).unwrap();
        assert_eq!(code, "005924");
        assert_eq!(code.len(), 6);
    }

    #[test]
    fn current_step_is_used_when_absent() {
        let before = current_time_step();
        let code = calculate_code(RFC_SECRET, None, 6).unwrap();
        let after = current_time_step();
        assert!(
            code == calculate_code(RFC_SECRET, Some(before), 6).unwrap()
                || code == calculate_code(RFC_SECRET, Some(after), 6).unwrap()
        );
    }

    #[test]
    fn time_step_clamps_before_epoch() {
        assert_eq!(time_step_at(-1), 0);
        assert_eq!(time_step_at(29), 0);
        assert_eq!(time_step_at(30), 1);
        assert_eq!(time_step_at(60), 2);
    }

    #[test]
    fn step_message_layout() {
        assert_eq!(step_message(1), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(step_message(0x0102_0304), [0, 0, 0, 0, 1, 2, 3, 4]);
        assert_eq!(step_message(0x1_0000_0002), [0, 0, 0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn truncation_uses_last_byte_nibble() {
        // RFC 4226 section 5.4 example digest
        let digest = [
            0x1f, 0x86, 0x98, 0x69, 0x0e, 0x02, 0xca, 0x16, 0x61, 0x85, 0x50, 0xef, 0x7f, 0x19,
            0xda, 0x8e, 0x94, 0x5b, 0x55, 0x5a,
        ];
        assert_eq!(truncate(&digest), 0x50ef_7f19);
    }

    #[test]
    fn decode_failures_propagate() {
        assert!(matches!(
            calculate_code("NOT-BASE32", Some(1), 6),
            Err(Error::InvalidBase32(_))
        ));
        assert!(matches!(
            calculate_code("", Some(1), 6),
            Err(Error::InvalidBase32(_))
        ));
    }

    #[test]
    fn digit_count_is_bounded() {
        assert!(matches!(
            calculate_code(RFC_SECRET, Some(1), 0),
            Err(Error::InvalidCodeLength(0))
        ));
        assert!(matches!(
            calculate_code(RFC_SECRET, Some(1), 10),
            Err(Error::InvalidCodeLength(10))
        ));
    }

    #[test]
    fn strict_mode_keeps_zero_bytes_in_key() {
        let secret = encoding::encode(&[0x00, 0x41, 0x00, 0x42, 0x43]);
        let compat = calculate_code_with(&secret, Some(1), 6, Base32Mode::Compat).unwrap();
        let strict = calculate_code_with(&secret, Some(1), 6, Base32Mode::Strict).unwrap();
        let stripped = encoding::encode(&[0x41, 0x42, 0x43]);
        assert_eq!(
            compat,
            calculate_code_with(&stripped, Some(1), 6, Base32Mode::Strict).unwrap()
        );
        assert_ne!(compat, strict);
    }

    #[test]
    fn hmac_accepts_any_key_length() {
        for len in [0usize, 1, 20, 64, 65, 200] {
            let key = vec![0x5a; len];
            assert!(code_for_key(&key, 1, 6).is_ok(), "key length {len}");
        }
    }

    #[test]
    fn grouping() {
        assert_eq!(group_code("123456"), "123 456");
        assert_eq!(group_code("12345678"), "1234 5678");
        assert_eq!(group_code("123"), "123");
    }
}
