/// Compare two byte strings in time that depends only on their length.
///
/// A length mismatch returns early; the length of an OTP code is public.
/// Otherwise every pair is inspected, so the position of the first differing
/// byte does not show up in the timing.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    std::hint::black_box(diff) == 0
}
