//! Additive 16-bit checksum used for objects and the whole image.
//!
//! The checksum is the byte sum truncated to 16 bits, which makes it additive:
//! the checksum of a concatenation equals the wrapping sum of the checksums of
//! its parts. Resume and per-object verification both rely on this.

/// Wrapping sum of all bytes, mod 2^16.
pub fn checksum16(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |acc, &byte| acc.wrapping_add(u16::from(byte)))
}

/// Combine two partial checksums.
#[inline]
pub fn combine(a: u16, b: u16) -> u16 {
    a.wrapping_add(b)
}
