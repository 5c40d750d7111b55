//! Table-driven CRC-32 (reflected, polynomial 0xEDB88320) as used for PNG
//! chunk trailers.
//!
//! A running CRC starts at [`CRC32_INITIAL`], is folded over any number of
//! byte ranges with [`update`], and is complemented by [`finalize`] before it
//! is written out. The lookup table is built at compile time and shared by
//! every encoder.

use crate::constants::{CRC32_INITIAL, CRC32_POLYNOMIAL};

/// Builds the 256-entry lookup table for the reflected CRC-32 polynomial.
pub const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            if c & 1 != 0 {
                c = CRC32_POLYNOMIAL ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

pub static CRC_TABLE: [u32; 256] = build_table();

/// Folds `bytes` into a running CRC. The running value is not complemented.
pub fn update(crc: u32, bytes: &[u8]) -> u32 {
    bytes.iter().fold(crc, |c, &byte| {
        CRC_TABLE[((c ^ byte as u32) & 0xFF) as usize] ^ (c >> 8)
    })
}

/// Folds `bytes[start..start + len]` into a running CRC.
///
/// # Panics
/// Panics if the range is out of bounds for `bytes`.
pub fn update_range(crc: u32, bytes: &[u8], start: usize, len: usize) -> u32 {
    update(crc, &bytes[start..start + len])
}

#[inline]
pub fn finalize(crc: u32) -> u32 {
    crc ^ 0xFFFF_FFFF
}

/// CRC-32 of a whole buffer.
pub fn checksum(bytes: &[u8]) -> u32 {
    finalize(update(CRC32_INITIAL, bytes))
}

/// CRC-32 of `bytes[start..start + len]`.
pub fn checksum_range(bytes: &[u8], start: usize, len: usize) -> u32 {
    finalize(update_range(CRC32_INITIAL, bytes, start, len))
}
