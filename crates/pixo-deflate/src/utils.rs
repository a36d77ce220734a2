/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Adler-32, the checksum the zlib wrapper carries as its trailer
//!
//! See RFC 1950 section 8.2

/// Largest number of bytes the two sums can take before
/// they must be reduced modulo 65521 to avoid overflowing a u32
const NMAX: usize = 5552;

const ADLER_MODULO: u32 = 65521;

/// A streaming Adler-32 hasher
///
/// The hash of a byte stream does not depend on how the stream
/// was split across [`write`](Self::write) calls
///
/// # Example
/// ```
/// use pixo_deflate::Adler32;
///
/// let mut hasher = Adler32::new();
/// hasher.write(b"AB");
/// hasher.write(b"C");
/// assert_eq!(hasher.sum32(), 0x018D_00C7);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Adler32 {
    s1: u32,
    s2: u32
}

impl Default for Adler32 {
    fn default() -> Self {
        Adler32::new()
    }
}

impl Adler32 {
    /// Create a new hasher with the initial state mandated
    /// by RFC 1950, `s1 = 1`, `s2 = 0`
    pub const fn new() -> Adler32 {
        Adler32 { s1: 1, s2: 0 }
    }

    /// Add `data` to the running checksum
    pub fn write(&mut self, data: &[u8]) {
        let mut s1 = self.s1;
        let mut s2 = self.s2;

        // both sums fit in a u32 for up to NMAX bytes, so the
        // expensive modulo runs once per chunk and not per byte
        for chunk in data.chunks(NMAX) {
            for byte in chunk {
                s1 += u32::from(*byte);
                s2 += s1;
            }
            s1 %= ADLER_MODULO;
            s2 %= ADLER_MODULO;
        }

        self.s1 = s1;
        self.s2 = s2;
    }

    /// The checksum of everything written so far
    pub const fn sum32(&self) -> u32 {
        (self.s2 << 16) | self.s1
    }

    /// Restore the hasher to its initial state
    pub fn reset(&mut self) {
        self.s1 = 1;
        self.s2 = 0;
    }
}

/// Calculate the Adler-32 hash of `data` in one shot
pub fn calc_adler_hash(data: &[u8]) -> u32 {
    let mut hasher = Adler32::new();
    hasher.write(data);
    hasher.sum32()
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{calc_adler_hash, Adler32};

    #[test]
    fn test_known_values() {
        assert_eq!(calc_adler_hash(b""), 1);
        assert_eq!(calc_adler_hash(b"ABC"), 0x018D_00C7);
        // from RFC 1950's favourite example string
        assert_eq!(calc_adler_hash(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn test_streaming_matches_oneshot() {
        let data: Vec<u8> = (0..100_000_u32).map(|i| (i * 31 % 255) as u8).collect();
        let oneshot = calc_adler_hash(&data);

        // any chunking must land on the same hash
        for chunk_size in [1, 7, 100, 5551, 5552, 5553, 99_999] {
            let mut hasher = Adler32::new();
            for chunk in data.chunks(chunk_size) {
                hasher.write(chunk);
            }
            assert_eq!(hasher.sum32(), oneshot, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut hasher = Adler32::new();
        hasher.write(b"some bytes");
        hasher.reset();
        assert_eq!(hasher.sum32(), 1);
    }

    #[test]
    fn test_matches_simd_adler32() {
        let data: Vec<u8> = (0..65_536_u32).map(|i| (i ^ (i >> 3)) as u8).collect();
        assert_eq!(calc_adler_hash(&data), simd_adler32::adler32(&data.as_slice()));
    }
}
