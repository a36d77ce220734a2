/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Formatter};

/// Errors that may arise during compression
pub enum DeflateEncodeErrors {
    /// Compression level outside the supported 1..=9 range
    InvalidCompressionLevel(u8),
    /// Window size is not a power of two in 256..=32768
    InvalidWindowSize(usize),
    /// A stored block was asked to carry more than 65535 bytes
    InvalidBlockSize(usize),
    /// A symbol was emitted for which the current table holds no code
    InvalidSymbol(u16),
    /// A match length outside 3..=258
    InvalidLength(u16),
    /// A match offset outside 1..=window size
    InvalidOffset(u16),
    /// Dynamic header literal/length count outside 257..=286
    InvalidHlit(usize),
    /// Dynamic header offset count outside 1..=30
    InvalidHdist(usize),
    /// Dynamic header code-length count outside 4..=19
    InvalidHclen(usize),
    /// Anything that isn't significant
    Generic(&'static str)
}

impl Debug for DeflateEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidCompressionLevel(level) => {
                writeln!(f, "Invalid compression level {level}, expected 1..=9")
            }
            Self::InvalidWindowSize(size) => {
                writeln!(
                    f,
                    "Invalid window size {size}, expected a power of two between 256 and 32768"
                )
            }
            Self::InvalidBlockSize(size) => {
                writeln!(f, "Stored block size {size} greater than 65535")
            }
            Self::InvalidSymbol(sym) => {
                writeln!(f, "Symbol {sym} has no code in the current table")
            }
            Self::InvalidLength(length) => {
                writeln!(f, "Match length {length} outside 3..=258")
            }
            Self::InvalidOffset(offset) => {
                writeln!(f, "Match offset {offset} outside the window")
            }
            Self::InvalidHlit(hlit) => {
                writeln!(f, "Literal/length code count {hlit} outside 257..=286")
            }
            Self::InvalidHdist(hdist) => {
                writeln!(f, "Offset code count {hdist} outside 1..=30")
            }
            Self::InvalidHclen(hclen) => {
                writeln!(f, "Code length count {hclen} outside 4..=19")
            }
            Self::Generic(reason) => writeln!(f, "{reason}")
        }
    }
}

impl From<&'static str> for DeflateEncodeErrors {
    fn from(val: &'static str) -> Self {
        Self::Generic(val)
    }
}
