/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Dynamic block header construction
//!
//! A dynamic block describes its two real code tables as a sequence of
//! code lengths, itself compressed with the 19 symbol precode alphabet:
//! literal lengths 0..=15, repeat-previous (16), and two zero run
//! symbols (17, 18). This module builds the tables, run length encodes
//! the length sequence, and knows the exact bit cost of the result so
//! block type selection can compare before anything is written.

use alloc::vec::Vec;

use crate::bitstream::BitStreamWriter;
use crate::constants::{
    DEFLATE_MAX_CODEWORD_LENGTH, DEFLATE_MAX_PRE_CODEWORD_LEN, DEFLATE_NUM_OFFSET_SYMS,
    DEFLATE_NUM_PRECODE_SYMS, DEFLATE_PRECODE_LENS_PERMUTATION
};
use crate::errors::DeflateEncodeErrors;
use crate::huffman::{build_code_lengths, HuffmanTable};

/// Number of literal/length symbols that can actually occur in data
const USED_LITLEN_SYMS: usize = 286;

/// One precode operation covering part of the code length sequence
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum RleOp {
    /// A code length spelled out directly, 0..=15
    Literal(u8),
    /// Symbol 16, repeat the previous length, run of 3..=6
    Repeat(u8),
    /// Symbol 17, a run of 3..=10 zeros
    ZeroRun(u8),
    /// Symbol 18, a run of 11..=138 zeros
    LongZeroRun(u8)
}

impl RleOp {
    const fn precode_symbol(self) -> usize {
        match self {
            RleOp::Literal(length) => length as usize,
            RleOp::Repeat(_) => 16,
            RleOp::ZeroRun(_) => 17,
            RleOp::LongZeroRun(_) => 18
        }
    }

    /// Extra bits that trail this op's precode symbol
    const fn extra(self) -> (u8, u16) {
        match self {
            RleOp::Literal(_) => (0, 0),
            RleOp::Repeat(run) => (2, (run - 3) as u16),
            RleOp::ZeroRun(run) => (3, (run - 3) as u16),
            RleOp::LongZeroRun(run) => (7, (run - 11) as u16)
        }
    }
}

/// Everything needed to emit one dynamic block header, plus the
/// tables its body will be coded with
pub(crate) struct DynamicHeader {
    pub litlen: HuffmanTable,
    pub offset: HuffmanTable,
    precode:    HuffmanTable,

    ops: Vec<RleOp>,

    num_litlen:  usize,
    num_offset:  usize,
    num_precode: usize,

    /// Exact size of the header in bits, HLIT through the last
    /// precoded length
    pub header_cost: usize
}

impl DynamicHeader {
    /// Build tables and header layout from block symbol frequencies
    ///
    /// The caller must have counted the end of block symbol, every
    /// dynamic block terminates with it
    pub fn build(
        litlen_freqs: &[u32; USED_LITLEN_SYMS], offset_freqs: &[u32; DEFLATE_NUM_OFFSET_SYMS]
    ) -> Result<DynamicHeader, DeflateEncodeErrors> {
        debug_assert!(litlen_freqs[256] > 0);

        let litlen_lengths = build_code_lengths(litlen_freqs, DEFLATE_MAX_CODEWORD_LENGTH);
        let offset_lengths = build_code_lengths(offset_freqs, DEFLATE_MAX_CODEWORD_LENGTH);

        // trailing zero lengths are not transmitted, but at least
        // 257 literal/length and one offset code always are
        let num_litlen = litlen_lengths
            .iter()
            .rposition(|length| *length > 0)
            .map_or(257, |position| (position + 1).max(257));

        let num_offset = offset_lengths
            .iter()
            .rposition(|length| *length > 0)
            .map_or(1, |position| (position + 1).max(1));

        if !(257..=286).contains(&num_litlen) {
            return Err(DeflateEncodeErrors::InvalidHlit(num_litlen));
        }
        if !(1..=30).contains(&num_offset) {
            return Err(DeflateEncodeErrors::InvalidHdist(num_offset));
        }

        // the two length sequences are run length coded as one
        let mut combined = Vec::with_capacity(num_litlen + num_offset);
        combined.extend_from_slice(&litlen_lengths[..num_litlen]);
        combined.extend_from_slice(&offset_lengths[..num_offset]);

        let ops = run_length_encode(&combined);

        let mut precode_freqs = [0_u32; DEFLATE_NUM_PRECODE_SYMS];
        for op in &ops {
            precode_freqs[op.precode_symbol()] += 1;
        }

        let precode_lengths = build_code_lengths(&precode_freqs, DEFLATE_MAX_PRE_CODEWORD_LEN);

        // lengths are sent in the fixed permutation, trailing zeros
        // in that order may be dropped down to four entries
        let num_precode = DEFLATE_PRECODE_LENS_PERMUTATION
            .iter()
            .rposition(|sym| precode_lengths[usize::from(*sym)] > 0)
            .map_or(4, |position| (position + 1).max(4));

        if !(4..=19).contains(&num_precode) {
            return Err(DeflateEncodeErrors::InvalidHclen(num_precode));
        }

        let mut header_cost = 5 + 5 + 4 + 3 * num_precode;
        for op in &ops {
            header_cost += usize::from(precode_lengths[op.precode_symbol()]);
            header_cost += usize::from(op.extra().0);
        }

        Ok(DynamicHeader {
            litlen: HuffmanTable::from_lengths(litlen_lengths),
            offset: HuffmanTable::from_lengths(offset_lengths),
            precode: HuffmanTable::from_lengths(precode_lengths),
            ops,
            num_litlen,
            num_offset,
            num_precode,
            header_cost
        })
    }

    /// Write HLIT, HDIST, HCLEN, the precode lengths and the run
    /// length coded table description
    pub fn emit(&self, writer: &mut BitStreamWriter) {
        writer.put_bits(5, (self.num_litlen - 257) as u64);
        writer.put_bits(5, (self.num_offset - 1) as u64);
        writer.put_bits(4, (self.num_precode - 4) as u64);

        for sym in &DEFLATE_PRECODE_LENS_PERMUTATION[..self.num_precode] {
            writer.put_bits(3, u64::from(self.precode.lengths[usize::from(*sym)]));
        }

        for op in &self.ops {
            let sym = op.precode_symbol();
            writer.put_bits(self.precode.lengths[sym], u64::from(self.precode.codes[sym]));

            let (extra_bits, extra) = op.extra();
            writer.put_bits(extra_bits, u64::from(extra));
        }
    }
}

/// Run length encode a code length sequence with the 19 symbol
/// precode alphabet
///
/// Zero runs prefer symbol 18 (11..=138 zeros), then 17 (3..=10),
/// shorter runs are spelled out. A repeated non zero length is sent
/// once, followed by symbol 16 for every full chunk of 3..=6 repeats
fn run_length_encode(lengths: &[u8]) -> Vec<RleOp> {
    let mut ops = Vec::new();
    let mut position = 0;

    while position < lengths.len() {
        let length = lengths[position];

        let mut run = 1;
        while position + run < lengths.len() && lengths[position + run] == length {
            run += 1;
        }
        position += run;

        if length == 0 {
            while run >= 11 {
                let taken = run.min(138);
                ops.push(RleOp::LongZeroRun(taken as u8));
                run -= taken;
            }
            if run >= 3 {
                ops.push(RleOp::ZeroRun(run as u8));
                run = 0;
            }
            for _ in 0..run {
                ops.push(RleOp::Literal(0));
            }
        } else {
            ops.push(RleOp::Literal(length));
            run -= 1;

            while run >= 3 {
                let taken = run.min(6);
                ops.push(RleOp::Repeat(taken as u8));
                run -= taken;
            }
            for _ in 0..run {
                ops.push(RleOp::Literal(length));
            }
        }
    }
    ops
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{run_length_encode, DynamicHeader, RleOp};

    /// expand ops back into plain lengths
    fn decode_ops(ops: &[RleOp]) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        for op in ops {
            match *op {
                RleOp::Literal(length) => out.push(length),
                RleOp::Repeat(run) => {
                    let previous = *out.last().unwrap();
                    out.extend(core::iter::repeat(previous).take(usize::from(run)));
                }
                RleOp::ZeroRun(run) | RleOp::LongZeroRun(run) => {
                    out.extend(core::iter::repeat(0).take(usize::from(run)));
                }
            }
        }
        out
    }

    #[test]
    fn test_rle_round_trips() {
        let cases: [&[u8]; 5] = [
            &[8; 20],
            &[0; 138],
            &[0; 150],
            &[5, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 7, 7, 7, 7, 7, 7, 7, 7],
            &[1, 2, 3, 0, 0, 3, 3, 3, 3]
        ];

        for lengths in cases {
            assert_eq!(decode_ops(&run_length_encode(lengths)), lengths);
        }
    }

    #[test]
    fn test_rle_prefers_long_zero_runs() {
        // 11 zeros is where symbol 18 takes over from 17
        assert_eq!(run_length_encode(&[0; 11]), [RleOp::LongZeroRun(11)]);
        assert_eq!(run_length_encode(&[0; 10]), [RleOp::ZeroRun(10)]);
        assert_eq!(run_length_encode(&[0, 0]), [RleOp::Literal(0), RleOp::Literal(0)]);
    }

    #[test]
    fn test_rle_repeat_chunks() {
        // 8 repeated 8 times: literal + repeat(6) + literal
        assert_eq!(
            run_length_encode(&[8; 8]),
            [RleOp::Literal(8), RleOp::Repeat(6), RleOp::Literal(8)]
        );
    }

    #[test]
    fn test_header_bounds() {
        let mut litlen_freqs = [0_u32; 286];
        let mut offset_freqs = [0_u32; 30];

        litlen_freqs[b'a' as usize] = 40;
        litlen_freqs[b'b' as usize] = 20;
        litlen_freqs[256] = 1;
        litlen_freqs[257] = 12;
        offset_freqs[4] = 12;

        let header = DynamicHeader::build(&litlen_freqs, &offset_freqs).unwrap();

        assert!((257..=286).contains(&header.num_litlen));
        assert!((1..=30).contains(&header.num_offset));
        assert!((4..=19).contains(&header.num_precode));
        // every used symbol has a code
        assert!(header.litlen.lengths[256] > 0);
        assert!(header.litlen.lengths[257] > 0);
        assert!(header.offset.lengths[4] > 0);
    }
}
