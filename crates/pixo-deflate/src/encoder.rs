/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The DEFLATE encoder proper
//!
//! Input is tokenized once per pass, the token stream is cut into
//! blocks, and every block is emitted in whichever of the three
//! RFC 1951 block formats costs the fewest bits. Offsets are measured
//! against the whole stream, a match may reach back across block
//! boundaries into anything inside the window.

use alloc::vec::Vec;

use crate::bitstream::BitStreamWriter;
use crate::constants::{
    fixed_litlen_lengths, fixed_offset_lengths, length_to_symbol, offset_to_symbol,
    DEFLATE_BLOCKTYPE_DYNAMIC, DEFLATE_BLOCKTYPE_STATIC, DEFLATE_BLOCKTYPE_UNCOMPRESSED,
    DEFLATE_END_OF_BLOCK, DEFLATE_MAX_STORED_BLOCK_SIZE, DEFLATE_MAX_WINDOW_SIZE
};
use crate::dynamic::DynamicHeader;
use crate::errors::DeflateEncodeErrors;
use crate::huffman::HuffmanTable;
use crate::lz77::{MatchFinder, Token};
use crate::utils::calc_adler_hash;

/// Input bytes covered by one block before the encoder re-evaluates
/// its tables
const BLOCK_INPUT_LIMIT: usize = 1 << 16;

/// Deepest chain walk a multi-pass encode will attempt
const MAX_CHAIN_CAP: usize = 4096;

/// Configuration for [`DeflateEncoder`]
#[derive(Debug, Copy, Clone)]
pub struct DeflateEncoderOptions {
    level:       u8,
    window_size: usize,
    multi_pass:  bool
}

impl Default for DeflateEncoderOptions {
    fn default() -> Self {
        DeflateEncoderOptions {
            level:       6,
            window_size: DEFLATE_MAX_WINDOW_SIZE,
            multi_pass:  false
        }
    }
}

impl DeflateEncoderOptions {
    /// Set the compression level
    ///
    /// Levels run from 1 (fastest) to 9 (smallest output) and
    /// scale how hard the match finder works
    pub fn set_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }
    /// The configured compression level
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Set the window size, a power of two between 256 and 32768
    ///
    /// Smaller windows reduce how far back matches can reach, the
    /// zlib header advertises the configured size to decoders
    pub fn set_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }
    /// The configured window size
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// When set, the encoder runs additional passes with deeper
    /// match searches and keeps the smallest result
    pub fn set_multi_pass(mut self, yes: bool) -> Self {
        self.multi_pass = yes;
        self
    }
    /// Whether multi-pass encoding is enabled
    pub const fn multi_pass(&self) -> bool {
        self.multi_pass
    }

    /// Hash chain walk budget for the configured level,
    /// level 1 gives 4, level 9 gives 1024
    ///
    /// Clamped so this is safe to call before validation ran
    const fn max_chain_len(&self) -> usize {
        let level = if self.level == 0 {
            1
        } else if self.level > 9 {
            9
        } else {
            self.level
        };
        1 << (level + 1)
    }

    fn validate(&self) -> Result<(), DeflateEncodeErrors> {
        if !(1..=9).contains(&self.level) {
            return Err(DeflateEncodeErrors::InvalidCompressionLevel(self.level));
        }
        if !self.window_size.is_power_of_two()
            || !(256..=DEFLATE_MAX_WINDOW_SIZE).contains(&self.window_size)
        {
            return Err(DeflateEncodeErrors::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }
}

/// A DEFLATE and zlib compressor
///
/// The encoder owns its scratch state (hash chains, token buffer, bit
/// buffer), all of it is reset at the start of every encode, so one
/// instance can be reused across inputs. Sharing an instance across
/// threads is not supported, use one per thread.
pub struct DeflateEncoder<'a> {
    data:         &'a [u8],
    options:      DeflateEncoderOptions,
    match_finder: MatchFinder,
    bit_writer:   BitStreamWriter,
    tokens:       Vec<Token>
}

impl<'a> DeflateEncoder<'a> {
    /// Create a new encoder for `data` with default options
    pub fn new(data: &'a [u8]) -> DeflateEncoder<'a> {
        DeflateEncoder::new_with_options(data, DeflateEncoderOptions::default())
    }

    /// Create a new encoder for `data` with the given options
    pub fn new_with_options(data: &'a [u8], options: DeflateEncoderOptions) -> DeflateEncoder<'a> {
        DeflateEncoder {
            data,
            options,
            match_finder: MatchFinder::new(options.window_size, options.max_chain_len()),
            bit_writer: BitStreamWriter::new(),
            tokens: Vec::new()
        }
    }

    /// Point the encoder at a new input, scratch state is kept
    /// and reset on the next encode
    pub fn reset(&mut self, data: &'a [u8]) {
        self.data = data;
    }

    /// Compress to a bare DEFLATE stream, RFC 1951
    pub fn encode_raw(&mut self) -> Result<Vec<u8>, DeflateEncodeErrors> {
        self.options.validate()?;

        if !self.options.multi_pass {
            return self.encode_pass(self.options.max_chain_len());
        }

        // same greedy parse, deeper candidate searches, keep whatever
        // came out smallest
        let base = self.options.max_chain_len();
        let chains = [
            base,
            (base * 4).min(MAX_CHAIN_CAP),
            (base * 16).min(MAX_CHAIN_CAP)
        ];

        let mut best: Option<Vec<u8>> = None;
        let mut previous = 0;

        for chain in chains {
            if chain == previous {
                continue;
            }
            previous = chain;

            let pass = self.encode_pass(chain)?;
            if best.as_ref().map_or(true, |b| pass.len() < b.len()) {
                best = Some(pass);
            }
        }
        Ok(best.unwrap())
    }

    /// Compress to a zlib stream, RFC 1950
    ///
    /// Two byte header, DEFLATE data, big endian Adler-32 of the
    /// uncompressed input
    pub fn encode_zlib(&mut self) -> Result<Vec<u8>, DeflateEncodeErrors> {
        self.options.validate()?;

        const ZLIB_CM_DEFLATE: u16 = 8;

        let cinfo = self.options.window_size.trailing_zeros() as u16 - 8;
        let flevel: u16 = match self.options.level {
            1 => 0,
            2..=5 => 1,
            6 => 2,
            _ => 3
        };

        let mut hdr = (ZLIB_CM_DEFLATE << 8) | (cinfo << 12) | (flevel << 6);
        // FCHECK makes the whole header divisible by 31
        let rem = hdr % 31;
        if rem != 0 {
            hdr += 31 - rem;
        }

        let deflate_stream = self.encode_raw()?;

        let mut output = Vec::with_capacity(deflate_stream.len() + 6);
        output.extend_from_slice(&hdr.to_be_bytes());
        output.extend_from_slice(&deflate_stream);
        output.extend_from_slice(&calc_adler_hash(self.data).to_be_bytes());

        Ok(output)
    }

    /// One full tokenize-and-emit pass over the input
    fn encode_pass(&mut self, chain_len: usize) -> Result<Vec<u8>, DeflateEncodeErrors> {
        let data = self.data;

        self.match_finder.set_max_chain_len(chain_len);
        self.bit_writer.reset();

        let mut tokens = core::mem::take(&mut self.tokens);
        self.match_finder.tokenize(data, &mut tokens);

        let fixed_litlen = HuffmanTable::from_lengths(fixed_litlen_lengths());
        let fixed_offset = HuffmanTable::from_lengths(fixed_offset_lengths());

        let blocks = split_blocks(&tokens);
        let last_block = blocks.len() - 1;

        for (i, (token_range, input_range)) in blocks.into_iter().enumerate() {
            self.write_block(
                &tokens[token_range],
                input_range,
                i == last_block,
                &fixed_litlen,
                &fixed_offset
            )?;
        }

        self.tokens = tokens;
        Ok(self.bit_writer.take())
    }

    /// Emit one block in whichever format encodes it smallest
    fn write_block(
        &mut self, tokens: &[Token], input_range: core::ops::Range<usize>, bfinal: bool,
        fixed_litlen: &HuffmanTable, fixed_offset: &HuffmanTable
    ) -> Result<(), DeflateEncodeErrors> {
        let data = self.data;
        let input = &data[input_range];

        let mut litlen_freqs = [0_u32; 286];
        let mut offset_freqs = [0_u32; 30];

        for token in tokens {
            match *token {
                Token::Literal(byte) => litlen_freqs[usize::from(byte)] += 1,
                Token::Match { length, offset } => {
                    litlen_freqs[usize::from(length_to_symbol(length).0)] += 1;
                    offset_freqs[usize::from(offset_to_symbol(offset).0)] += 1;
                }
            }
        }
        litlen_freqs[DEFLATE_END_OF_BLOCK] += 1;

        let header = DynamicHeader::build(&litlen_freqs, &offset_freqs)?;

        let dynamic_cost =
            3 + header.header_cost + token_cost(tokens, &header.litlen, &header.offset);
        let fixed_cost = 3 + token_cost(tokens, fixed_litlen, fixed_offset);
        let stored_cost = stored_block_cost(input.len());

        if stored_cost < fixed_cost && stored_cost < dynamic_cost {
            self.write_stored_block(input, bfinal)
        } else if fixed_cost <= dynamic_cost {
            self.bit_writer.put_bits(1, u64::from(bfinal));
            self.bit_writer.put_bits(2, DEFLATE_BLOCKTYPE_STATIC);
            self.write_tokens(tokens, fixed_litlen, fixed_offset)
        } else {
            self.bit_writer.put_bits(1, u64::from(bfinal));
            self.bit_writer.put_bits(2, DEFLATE_BLOCKTYPE_DYNAMIC);
            header.emit(&mut self.bit_writer);
            self.write_tokens(tokens, &header.litlen, &header.offset)
        }
    }

    /// Emit the token stream followed by the end of block symbol
    fn write_tokens(
        &mut self, tokens: &[Token], litlen: &HuffmanTable, offset_table: &HuffmanTable
    ) -> Result<(), DeflateEncodeErrors> {
        let writer = &mut self.bit_writer;

        for token in tokens {
            match *token {
                Token::Literal(byte) => {
                    write_symbol(writer, litlen, u16::from(byte))?;
                }
                Token::Match { length, offset } => {
                    if !(3..=258).contains(&length) {
                        return Err(DeflateEncodeErrors::InvalidLength(length));
                    }
                    if offset == 0 || usize::from(offset) > self.options.window_size {
                        return Err(DeflateEncodeErrors::InvalidOffset(offset));
                    }

                    let (sym, extra_bits, extra) = length_to_symbol(length);
                    write_symbol(writer, litlen, sym)?;
                    writer.put_bits(extra_bits, u64::from(extra));

                    let (sym, extra_bits, extra) = offset_to_symbol(offset);
                    write_symbol(writer, offset_table, sym)?;
                    writer.put_bits(extra_bits, u64::from(extra));
                }
            }
        }
        write_symbol(writer, litlen, DEFLATE_END_OF_BLOCK as u16)
    }

    /// Emit `input` as stored data, split into chunks a stored
    /// block can carry
    fn write_stored_block(
        &mut self, input: &[u8], bfinal: bool
    ) -> Result<(), DeflateEncodeErrors> {
        if input.is_empty() {
            return write_stored_chunk(&mut self.bit_writer, input, bfinal);
        }

        let num_chunks = input.len().div_ceil(DEFLATE_MAX_STORED_BLOCK_SIZE);

        for (i, chunk) in input.chunks(DEFLATE_MAX_STORED_BLOCK_SIZE).enumerate() {
            write_stored_chunk(&mut self.bit_writer, chunk, bfinal && i + 1 == num_chunks)?;
        }
        Ok(())
    }
}

/// Write one stored block: header, byte alignment, LEN, one's
/// complement of LEN, then the raw bytes
fn write_stored_chunk(
    writer: &mut BitStreamWriter, chunk: &[u8], bfinal: bool
) -> Result<(), DeflateEncodeErrors> {
    if chunk.len() > DEFLATE_MAX_STORED_BLOCK_SIZE {
        return Err(DeflateEncodeErrors::InvalidBlockSize(chunk.len()));
    }
    writer.put_bits(1, u64::from(bfinal));
    writer.put_bits(2, DEFLATE_BLOCKTYPE_UNCOMPRESSED);
    writer.zero_pad();

    let len = chunk.len() as u16;
    writer.put_bytes(&len.to_le_bytes());
    writer.put_bytes(&(!len).to_le_bytes());
    writer.put_bytes(chunk);
    Ok(())
}

/// Write one codeword, erroring out if the table holds no code
/// for the symbol
#[inline]
fn write_symbol(
    writer: &mut BitStreamWriter, table: &HuffmanTable, sym: u16
) -> Result<(), DeflateEncodeErrors> {
    let length = table.lengths[usize::from(sym)];

    if length == 0 {
        return Err(DeflateEncodeErrors::InvalidSymbol(sym));
    }
    writer.put_bits(length, u64::from(table.codes[usize::from(sym)]));
    Ok(())
}

/// Exact bit cost of coding `tokens` plus the end of block symbol
/// with the given tables
fn token_cost(tokens: &[Token], litlen: &HuffmanTable, offset_table: &HuffmanTable) -> usize {
    let mut cost = usize::from(litlen.lengths[DEFLATE_END_OF_BLOCK]);

    for token in tokens {
        match *token {
            Token::Literal(byte) => cost += usize::from(litlen.lengths[usize::from(byte)]),
            Token::Match { length, offset } => {
                let (sym, extra_bits, _) = length_to_symbol(length);
                cost += usize::from(litlen.lengths[usize::from(sym)]) + usize::from(extra_bits);

                let (sym, extra_bits, _) = offset_to_symbol(offset);
                cost +=
                    usize::from(offset_table.lengths[usize::from(sym)]) + usize::from(extra_bits);
            }
        }
    }
    cost
}

/// Worst case bit cost of storing `len` raw bytes, alignment padding
/// included
fn stored_block_cost(len: usize) -> usize {
    let num_chunks = len.div_ceil(DEFLATE_MAX_STORED_BLOCK_SIZE).max(1);
    // 3 bit header, up to 7 pad bits, LEN and NLEN, per chunk
    num_chunks * (3 + 7 + 32) + len * 8
}

/// Cut the token stream where its input coverage crosses the block
/// limit, returning token and input byte ranges per block
///
/// An empty stream still yields one empty block, a valid DEFLATE
/// stream has at least one
fn split_blocks(tokens: &[Token]) -> Vec<(core::ops::Range<usize>, core::ops::Range<usize>)> {
    let mut blocks = Vec::new();

    let mut token_start = 0;
    let mut input_start = 0;
    let mut covered = 0;

    for (i, token) in tokens.iter().enumerate() {
        covered += match token {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => usize::from(*length)
        };

        if covered - input_start >= BLOCK_INPUT_LIMIT {
            blocks.push((token_start..i + 1, input_start..covered));
            token_start = i + 1;
            input_start = covered;
        }
    }

    if token_start < tokens.len() || blocks.is_empty() {
        blocks.push((token_start..tokens.len(), input_start..covered));
    }
    blocks
}
