/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A DEFLATE and zlib compressor
//!
//! This crate implements the compression side of RFC 1951 (DEFLATE)
//! and RFC 1950 (zlib) in pure safe Rust
//!
//! # Features
//! - Greedy LZ77 with a hash chain match finder over a 32 KiB window
//! - Stored, fixed and dynamic Huffman blocks, the smallest encoding
//!   is chosen per block
//! - Length limited canonical Huffman codes built with package merge
//! - A streaming Adler-32 implementation for the zlib trailer
//!
//! # Usage
//!
//! ```
//! use pixo_deflate::DeflateEncoder;
//!
//! let data = b"Hello, hello, hello";
//! let compressed = DeflateEncoder::new(data).encode_zlib().unwrap();
//! ```
//!
//! Compression effort can be configured via [`DeflateEncoderOptions`]
//!
//! ```
//! use pixo_deflate::{DeflateEncoder, DeflateEncoderOptions};
//!
//! let options = DeflateEncoderOptions::default().set_level(9);
//! let compressed = DeflateEncoder::new_with_options(b"abcabcabc", options)
//!     .encode_zlib()
//!     .unwrap();
//! ```
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use crate::encoder::{DeflateEncoder, DeflateEncoderOptions};
pub use crate::utils::{calc_adler_hash, Adler32};

mod bitstream;
mod constants;
mod dynamic;
mod encoder;
pub mod errors;
mod huffman;
mod lz77;
mod utils;
