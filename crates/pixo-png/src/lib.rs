/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A png encoder
//!
//! This features a PNG writer in Rust which produces valid
//! ISO/IEC 15948:2003 (E) PNG images from raw pixel buffers,
//! the compressed stream comes from our own DEFLATE
//! implementation in `pixo-deflate`
//!
//! # Features
//! - Per row filter selection with the minimum sum heuristic
//! - Lossless color type reduction and alpha cleanup
//! - Optional palette quantization via median cut, with
//!   Floyd-Steinberg dithering
//! - Configurable DEFLATE effort, including a multi-pass mode
//!
//! # Usage
//! Add the library to `Cargo.toml`
//!
//! ```toml
//! pixo-png = "0.1"
//! ```
//!
//! #### Encode raw bytes
//!
//! ```
//! use pixo_core::bit_depth::BitDepth;
//! use pixo_core::colorspace::ColorSpace;
//! use pixo_core::options::EncoderOptions;
//! use pixo_png::PngEncoder;
//!
//! // a 2x2 RGB image
//! let pixels = [
//!     255, 0, 0, /**/ 0, 255, 0, //
//!     0, 0, 255, /**/ 255, 255, 0,
//! ];
//! let options = EncoderOptions::new(2, 2, ColorSpace::RGB, BitDepth::Eight);
//!
//! let mut sink = vec![];
//! PngEncoder::new(&pixels, options).encode(&mut sink).unwrap();
//! ```
//!
//! The encoder only ever writes the chunks a viewer strictly needs,
//! `IHDR`, `PLTE` and `tRNS` for indexed images, `IDAT` and `IEND`.
//! Interlaced output and bit depths other than eight are out of
//! scope, inputs are validated against that.
//!
//! # Presets
//!
//! [`EncodePreset`] bundles the usual speed/size trade-offs, see
//! [`PngEncoder::new_with_preset`]
//!
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub use encoder::PngEncoder;
pub use error::PngEncodeErrors;
pub use options::{EncodePreset, FilterStrategy, PngOptions};
pub use pixo_core;

mod constants;
mod crc;
mod encoder;
mod enums;
pub mod error;
mod filters;
mod headers;
mod options;
mod palette;
mod transforms;
