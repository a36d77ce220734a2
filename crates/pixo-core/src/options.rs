/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Encoder options
//!
//! This module exposes a struct for which all implemented
//! encoders get shared options for encoding
//!
//! All supported options are put into one `EncoderOptions` to allow for
//! global configuration, i.e the same `EncoderOptions` can be reused
//! for all other encoders
pub use encoder::EncoderOptions;

mod encoder;
