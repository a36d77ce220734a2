/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Formatter};

use pixo_core::bit_depth::BitDepth;
use pixo_core::bytestream::ZByteIoError;
use pixo_core::colorspace::ColorSpace;
use pixo_deflate::errors::DeflateEncodeErrors;

/// Colorspaces the png encoder accepts as input
pub const SUPPORTED_COLORSPACES: [ColorSpace; 3] =
    [ColorSpace::Luma, ColorSpace::RGB, ColorSpace::RGBA];

/// Errors that may arise during encoding
pub enum PngEncodeErrors {
    /// Width or height is zero
    ZeroDimension(&'static str),
    /// A width or height too big for PNG's 31 bit fields
    TooLargeDimensions(usize),
    /// Mismatch between the buffer the pixels should fill and what
    /// was given
    LengthMismatch(usize, usize),
    /// The input colorspace isn't one the encoder understands
    UnsupportedColorspace(ColorSpace),
    /// The input depth isn't supported
    UnsupportedDepth(BitDepth),
    /// A malformed PLTE or tRNS payload
    InvalidChunkData(&'static str),
    /// The compressor reported a failure
    DeflateEncodeErrors(DeflateEncodeErrors),
    /// The output sink reported a failure
    IoErrors(ZByteIoError),
    /// Generic error
    Generic(&'static str)
}

impl Debug for PngEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroDimension(param) => writeln!(f, "The {param} is zero"),
            Self::TooLargeDimensions(value) => {
                writeln!(f, "Dimension {value} greater than the PNG maximum of 2^31 - 1")
            }
            Self::LengthMismatch(expected, found) => {
                writeln!(f, "Expected pixel buffer of length {expected} but found {found}")
            }
            Self::UnsupportedColorspace(color) => writeln!(
                f,
                "PNG encoder cannot encode images in colorspace {color:?}, supported ones are {:?}",
                SUPPORTED_COLORSPACES
            ),
            Self::UnsupportedDepth(depth) => {
                writeln!(f, "PNG encoder cannot encode images of depth {depth:?}, only eight bit input is supported")
            }
            Self::InvalidChunkData(reason) => writeln!(f, "Invalid chunk data: {reason}"),
            Self::DeflateEncodeErrors(err) => writeln!(f, "Error compressing idat chunks {err:?}"),
            Self::IoErrors(err) => writeln!(f, "I/O error {err:?}"),
            Self::Generic(reason) => writeln!(f, "{reason}")
        }
    }
}

impl From<&'static str> for PngEncodeErrors {
    fn from(val: &'static str) -> Self {
        Self::Generic(val)
    }
}

impl From<DeflateEncodeErrors> for PngEncodeErrors {
    fn from(val: DeflateEncodeErrors) -> Self {
        Self::DeflateEncodeErrors(val)
    }
}

impl From<ZByteIoError> for PngEncodeErrors {
    fn from(val: ZByteIoError) -> Self {
        Self::IoErrors(val)
    }
}
