/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image colorspace information and manipulation utilities.

/// All possible colorspaces that the
/// encoders can work with
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ColorSpace {
    /// Red, Green, Blue
    RGB,
    /// Red, Green, Blue, Alpha
    RGBA,
    /// Grayscale colorspace
    Luma,
    /// Grayscale with alpha colorspace
    LumaA,
    /// Indexed colorspace, samples are indices
    /// into a color palette
    Indexed,
    /// The colorspace is unknown
    Unknown
}

impl ColorSpace {
    /// Number of color channels present for a given colorspace
    pub const fn num_components(&self) -> usize {
        match self {
            Self::RGB => 3,
            Self::RGBA => 4,
            Self::Luma | Self::Indexed => 1,
            Self::LumaA => 2,
            Self::Unknown => 0
        }
    }

    /// Returns true if the colorspace contains an alpha channel
    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::RGBA | Self::LumaA)
    }

    /// Returns true if the colorspace is grayscale
    pub const fn is_grayscale(&self) -> bool {
        matches!(self, Self::LumaA | Self::Luma)
    }
}

/// Encapsulates all colorspaces supported by
/// the library
pub static ALL_COLORSPACES: [ColorSpace; 5] = [
    ColorSpace::RGB,
    ColorSpace::RGBA,
    ColorSpace::Luma,
    ColorSpace::LumaA,
    ColorSpace::Indexed,
];
