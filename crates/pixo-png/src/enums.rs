/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(dead_code)]
#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

/// Chunk types the encoder can emit, see
/// <https://www.w3.org/TR/2003/REC-PNG-20031110/>
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType {
    IHDR,
    PLTE,
    IDAT,
    IEND,
    tRNS
}

/// Per-row filters of the PNG filter method 0 family
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod {
    None,
    Sub,
    Up,
    Average,
    Paeth
}

impl Default for FilterMethod {
    fn default() -> Self {
        FilterMethod::None
    }
}

impl FilterMethod {
    pub fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None
        }
    }

    /// The filter type byte each scanline starts with
    pub const fn to_int(self) -> u8 {
        match self {
            FilterMethod::None => 0,
            FilterMethod::Sub => 1,
            FilterMethod::Up => 2,
            FilterMethod::Average => 3,
            FilterMethod::Paeth => 4
        }
    }
}

/// Color layouts PNG can carry, with their IHDR ids
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor {
    Luma,
    RGB,
    Palette,
    RGBA
}

impl PngColor {
    pub(crate) const fn num_components(self) -> usize {
        match self {
            PngColor::Luma | PngColor::Palette => 1,
            PngColor::RGB => 3,
            PngColor::RGBA => 4
        }
    }

    /// The color type byte IHDR carries
    pub(crate) const fn to_int(self) -> u8 {
        match self {
            PngColor::Luma => 0,
            PngColor::RGB => 2,
            PngColor::Palette => 3,
            PngColor::RGBA => 6
        }
    }
}
