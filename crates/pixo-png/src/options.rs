/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! PNG specific encoder knobs
//!
//! Everything an encode needs beyond the shared
//! [`EncoderOptions`](pixo_core::options::EncoderOptions):
//! filter selection, lossless reductions and the lossy
//! palette path.

/// How the encoder picks the filter for each scanline
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterStrategy {
    /// Always filter type 0, fastest, biggest files
    None,
    /// Always the Sub filter
    Sub,
    /// Always the Up filter
    Up,
    /// Always the Average filter
    Average,
    /// Always the Paeth filter
    Paeth,
    /// Evaluate all five filters per row and keep the one with the
    /// smallest signed magnitude sum
    MinSum,
    /// The per-row minimum sum search, the name the presets use
    Adaptive,
    /// Minimum sum restricted to the cheap candidates
    /// (None, Sub, Up)
    AdaptiveFast
}

/// Options respected by the png encoder only
///
/// The default matches the `balanced` preset, see
/// [`EncodePreset`]
#[derive(Copy, Clone, Debug)]
pub struct PngOptions {
    pub(crate) filter_strategy:   FilterStrategy,
    pub(crate) reduce_color_type: bool,
    pub(crate) optimize_alpha:    bool,
    pub(crate) optimal_deflate:   bool,
    pub(crate) max_colors:        usize,
    pub(crate) dithering:         bool
}

impl Default for PngOptions {
    fn default() -> Self {
        PngOptions {
            filter_strategy:   FilterStrategy::Adaptive,
            reduce_color_type: true,
            optimize_alpha:    true,
            optimal_deflate:   false,
            max_colors:        0,
            dithering:         false
        }
    }
}

impl PngOptions {
    /// Set how row filters are chosen
    pub fn set_filter_strategy(mut self, strategy: FilterStrategy) -> Self {
        self.filter_strategy = strategy;
        self
    }
    /// The configured filter strategy
    pub const fn filter_strategy(&self) -> FilterStrategy {
        self.filter_strategy
    }

    /// Set whether the encoder may losslessly down-convert the color
    /// type, fully opaque RGBA becomes RGB and gray RGB becomes
    /// grayscale
    pub fn set_reduce_color_type(mut self, yes: bool) -> Self {
        self.reduce_color_type = yes;
        self
    }
    /// Whether lossless color type reduction is enabled
    pub const fn reduce_color_type(&self) -> bool {
        self.reduce_color_type
    }

    /// Set whether fully transparent pixels have their color bytes
    /// zeroed
    ///
    /// Rendering is unchanged, the filtered stream compresses better
    pub fn set_optimize_alpha(mut self, yes: bool) -> Self {
        self.optimize_alpha = yes;
        self
    }
    /// Whether alpha cleanup is enabled
    pub const fn optimize_alpha(&self) -> bool {
        self.optimize_alpha
    }

    /// Set whether the compressor runs extra passes and keeps the
    /// smallest stream
    pub fn set_optimal_deflate(mut self, yes: bool) -> Self {
        self.optimal_deflate = yes;
        self
    }
    /// Whether multi-pass compression is enabled
    pub const fn optimal_deflate(&self) -> bool {
        self.optimal_deflate
    }

    /// Quantize the image down to at most `max_colors` palette
    /// entries and emit an indexed PNG
    ///
    /// Zero, the default, keeps the encode lossless. Values are
    /// clamped into 2..=256 when quantization runs
    pub fn set_max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }
    /// The configured palette budget, zero meaning no quantization
    pub const fn max_colors(&self) -> usize {
        self.max_colors
    }

    /// Set whether quantization diffuses its error with
    /// Floyd-Steinberg dithering
    ///
    /// Only meaningful together with [`set_max_colors`](Self::set_max_colors)
    pub fn set_dithering(mut self, yes: bool) -> Self {
        self.dithering = yes;
        self
    }
    /// Whether dithering is enabled
    pub const fn dithering(&self) -> bool {
        self.dithering
    }
}

/// Bundled speed/size trade-offs
///
/// A preset decides the png options and the DEFLATE effort in one
/// go, see [`PngEncoder::new_with_preset`](crate::PngEncoder::new_with_preset)
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EncodePreset {
    /// Light compression, no pixel rewrites, for when encode time
    /// dominates
    Fast,
    /// The middle ground, lossless reductions plus a reasonable
    /// compression effort
    Balanced,
    /// Every lossless trick plus multi-pass compression, for when
    /// only size matters
    MaxCompression
}

impl EncodePreset {
    /// The DEFLATE effort this preset pairs with
    pub const fn effort(self) -> u8 {
        match self {
            EncodePreset::Fast => 2,
            EncodePreset::Balanced => 6,
            EncodePreset::MaxCompression => 9
        }
    }

    /// The png options this preset stands for
    pub fn png_options(self) -> PngOptions {
        match self {
            EncodePreset::Fast => PngOptions {
                filter_strategy:   FilterStrategy::MinSum,
                reduce_color_type: false,
                optimize_alpha:    false,
                optimal_deflate:   false,
                max_colors:        0,
                dithering:         false
            },
            EncodePreset::Balanced => PngOptions::default(),
            EncodePreset::MaxCompression => PngOptions {
                filter_strategy:   FilterStrategy::MinSum,
                reduce_color_type: true,
                optimize_alpha:    true,
                optimal_deflate:   true,
                max_colors:        0,
                dithering:         false
            }
        }
    }
}
