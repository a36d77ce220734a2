/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::bit_depth::BitDepth;
use crate::colorspace::ColorSpace;

/// Encoder options that are flags
#[derive(Copy, Debug, Clone)]
struct EncoderFlags {
    /// Whether to not preserve metadata across image transformations
    image_strip_metadata: bool
}

impl Default for EncoderFlags {
    fn default() -> Self {
        EncoderFlags {
            image_strip_metadata: false
        }
    }
}

/// Options shared by the encoders in
/// the `pixo` family of image crates
///
/// Prefer building this with [`new`](Self::new) and the
/// `set_*` builder methods over filling fields by hand,
/// encoders read the options through the getters.
#[derive(Debug, Copy, Clone)]
pub struct EncoderOptions {
    width:      usize,
    height:     usize,
    colorspace: ColorSpace,
    depth:      BitDepth,
    effort:     u8,
    flags:      EncoderFlags
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            width:      0,
            height:     0,
            colorspace: ColorSpace::RGB,
            depth:      BitDepth::Eight,
            effort:     6,
            flags:      EncoderFlags::default()
        }
    }
}

impl EncoderOptions {
    /// Create new encode options
    ///
    /// # Arguments
    ///
    /// * `width`: Image width
    /// * `height`: Image height
    /// * `colorspace`: Image colorspace
    /// * `depth`: Image depth
    ///
    /// returns: `EncoderOptions`
    pub fn new(
        width: usize, height: usize, colorspace: ColorSpace, depth: BitDepth
    ) -> EncoderOptions {
        EncoderOptions {
            width,
            height,
            colorspace,
            depth,
            ..Default::default()
        }
    }
    /// Get the width for which the image will be encoded in
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Get height for which the image will be encoded in
    pub const fn height(&self) -> usize {
        self.height
    }
    /// Get the depth for which the image will be encoded in
    pub const fn depth(&self) -> BitDepth {
        self.depth
    }
    /// Get the colorspace for which the image will be encoded in
    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }
    /// Get the effort for which the image will be encoded with
    ///
    /// - Higher effort means more time is spent in making the
    ///   file smaller
    /// - Lower effort means less time is spent, at the cost of
    ///   bigger files
    pub const fn effort(&self) -> u8 {
        self.effort
    }

    /// Set width for the image to be encoded
    pub fn set_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Set height for the image to be encoded
    pub fn set_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
    /// Set depth for the image to be encoded
    pub fn set_depth(mut self, depth: BitDepth) -> Self {
        self.depth = depth;
        self
    }
    /// Set colorspace for the image to be encoded
    pub fn set_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }
    /// Set effort of the image to be encoded
    ///
    /// Effort means different things depending on the encoder,
    /// see [effort](Self::effort)
    pub fn set_effort(mut self, effort: u8) -> Self {
        self.effort = effort;
        self
    }

    /// Set whether the encoder should remove metadata from the image
    ///
    /// When set to `true`, supported encoders will strip away metadata
    /// from the resulting image. If set to false, where supported, encoders
    /// will not remove metadata from images
    pub fn set_strip_metadata(mut self, yes: bool) -> Self {
        self.flags.image_strip_metadata = yes;
        self
    }
    /// Whether the encoder should remove metadata from the image
    pub const fn strip_metadata(&self) -> bool {
        self.flags.image_strip_metadata
    }
}
