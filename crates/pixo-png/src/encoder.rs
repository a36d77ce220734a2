/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;

use log::trace;
use pixo_core::bit_depth::BitDepth;
use pixo_core::bytestream::{ZByteWriterTrait, ZWriter};
use pixo_core::colorspace::ColorSpace;
use pixo_core::options::EncoderOptions;
use pixo_deflate::{DeflateEncoder, DeflateEncoderOptions};

use crate::constants::{IDAT_CHUNK_SIZE, MAX_DIMENSION, PNG_SIGNATURE};
use crate::enums::{PngChunkType, PngColor};
use crate::error::PngEncodeErrors;
use crate::filters::{choose_compression_filter, filter_scanline};
use crate::headers::{
    write_chunk, write_header_fn, write_iend, write_ihdr, write_plte, write_trns, PngChunk
};
use crate::options::{EncodePreset, PngOptions};
use crate::palette::{has_transparency, quantize, PaletteEntry};
use crate::transforms::{
    can_reduce_to_rgb, is_grayscale, optimize_alpha, reduce_to_grayscale, reduce_to_rgb
};

/// A PNG encoder
///
/// Takes a raw pixel buffer (grayscale, RGB or RGBA, eight bits per
/// sample, rows top to bottom with no padding) and writes a complete
/// PNG file to any sink implementing
/// [`ZByteWriterTrait`](pixo_core::bytestream::ZByteWriterTrait)
///
/// # Example
/// - Encode a 100 by 100 RGB image
///
/// ```
/// use pixo_core::bit_depth::BitDepth;
/// use pixo_core::colorspace::ColorSpace;
/// use pixo_core::options::EncoderOptions;
/// use pixo_png::PngEncoder;
/// use pixo_png::PngEncodeErrors;
///
/// const W: usize = 100;
/// const H: usize = 100;
///
/// fn main() -> Result<(), PngEncodeErrors> {
///     let pixels = std::array::from_fn::<u8, { W * H * 3 }, _>(|i| (i % 256) as u8);
///     let options = EncoderOptions::new(W, H, ColorSpace::RGB, BitDepth::Eight);
///
///     let mut sink = vec![];
///     let mut encoder = PngEncoder::new(&pixels, options);
///     encoder.encode(&mut sink)?;
///     Ok(())
/// }
/// ```
pub struct PngEncoder<'a> {
    pub(crate) options:     EncoderOptions,
    pub(crate) png_options: PngOptions,
    pub(crate) data:        &'a [u8],
    /// Output color type, decided once reductions and
    /// quantization ran
    pub(crate) color:       PngColor,
    /// Palette entries when encoding indexed color
    pub(crate) palette:     Vec<PaletteEntry>,

    pub(crate) encoded_chunks:  Vec<u8>,
    pub(crate) filter_scanline: Vec<u8>
}

impl<'a> PngEncoder<'a> {
    /// Create a new encoder that encodes `data` into a PNG file
    ///
    /// PNG specific behavior keeps its defaults, see
    /// [`new_with_options`](Self::new_with_options)
    pub fn new(data: &'a [u8], options: EncoderOptions) -> PngEncoder<'a> {
        PngEncoder::new_with_options(data, options, PngOptions::default())
    }

    /// Create a new encoder with explicit png options
    pub fn new_with_options(
        data: &'a [u8], options: EncoderOptions, png_options: PngOptions
    ) -> PngEncoder<'a> {
        PngEncoder {
            options,
            png_options,
            data,
            color: PngColor::RGB,
            palette: Vec::new(),
            encoded_chunks: Vec::new(),
            filter_scanline: Vec::new()
        }
    }

    /// Create a new encoder from a preset
    ///
    /// The preset decides the compression effort, the filter
    /// strategy and which pixel rewrites run, any effort already
    /// set on `options` is overridden
    pub fn new_with_preset(
        data: &'a [u8], options: EncoderOptions, preset: EncodePreset
    ) -> PngEncoder<'a> {
        let mut options = options.set_effort(preset.effort());

        if !matches!(preset, EncodePreset::Fast) {
            options = options.set_strip_metadata(true);
        }
        PngEncoder::new_with_options(data, options, preset.png_options())
    }

    /// Encode the image, writing the complete file into `sink`
    ///
    /// # Returns
    /// - `Ok(size)`: number of bytes written
    /// - `Err`: the first error encountered, anything already
    ///   written to the sink stays written
    pub fn encode<T: ZByteWriterTrait>(&mut self, sink: T) -> Result<usize, PngEncodeErrors> {
        self.sanity_checks()?;

        let (pixels, components) = self.prepare_pixels();

        self.add_filters(&pixels, components);
        self.compress_filtered()?;

        let mut writer = ZWriter::new(sink);

        self.encode_headers(&mut writer)?;
        self.write_idat_chunks(&mut writer)?;
        write_header_fn(self, &mut writer, b"IEND", write_iend)?;

        Ok(writer.bytes_written())
    }

    /// Write the signature, IHDR, and, for indexed output, PLTE
    /// and tRNS
    pub(crate) fn encode_headers<T: ZByteWriterTrait>(
        &self, writer: &mut ZWriter<T>
    ) -> Result<(), PngEncodeErrors> {
        writer.write_u64_be_err(PNG_SIGNATURE)?;

        write_header_fn(self, writer, b"IHDR", write_ihdr)?;

        if self.color == PngColor::Palette {
            if self.palette.is_empty() || self.palette.len() > 256 {
                return Err(PngEncodeErrors::InvalidChunkData(
                    "palette must hold between 1 and 256 entries"
                ));
            }
            write_header_fn(self, writer, b"PLTE", write_plte)?;

            // fully opaque palettes don't need a tRNS chunk
            if has_transparency(&self.palette) {
                write_header_fn(self, writer, b"tRNS", write_trns)?;
            }
        }
        Ok(())
    }

    fn sanity_checks(&self) -> Result<(), PngEncodeErrors> {
        let options = &self.options;

        if options.width() == 0 {
            return Err(PngEncodeErrors::ZeroDimension("width"));
        }
        if options.height() == 0 {
            return Err(PngEncodeErrors::ZeroDimension("height"));
        }
        if options.width() > MAX_DIMENSION {
            return Err(PngEncodeErrors::TooLargeDimensions(options.width()));
        }
        if options.height() > MAX_DIMENSION {
            return Err(PngEncodeErrors::TooLargeDimensions(options.height()));
        }
        if options.depth() != BitDepth::Eight {
            return Err(PngEncodeErrors::UnsupportedDepth(options.depth()));
        }
        if !matches!(
            options.colorspace(),
            ColorSpace::Luma | ColorSpace::RGB | ColorSpace::RGBA
        ) {
            return Err(PngEncodeErrors::UnsupportedColorspace(options.colorspace()));
        }

        let expected_size = options
            .width()
            .checked_mul(options.height())
            .and_then(|px| px.checked_mul(options.colorspace().num_components()))
            .ok_or(PngEncodeErrors::TooLargeDimensions(options.width()))?;

        if self.data.len() != expected_size {
            return Err(PngEncodeErrors::LengthMismatch(expected_size, self.data.len()));
        }
        Ok(())
    }

    /// Run quantization or the lossless rewrites, returning the
    /// pixels the filter stage will see and their bytes per pixel
    ///
    /// Sets `self.color` and, for indexed output, `self.palette`
    fn prepare_pixels(&mut self) -> (Cow<'a, [u8]>, usize) {
        let png_options = &self.png_options;

        let mut pixels: Cow<'a, [u8]> = Cow::Borrowed(self.data);
        let mut color = match self.options.colorspace() {
            ColorSpace::Luma => PngColor::Luma,
            ColorSpace::RGB => PngColor::RGB,
            ColorSpace::RGBA => PngColor::RGBA,
            _ => unreachable!()
        };

        // quantization only applies to color input, anything else
        // silently keeps the lossless path
        if png_options.max_colors > 0 && matches!(color, PngColor::RGB | PngColor::RGBA) {
            let max_colors = png_options.max_colors.clamp(1, 256);

            let result = quantize(
                &pixels,
                color.num_components(),
                self.options.width(),
                max_colors,
                png_options.dithering
            );
            trace!("quantized image to {} palette entries", result.palette.len());

            self.palette = result.palette;
            self.color = PngColor::Palette;

            return (Cow::Owned(result.indices), 1);
        }

        if png_options.reduce_color_type {
            if color == PngColor::RGBA && can_reduce_to_rgb(&pixels) {
                trace!("image is fully opaque, dropping alpha channel");
                pixels = Cow::Owned(reduce_to_rgb(&pixels));
                color = PngColor::RGB;
            }
            if color == PngColor::RGB && is_grayscale(&pixels, 3) {
                trace!("image is grayscale, dropping chroma channels");
                pixels = Cow::Owned(reduce_to_grayscale(&pixels, 3));
                color = PngColor::Luma;
            }
        }

        if color == PngColor::RGBA && png_options.optimize_alpha {
            let mut owned = pixels.into_owned();
            optimize_alpha(&mut owned);
            pixels = Cow::Owned(owned);
        }

        self.color = color;
        let components = color.num_components();
        (pixels, components)
    }

    /// Build the filtered scanline stream, one filter type byte and
    /// the transformed row per scanline
    fn add_filters(&mut self, pixels: &[u8], components: usize) {
        let scanline_size = self.options.width() * components;
        let height = self.options.height();
        let strategy = self.png_options.filter_strategy;

        self.filter_scanline.clear();
        self.filter_scanline.resize(height * (scanline_size + 1), 0);

        let mut scratch = vec![0_u8; scanline_size + 1];
        let mut previous_scanline: &[u8] = &[];
        let mut filter_histogram = [0_usize; 5];

        for (i, filtered_row) in self
            .filter_scanline
            .chunks_exact_mut(scanline_size + 1)
            .enumerate()
        {
            let current = &pixels[i * scanline_size..(i + 1) * scanline_size];

            let filter = choose_compression_filter(
                current,
                previous_scanline,
                components,
                strategy,
                &mut scratch
            );
            filter_histogram[usize::from(filter.to_int())] += 1;

            filter_scanline(current, previous_scanline, filtered_row, filter, components);

            previous_scanline = current;
        }
        trace!("filter histogram [none,sub,up,avg,paeth]: {filter_histogram:?}");
    }

    /// Compress the filtered stream into the zlib stream IDAT
    /// chunks will carry
    fn compress_filtered(&mut self) -> Result<(), PngEncodeErrors> {
        let deflate_options = DeflateEncoderOptions::default()
            .set_level(self.options.effort().clamp(1, 9))
            .set_multi_pass(self.png_options.optimal_deflate);

        self.encoded_chunks =
            DeflateEncoder::new_with_options(&self.filter_scanline, deflate_options)
                .encode_zlib()?;

        trace!(
            "compressed {} filtered bytes into {}",
            self.filter_scanline.len(),
            self.encoded_chunks.len()
        );
        Ok(())
    }

    fn write_idat_chunks<T: ZByteWriterTrait>(
        &self, writer: &mut ZWriter<T>
    ) -> Result<(), PngEncodeErrors> {
        debug_assert!(!self.encoded_chunks.is_empty());
        // Most decoders love data in 8KB chunks, since
        // probably libpng does that by default
        // so let's try emulating that
        for chunk in self.encoded_chunks.chunks(IDAT_CHUNK_SIZE) {
            let chunk_meta = PngChunk {
                length:     chunk.len(),
                chunk_type: PngChunkType::IDAT,
                chunk:      *b"IDAT"
            };
            write_chunk(chunk_meta, chunk, writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pixo_core::bit_depth::BitDepth;
    use pixo_core::colorspace::ColorSpace;
    use pixo_core::options::EncoderOptions;

    use super::PngEncoder;
    use crate::error::PngEncodeErrors;

    #[test]
    fn test_simple_write() {
        let width = 40;
        let height = 10;
        let data = vec![100; width * height];

        let options = EncoderOptions::default()
            .set_colorspace(ColorSpace::Luma)
            .set_width(width)
            .set_height(height)
            .set_depth(BitDepth::Eight);

        let mut sink = vec![];
        let size = PngEncoder::new(&data, options).encode(&mut sink).unwrap();

        assert_eq!(size, sink.len());
        // signature, then IHDR's length and type
        assert_eq!(&sink[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!(&sink[8..16], &[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
    }

    #[test]
    fn test_dimension_validation() {
        let options = EncoderOptions::new(0, 10, ColorSpace::RGB, BitDepth::Eight);
        let err = PngEncoder::new(&[], options).encode(&mut vec![]);
        assert!(matches!(err, Err(PngEncodeErrors::ZeroDimension(_))));

        let options = EncoderOptions::new(10, 10, ColorSpace::RGB, BitDepth::Eight);
        let err = PngEncoder::new(&[0; 10], options).encode(&mut vec![]);
        assert!(matches!(err, Err(PngEncodeErrors::LengthMismatch(300, 10))));
    }

    #[test]
    fn test_depth_validation() {
        let options = EncoderOptions::new(2, 2, ColorSpace::RGB, BitDepth::Sixteen);
        let err = PngEncoder::new(&[0; 24], options).encode(&mut vec![]);
        assert!(matches!(err, Err(PngEncodeErrors::UnsupportedDepth(_))));
    }
}
