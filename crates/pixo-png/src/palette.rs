/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Palette quantization, the lossy road to color type 3
//!
//! Median cut over the color histogram picks the palette, every
//! pixel is then mapped to its nearest entry, optionally with
//! Floyd-Steinberg error diffusion. Quantization happens in RGBA
//! space throughout, a translucent red and an opaque red are
//! different colors and the distance metric treats them as such.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

/// One palette entry, the RGB part goes to PLTE and alpha
/// to tRNS
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct PaletteEntry {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8,
    pub alpha: u8
}

impl PaletteEntry {
    const fn to_array(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    const fn from_array(color: [u8; 4]) -> PaletteEntry {
        PaletteEntry {
            red:   color[0],
            green: color[1],
            blue:  color[2],
            alpha: color[3]
        }
    }
}

/// A color seen in the input together with how often it occurs
#[derive(Copy, Clone, Debug)]
struct CountedColor {
    color: [u8; 4],
    count: u32
}

pub(crate) struct QuantizeResult {
    /// One palette index per input pixel
    pub indices: Vec<u8>,
    /// At most `max_colors` entries, never more than 256
    pub palette: Vec<PaletteEntry>
}

/// Quantize `pixels` (RGB or RGBA, `components` 3 or 4) down to at
/// most `max_colors` colors
///
/// When the image already fits the budget the palette is exact and
/// the result lossless, otherwise median cut picks representatives
/// and each pixel maps to its nearest entry
pub(crate) fn quantize(
    pixels: &[u8], components: usize, width: usize, max_colors: usize, dithering: bool
) -> QuantizeResult {
    debug_assert!(components == 3 || components == 4);
    debug_assert!((1..=256).contains(&max_colors));

    let histogram = build_histogram(pixels, components);

    if histogram.len() <= max_colors {
        // everything fits, keep the colors exactly as they are
        let palette: Vec<PaletteEntry> = histogram
            .keys()
            .map(|color| PaletteEntry::from_array(*color))
            .collect();

        let index_of: BTreeMap<[u8; 4], u8> = palette
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.to_array(), i as u8))
            .collect();

        let indices = pixels
            .chunks_exact(components)
            .map(|px| index_of[&widen(px)])
            .collect();

        return QuantizeResult { indices, palette };
    }

    let counted: Vec<CountedColor> = histogram
        .iter()
        .map(|(color, count)| CountedColor {
            color: *color,
            count: *count
        })
        .collect();

    let palette = median_cut(counted, max_colors);

    let indices = if dithering {
        diffuse_errors(pixels, components, width, &palette)
    } else {
        // nearest lookup once per distinct color, not once per pixel
        let index_of: BTreeMap<[u8; 4], u8> = histogram
            .keys()
            .map(|color| (*color, nearest_entry(&palette, *color)))
            .collect();

        pixels
            .chunks_exact(components)
            .map(|px| index_of[&widen(px)])
            .collect()
    };

    QuantizeResult { indices, palette }
}

/// True if any entry is not fully opaque, i.e a tRNS chunk
/// is needed
pub(crate) fn has_transparency(palette: &[PaletteEntry]) -> bool {
    palette.iter().any(|entry| entry.alpha != 255)
}

/// An RGB(A) pixel as an RGBA array, missing alpha reads opaque
#[inline]
fn widen(px: &[u8]) -> [u8; 4] {
    if px.len() == 4 {
        [px[0], px[1], px[2], px[3]]
    } else {
        [px[0], px[1], px[2], 255]
    }
}

fn build_histogram(pixels: &[u8], components: usize) -> BTreeMap<[u8; 4], u32> {
    let mut histogram = BTreeMap::new();

    for px in pixels.chunks_exact(components) {
        *histogram.entry(widen(px)).or_insert(0_u32) += 1;
    }
    histogram
}

/// Recursively split the color space until `max_colors` buckets
/// exist, then average each bucket into its representative
fn median_cut(colors: Vec<CountedColor>, max_colors: usize) -> Vec<PaletteEntry> {
    let mut buckets: Vec<Vec<CountedColor>> = vec![colors];

    while buckets.len() < max_colors {
        // the bucket holding the most distinct colors is split next
        let candidate = buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| bucket.len() >= 2)
            .max_by_key(|(_, bucket)| bucket.len())
            .map(|(i, _)| i);

        let Some(i) = candidate else {
            break;
        };

        let mut bucket = buckets.remove(i);
        let channel = widest_channel(&bucket);

        bucket.sort_unstable_by_key(|c| (c.color[channel], c.color));
        let upper = bucket.split_off(bucket.len() / 2);

        buckets.push(bucket);
        buckets.push(upper);
    }

    buckets.iter().map(|bucket| average_color(bucket)).collect()
}

/// The channel with the largest value spread inside a bucket
fn widest_channel(bucket: &[CountedColor]) -> usize {
    let mut min = [255_u8; 4];
    let mut max = [0_u8; 4];

    for counted in bucket {
        for channel in 0..4 {
            min[channel] = min[channel].min(counted.color[channel]);
            max[channel] = max[channel].max(counted.color[channel]);
        }
    }

    let mut widest = 0;
    let mut widest_range = 0;

    for channel in 0..4 {
        let range = max[channel] - min[channel];
        if range > widest_range {
            widest_range = range;
            widest = channel;
        }
    }
    widest
}

/// Count-weighted channel averages, rounded to nearest
fn average_color(bucket: &[CountedColor]) -> PaletteEntry {
    let mut sums = [0_u64; 4];
    let mut total = 0_u64;

    for counted in bucket {
        let weight = u64::from(counted.count);
        total += weight;
        for channel in 0..4 {
            sums[channel] += weight * u64::from(counted.color[channel]);
        }
    }

    debug_assert!(total > 0);
    let rounded = |sum: u64| ((sum + total / 2) / total) as u8;

    PaletteEntry {
        red:   rounded(sums[0]),
        green: rounded(sums[1]),
        blue:  rounded(sums[2]),
        alpha: rounded(sums[3])
    }
}

/// Index of the palette entry closest in squared RGBA distance,
/// ties keep the lower index
fn nearest_entry(palette: &[PaletteEntry], color: [u8; 4]) -> u8 {
    let mut best = 0;
    let mut best_distance = u32::MAX;

    for (i, entry) in palette.iter().enumerate() {
        let mut distance = 0_u32;
        for (have, want) in entry.to_array().iter().zip(color.iter()) {
            let delta = i32::from(*have) - i32::from(*want);
            distance += (delta * delta) as u32;
        }

        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best as u8
}

/// Floyd-Steinberg dithering
///
/// The signed residual of each quantized pixel spreads to four
/// neighbours, 7/16 right, 3/16 lower left, 5/16 below and 1/16
/// lower right. Accumulated values clamp to the byte range before
/// every lookup
fn diffuse_errors(
    pixels: &[u8], components: usize, width: usize, palette: &[PaletteEntry]
) -> Vec<u8> {
    let mut indices = Vec::with_capacity(pixels.len() / components);

    let mut err_current: Vec<[i16; 4]> = vec![[0; 4]; width];
    let mut err_below: Vec<[i16; 4]> = vec![[0; 4]; width];

    for row in pixels.chunks_exact(width * components) {
        for (x, px) in row.chunks_exact(components).enumerate() {
            let wanted = widen(px);
            let mut adjusted = [0_u8; 4];

            for channel in 0..4 {
                let value = i16::from(wanted[channel]) + err_current[x][channel];
                adjusted[channel] = value.clamp(0, 255) as u8;
            }

            let index = nearest_entry(palette, adjusted);
            indices.push(index);

            let entry = palette[usize::from(index)].to_array();

            for channel in 0..4 {
                let residual = i16::from(adjusted[channel]) - i16::from(entry[channel]);

                if x + 1 < width {
                    err_current[x + 1][channel] += residual * 7 / 16;
                    err_below[x + 1][channel] += residual / 16;
                }
                if x > 0 {
                    err_below[x - 1][channel] += residual * 3 / 16;
                }
                err_below[x][channel] += residual * 5 / 16;
            }
        }

        core::mem::swap(&mut err_current, &mut err_below);
        err_below.iter_mut().for_each(|e| *e = [0; 4]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn reconstruct(result: &QuantizeResult) -> Vec<[u8; 4]> {
        result
            .indices
            .iter()
            .map(|i| result.palette[usize::from(*i)].to_array())
            .collect()
    }

    #[test]
    fn test_small_images_quantize_losslessly() {
        // four distinct colors, budget of 16, nothing may change
        let pixels = [
            255, 0, 0, /**/ 0, 255, 0, //
            0, 0, 255, /**/ 255, 255, 0,
        ];
        let result = quantize(&pixels, 3, 2, 16, false);

        assert_eq!(result.palette.len(), 4);
        let round_tripped = reconstruct(&result);
        for (px, got) in pixels.chunks_exact(3).zip(round_tripped) {
            assert_eq!([px[0], px[1], px[2], 255], got);
        }
    }

    #[test]
    fn test_palette_respects_budget() {
        // a 32x32 image with 1024 distinct colors
        let mut pixels = Vec::new();
        for i in 0..1024_u32 {
            pixels.extend_from_slice(&[(i % 256) as u8, (i / 4 % 256) as u8, (i / 16) as u8]);
        }

        for budget in [2, 16, 256] {
            let result = quantize(&pixels, 3, 32, budget, false);
            assert!(result.palette.len() <= budget, "budget {budget}");
            assert_eq!(result.indices.len(), 1024);
            assert!(result
                .indices
                .iter()
                .all(|i| usize::from(*i) < result.palette.len()));
        }
    }

    #[test]
    fn test_alpha_participates_in_distance() {
        // same color at two alphas must map to different entries
        let palette = [
            PaletteEntry { red: 200, green: 0, blue: 0, alpha: 255 },
            PaletteEntry { red: 200, green: 0, blue: 0, alpha: 0 }
        ];

        assert_eq!(nearest_entry(&palette, [200, 0, 0, 250]), 0);
        assert_eq!(nearest_entry(&palette, [200, 0, 0, 5]), 1);
    }

    #[test]
    fn test_nearest_tie_keeps_lower_index() {
        let palette = [
            PaletteEntry { red: 10, green: 0, blue: 0, alpha: 255 },
            PaletteEntry { red: 30, green: 0, blue: 0, alpha: 255 }
        ];
        // 20 is equidistant
        assert_eq!(nearest_entry(&palette, [20, 0, 0, 255]), 0);
    }

    #[test]
    fn test_transparency_detection() {
        let mut palette = [PaletteEntry { red: 1, green: 2, blue: 3, alpha: 255 }; 3];
        assert!(!has_transparency(&palette));

        palette[1].alpha = 128;
        assert!(has_transparency(&palette));
    }

    #[test]
    fn test_dithering_preserves_average_brightness() {
        // a 64x16 gray ramp forced through a tiny palette
        let width = 64;
        let height = 16;
        let mut pixels = Vec::new();
        for _ in 0..height {
            for x in 0..width {
                let v = (x * 4) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }

        let result = quantize(&pixels, 3, width, 4, true);
        let round_tripped = reconstruct(&result);

        let original_sum: u64 = pixels
            .chunks_exact(3)
            .map(|px| u64::from(px[0]))
            .sum();
        let quantized_sum: u64 = round_tripped.iter().map(|px| u64::from(px[0])).sum();

        let pixel_count = (width * height) as u64;
        let original_avg = original_sum / pixel_count;
        let quantized_avg = quantized_sum / pixel_count;

        // error diffusion keeps the overall brightness close
        assert!(
            original_avg.abs_diff(quantized_avg) <= 8,
            "{original_avg} vs {quantized_avg}"
        );
    }
}
