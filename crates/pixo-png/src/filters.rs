/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Filter functions for png scanlines, encode direction
//!
//! Each scanline is transformed against its left and upper
//! neighbours before compression, all arithmetic is modulo 256.
//! For the first row the previous scanline is the empty slice and
//! every upper neighbour reads as zero, same boundary rule a
//! decoder applies.

use crate::enums::FilterMethod;
use crate::options::FilterStrategy;

/// Filter one scanline into `output`
///
/// `output` is one byte longer than `input`, the filter type byte
/// goes first. `previous` is empty for the first row
pub(crate) fn filter_scanline(
    input: &[u8], previous: &[u8], output: &mut [u8], filter: FilterMethod, components: usize
) {
    debug_assert_eq!(output.len(), input.len() + 1);

    let (filter_byte, filtered) = output.split_at_mut(1);
    filter_byte[0] = filter.to_int();

    match filter {
        FilterMethod::None => filtered.copy_from_slice(input),
        FilterMethod::Sub => handle_sub(input, filtered, components),
        FilterMethod::Up => handle_up(input, previous, filtered),
        FilterMethod::Average => handle_avg(input, previous, filtered, components),
        FilterMethod::Paeth => handle_paeth(input, previous, filtered, components)
    }
}

fn handle_sub(raw: &[u8], current: &mut [u8], components: usize) {
    // leftmost pixel has no left neighbour
    current[..components].copy_from_slice(&raw[..components]);

    for i in components..raw.len() {
        current[i] = raw[i].wrapping_sub(raw[i - components]);
    }
}

fn handle_up(raw: &[u8], prev_row: &[u8], current: &mut [u8]) {
    if prev_row.is_empty() {
        current.copy_from_slice(raw);
        return;
    }
    for ((cur, raw), up) in current.iter_mut().zip(raw).zip(prev_row) {
        *cur = (*raw).wrapping_sub(*up);
    }
}

fn handle_avg(raw: &[u8], prev_row: &[u8], current: &mut [u8], components: usize) {
    for i in 0..raw.len() {
        let left = u16::from(if i >= components { raw[i - components] } else { 0 });
        let up = u16::from(if prev_row.is_empty() { 0 } else { prev_row[i] });

        current[i] = raw[i].wrapping_sub(((left + up) >> 1) as u8);
    }
}

fn handle_paeth(raw: &[u8], prev_row: &[u8], current: &mut [u8], components: usize) {
    for i in 0..raw.len() {
        let left = if i >= components { raw[i - components] } else { 0 };
        let up = if prev_row.is_empty() { 0 } else { prev_row[i] };
        let upper_left = if i >= components && !prev_row.is_empty() {
            prev_row[i - components]
        } else {
            0
        };

        current[i] = raw[i].wrapping_sub(paeth(left, up, upper_left));
    }
}

/// The Paeth predictor, the neighbour closest to `left + up - upper_left`
/// with ties resolved left, up, upper-left in that order
#[inline(always)]
pub(crate) fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let a = i16::from(a);
    let b = i16::from(b);
    let c = i16::from(c);
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc {
        return a as u8;
    }
    if pb <= pc {
        return b as u8;
    }
    c as u8
}

/// Pick the filter for one scanline
///
/// For the searching strategies every candidate row is produced in
/// `scratch` and scored by the sum of its bytes read as signed
/// values, smallest sum wins and ties fall to the lower filter id
pub(crate) fn choose_compression_filter(
    current: &[u8], previous: &[u8], components: usize, strategy: FilterStrategy,
    scratch: &mut [u8]
) -> FilterMethod {
    let candidates: &[FilterMethod] = match strategy {
        FilterStrategy::None => return FilterMethod::None,
        FilterStrategy::Sub => return FilterMethod::Sub,
        FilterStrategy::Up => return FilterMethod::Up,
        FilterStrategy::Average => return FilterMethod::Average,
        FilterStrategy::Paeth => return FilterMethod::Paeth,
        FilterStrategy::MinSum | FilterStrategy::Adaptive => &[
            FilterMethod::None,
            FilterMethod::Sub,
            FilterMethod::Up,
            FilterMethod::Average,
            FilterMethod::Paeth
        ],
        FilterStrategy::AdaptiveFast => {
            &[FilterMethod::None, FilterMethod::Sub, FilterMethod::Up]
        }
    };

    let mut best = FilterMethod::None;
    let mut best_sum = u64::MAX;

    for filter in candidates {
        filter_scanline(current, previous, scratch, *filter, components);

        let sum: u64 = scratch[1..]
            .iter()
            .map(|byte| u64::from((*byte as i8).unsigned_abs()))
            .sum();

        // strictly smaller keeps the first candidate on ties,
        // candidates are already in filter id order
        if sum < best_sum {
            best_sum = sum;
            best = *filter;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    /// decode-direction reconstruction, same boundary rules a decoder uses
    fn reconstruct(filtered: &[u8], prev_row: &[u8], components: usize) -> Vec<u8> {
        let filter = FilterMethod::from_int(filtered[0]).unwrap();
        let data = &filtered[1..];
        let mut out = vec![0_u8; data.len()];

        for i in 0..data.len() {
            let left = if i >= components { out[i - components] } else { 0 };
            let up = if prev_row.is_empty() { 0 } else { prev_row[i] };
            let upper_left = if i >= components && !prev_row.is_empty() {
                prev_row[i - components]
            } else {
                0
            };

            let predictor = match filter {
                FilterMethod::None => 0,
                FilterMethod::Sub => left,
                FilterMethod::Up => up,
                FilterMethod::Average => (((u16::from(left)) + u16::from(up)) >> 1) as u8,
                FilterMethod::Paeth => paeth(left, up, upper_left)
            };
            out[i] = data[i].wrapping_add(predictor);
        }
        out
    }

    #[test]
    fn test_filters_roundtrip() {
        let filters = [
            FilterMethod::None,
            FilterMethod::Sub,
            FilterMethod::Up,
            FilterMethod::Average,
            FilterMethod::Paeth
        ];

        for components in [1_usize, 3, 4] {
            let width = 13;
            let row: Vec<u8> = (0..width * components).map(|i| (i * 37 % 256) as u8).collect();
            let prev: Vec<u8> = (0..width * components).map(|i| (i * 91 % 256) as u8).collect();

            for filter in filters {
                let mut output = vec![0_u8; row.len() + 1];

                // general row
                filter_scanline(&row, &prev, &mut output, filter, components);
                assert_eq!(
                    reconstruct(&output, &prev, components),
                    row,
                    "{filter:?} bpp {components}"
                );

                // first row, previous is empty
                filter_scanline(&row, &[], &mut output, filter, components);
                assert_eq!(
                    reconstruct(&output, &[], components),
                    row,
                    "{filter:?} first row bpp {components}"
                );
            }
        }
    }

    #[test]
    fn test_paeth_predictor_picks_closest() {
        // all equal, left wins the three-way tie
        assert_eq!(paeth(10, 10, 10), 10);
        // each neighbour winning outright
        assert_eq!(paeth(1, 200, 200), 1);
        assert_eq!(paeth(200, 1, 200), 1);
        assert_eq!(paeth(100, 50, 76), 76);
    }

    #[test]
    fn test_constant_row_prefers_sub() {
        // a flat row filters to all zeros under Sub, min-sum must
        // not pick None (sum would be 120 * 16)
        let row = [120_u8; 16];
        let mut scratch = [0_u8; 17];

        let chosen = choose_compression_filter(&row, &[], 1, FilterStrategy::MinSum, &mut scratch);
        assert_eq!(chosen, FilterMethod::Sub);
    }

    #[test]
    fn test_fixed_strategies_are_fixed() {
        let row = [1_u8, 2, 3, 4];
        let mut scratch = [0_u8; 5];

        for (strategy, expected) in [
            (FilterStrategy::None, FilterMethod::None),
            (FilterStrategy::Sub, FilterMethod::Sub),
            (FilterStrategy::Up, FilterMethod::Up),
            (FilterStrategy::Average, FilterMethod::Average),
            (FilterStrategy::Paeth, FilterMethod::Paeth)
        ] {
            let chosen = choose_compression_filter(&row, &row, 1, strategy, &mut scratch);
            assert_eq!(chosen, expected);
        }
    }

    #[test]
    fn test_adaptive_fast_never_picks_paeth() {
        let mut rng_state = 0x2545_F491_u32;
        let mut row = [0_u8; 64];
        for byte in row.iter_mut() {
            rng_state = rng_state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *byte = (rng_state >> 24) as u8;
        }
        let mut scratch = [0_u8; 65];

        let chosen =
            choose_compression_filter(&row, &row, 4, FilterStrategy::AdaptiveFast, &mut scratch);
        assert!(matches!(
            chosen,
            FilterMethod::None | FilterMethod::Sub | FilterMethod::Up
        ));
    }
}
