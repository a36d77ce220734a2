/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Every stream the encoder emits is piped back through flate2,
//! about as battle tested a reference inflater as they come

use std::io::Read;

use pixo_deflate::{calc_adler_hash, DeflateEncoder, DeflateEncoderOptions};

fn inflate_zlib(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .expect("reference decoder rejected the stream");
    out
}

fn inflate_raw(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::DeflateDecoder::new(data)
        .read_to_end(&mut out)
        .expect("reference decoder rejected the stream");
    out
}

/// cheap deterministic bytes, xorshift keeps the test free of
/// rng dependencies
fn pseudo_random(len: usize, mut seed: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        out.push((seed >> 24) as u8);
    }
    out
}

#[test]
fn test_roundtrip_empty() {
    let out = DeflateEncoder::new(b"").encode_zlib().unwrap();
    assert!(inflate_zlib(&out).is_empty());
}

#[test]
fn test_roundtrip_single_byte() {
    let out = DeflateEncoder::new(b"z").encode_zlib().unwrap();
    assert_eq!(inflate_zlib(&out), b"z");
}

#[test]
fn test_roundtrip_text() {
    let data = b"It was the best of times, it was the worst of times, it was the age \
                 of wisdom, it was the age of foolishness"
        .repeat(50);

    let out = DeflateEncoder::new(&data).encode_zlib().unwrap();
    assert_eq!(inflate_zlib(&out), data);
    // repetitive text must actually shrink
    assert!(out.len() < data.len() / 2);
}

#[test]
fn test_roundtrip_raw_deflate() {
    let data = b"raw deflate, no zlib dressing".repeat(20);
    let out = DeflateEncoder::new(&data).encode_raw().unwrap();
    assert_eq!(inflate_raw(&out), data);
}

#[test]
fn test_roundtrip_all_levels() {
    let data = pseudo_random(4096, 0xBEEF)
        .iter()
        .map(|b| b % 8)
        .collect::<Vec<u8>>();

    for level in 1..=9 {
        let options = DeflateEncoderOptions::default().set_level(level);
        let out = DeflateEncoder::new_with_options(&data, options)
            .encode_zlib()
            .unwrap();
        assert_eq!(inflate_zlib(&out), data, "level {level}");
    }
}

#[test]
fn test_roundtrip_incompressible() {
    // random bytes, the encoder should survive and may fall
    // back to stored blocks
    let data = pseudo_random(100_000, 0x1234_5678);
    let out = DeflateEncoder::new(&data).encode_zlib().unwrap();

    assert_eq!(inflate_zlib(&out), data);
    // stored overhead is bounded, output can't blow up
    assert!(out.len() < data.len() + 1024);
}

#[test]
fn test_roundtrip_multiple_blocks() {
    // long repetitive input spanning several 64 KiB blocks, with
    // matches that reach across block boundaries
    let mut data = Vec::new();
    while data.len() < 400_000 {
        data.extend_from_slice(b"0123456789abcdefghijklmnopqrstuvwxyz");
    }

    let out = DeflateEncoder::new(&data).encode_zlib().unwrap();
    assert_eq!(inflate_zlib(&out), data);
    assert!(out.len() < data.len() / 4);
}

#[test]
fn test_roundtrip_long_runs() {
    // maximum length matches back to back
    let data = vec![0_u8; 300_000];
    let out = DeflateEncoder::new(&data).encode_zlib().unwrap();
    assert_eq!(inflate_zlib(&out), data);
}

#[test]
fn test_roundtrip_small_window() {
    let data = b"abcdefgh".repeat(8192);
    let options = DeflateEncoderOptions::default().set_window_size(256);
    let out = DeflateEncoder::new_with_options(&data, options)
        .encode_zlib()
        .unwrap();

    assert_eq!(inflate_zlib(&out), data);
}

#[test]
fn test_roundtrip_multi_pass() {
    let data = b"the multi pass re-encodes with deeper searches".repeat(100);
    let options = DeflateEncoderOptions::default().set_level(2).set_multi_pass(true);

    let single = DeflateEncoder::new_with_options(
        &data,
        DeflateEncoderOptions::default().set_level(2)
    )
    .encode_zlib()
    .unwrap();
    let multi = DeflateEncoder::new_with_options(&data, options)
        .encode_zlib()
        .unwrap();

    assert_eq!(inflate_zlib(&multi), data);
    assert!(multi.len() <= single.len());
}

#[test]
fn test_adler_trailer_matches_payload() {
    let data = b"checksum me".repeat(17);
    let out = DeflateEncoder::new(&data).encode_zlib().unwrap();

    let trailer = u32::from_be_bytes(out[out.len() - 4..].try_into().unwrap());
    assert_eq!(trailer, calc_adler_hash(&data));
}

#[test]
fn test_encoder_instance_is_reusable() {
    let data = b"reuse me".repeat(1000);
    let mut encoder = DeflateEncoder::new(&data);

    let first = encoder.encode_zlib().unwrap();
    let second = encoder.encode_zlib().unwrap();

    // window and hash state reset between encodes, byte
    // identical output
    assert_eq!(first, second);

    encoder.reset(b"different");
    let third = encoder.encode_zlib().unwrap();
    assert_eq!(inflate_zlib(&third), b"different");
}
