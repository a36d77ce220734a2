/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chunk writers
//!
//! Every chunk is framed the same way: length, four type bytes, the
//! payload, then a CRC-32 over type and payload. Length never takes
//! part in the CRC.

use alloc::vec::Vec;

use pixo_core::bytestream::{ZByteIoError, ZByteWriterTrait, ZWriter};

use crate::crc::{calc_crc, calc_crc_with_bytes};
use crate::encoder::PngEncoder;
use crate::enums::PngChunkType;

pub(crate) struct PngChunk {
    pub length:     usize,
    #[allow(dead_code)]
    pub chunk_type: PngChunkType,
    pub chunk:      [u8; 4]
}

pub(crate) fn write_ihdr(ctx: &PngEncoder, output: &mut ZWriter<&mut Vec<u8>>) {
    // write width and height
    output.write_u32_be(ctx.options.width() as u32);
    output.write_u32_be(ctx.options.height() as u32);
    // bit depth, always eight
    output.write_u8(8);
    // color type
    output.write_u8(ctx.color.to_int());
    // compression method
    output.write_u8(0);
    // filter method
    output.write_u8(0);
    // interlace method, always standard
    output.write_u8(0);
}

pub(crate) fn write_plte(ctx: &PngEncoder, output: &mut ZWriter<&mut Vec<u8>>) {
    for entry in &ctx.palette {
        output.write_u8(entry.red);
        output.write_u8(entry.green);
        output.write_u8(entry.blue);
    }
}

/// One alpha byte per palette entry, everything after the last
/// non-opaque entry is implied and left out
pub(crate) fn write_trns(ctx: &PngEncoder, output: &mut ZWriter<&mut Vec<u8>>) {
    let last_transparent = ctx
        .palette
        .iter()
        .rposition(|entry| entry.alpha != 255)
        .map_or(0, |position| position + 1);

    for entry in &ctx.palette[..last_transparent] {
        output.write_u8(entry.alpha);
    }
}

// iend is a no-op
pub(crate) fn write_iend(_: &PngEncoder, _: &mut ZWriter<&mut Vec<u8>>) {}

/// Write header writes the boilerplate for each png chunk
///
/// It writes the length, chunk type, calls a function to write the
/// data and then calculates the CRC chunk for that png and writes it.
///
/// This should be called with the appropriate inner function to write data
pub(crate) fn write_header_fn<T: ZByteWriterTrait, F: Fn(&PngEncoder, &mut ZWriter<&mut Vec<u8>>)>(
    v: &PngEncoder, writer: &mut ZWriter<T>, name: &[u8; 4], func: F
) -> Result<(), ZByteIoError> {
    // chunk lengths precede the data they describe, but the length
    // isn't known until the inner function ran, so the chunk is
    // staged in a scratch vec and patched afterwards

    // format
    // length - chunk type - [data] - crc
    let mut temp_space = Vec::with_capacity(32);
    // space for length
    temp_space.extend_from_slice(&[0; 4]);

    let mut local_writer = ZWriter::new(&mut temp_space);
    // write the type
    local_writer.write_all(name)?;
    // call underlying function
    (func)(v, &mut local_writer);

    // write length less the chunk name
    let bytes_written = local_writer.bytes_written();
    temp_space[0..4].copy_from_slice(&(bytes_written as u32 - 4).to_be_bytes());

    // crc covers everything but the length
    let crc = calc_crc(&temp_space[4..]);
    temp_space.extend_from_slice(&crc.to_be_bytes());

    writer.write_all(&temp_space)
}

/// Write a chunk whose payload already exists as a byte slice,
/// the IDAT path
pub(crate) fn write_chunk<T: ZByteWriterTrait>(
    chunk: PngChunk, data: &[u8], writer: &mut ZWriter<T>
) -> Result<(), ZByteIoError> {
    // write length
    writer.write_u32_be_err(chunk.length as u32)?;
    // write chunk name
    writer.write_all(&chunk.chunk)?;
    // write chunk data
    writer.write_all(data)?;
    // crc is a continuous function, so first crc the chunk name
    // and then crc that with the chunk bytes passing in the previous crc
    let crc = calc_crc_with_bytes(&chunk.chunk, u32::MAX);
    let crc = !calc_crc_with_bytes(data, crc);
    writer.write_u32_be_err(crc)?;
    Ok(())
}
