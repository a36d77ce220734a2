/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// The eight byte signature every PNG file starts with
pub const PNG_SIGNATURE: u64 = 0x8950_4E47_0D0A_1A0A;

/// Payload size the encoder splits the zlib stream into, most
/// decoders are tuned for IDAT chunks of this size since libpng
/// writes them by default
pub const IDAT_CHUNK_SIZE: usize = 8192;

/// PNG caps dimensions at a signed 31 bit value
pub const MAX_DIMENSION: usize = (1 << 31) - 1;
