/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream writer
//!
//! The encoders in this family only ever produce bytes, so unlike
//! a full I/O layer we only carry the writing half, a thin wrapper
//! that adds endian aware writes on top of anything implementing
//! [`ZByteWriterTrait`]
pub use errors::ZByteIoError;
pub use traits::ZByteWriterTrait;
pub use writer::ZWriter;

mod errors;
mod traits;
mod writer;
