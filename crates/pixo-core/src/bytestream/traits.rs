/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The sink trait the encoders write through
//!
//! With the `std` feature a blanket implementation covers everything
//! that implements [`std::io::Write`], so files, sockets and in memory
//! vectors all work.
//!
//! Without `std`, implementations for `&mut Vec<u8>` and `&mut [u8]`
//! are provided directly.

/// The underlying writer trait
///
/// # Considerations
///
/// - When implementing this for a type, it is recommended to implement methods with
///   `#[inline(always)]` directive to allow the functions to get inlined in call sites,
///   call sites may be in hot loops.
pub trait ZByteWriterTrait {
    /// Write some bytes from `buf` into the sink, returning
    /// how many bytes were written
    fn write_bytes(&mut self, buf: &[u8]) -> Result<usize, super::ZByteIoError>;
    /// Write every byte of `buf` into the sink or return an error
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), super::ZByteIoError>;
    /// Write a fixed size array into the sink or return an error
    fn write_const_bytes<const N: usize>(
        &mut self, buf: &[u8; N]
    ) -> Result<(), super::ZByteIoError>;
    /// Flush any buffered bytes to wherever they finally go
    fn flush_bytes(&mut self) -> Result<(), super::ZByteIoError>;
    /// A hint that `additional` more bytes are coming, sinks
    /// that can pre-allocate may use it
    fn reserve_capacity(&mut self, additional: usize) -> Result<(), super::ZByteIoError>;
}
