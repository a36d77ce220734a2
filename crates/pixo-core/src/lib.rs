/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the pixo encoders
//!
//! This crate provides the small set of types shared by the
//! encoders under the `pixo` umbrella
//!
//! It currently contains
//!
//! - A bytestream writer with endian aware writes
//! - Colorspace and bit depth information shared by images
//! - Image encoder options
//!
//! This library is `#[no_std]` with `alloc` feature needed for defining `Vec`
//! which we need for storing encoded bytes.
//!
//! # Features
//!  - `std`: Enables `std` facilities, e.g writing to anything
//!     that implements `io::Write`
//!  - `log`: Enables logging via the `log` crate, when absent
//!     logging calls compile to nothing
//!
//! # Output
//!
//! For output, with the `std` feature we support anything that implements the
//! `Write` trait, this includes files, standard io streams, network sockets, etc
//!
//! In a `no_std` environment, we can write to in memory buffers `&mut [u8]`
//! and `&mut Vec<u8>`
//!
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;
extern crate core;

#[cfg(not(feature = "log"))]
pub mod log;

#[cfg(feature = "log")]
pub use log;

pub mod bit_depth;
pub mod bytestream;
pub mod colorspace;
pub mod options;
