//! Display Wire Protocol
//!
//! This crate defines the byte-level protocol between the handheld runtime
//! and its ST7789 display controller. It is pure encoding: no bus access,
//! no timing. Drivers pair it with an `embedded-hal` SPI device and a
//! data/command line.
//!
//! # Protocol Overview
//!
//! Every transaction is an opcode byte with the D/C line low, followed by
//! parameter bytes with the D/C line high:
//! ```text
//! ┌────────┬──────────────────────────────────────┐
//! │ OPCODE │ PARAMETERS (0–4 bytes, big-endian)   │
//! │ D/C=0  │ D/C=1                                │
//! └────────┴──────────────────────────────────────┘
//! ```
//!
//! A frame is written by setting the column window, the row window, issuing
//! MEMORY WRITE, then streaming RGB565 pixels (high byte first, row-major) in
//! fixed-size chunks that never split a pixel.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod pixel;
pub mod stream;

pub use command::{init_sequence, Command, CommandError, InitStep, Rotation, Window, MAX_PARAMS};
pub use pixel::{Rgb565, BYTES_PER_PIXEL};
pub use stream::{chunk_count, stream_pixels, StreamError, DEFAULT_CHUNK_SIZE};
