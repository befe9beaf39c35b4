//! Board-agnostic core logic for the handheld runtime
//!
//! This crate contains everything that does not depend on a specific board
//! or display:
//!
//! - Input decoding (quadrature encoder, button tap/hold) and the event bus
//! - Haptic feedback policy
//! - Configuration type definitions
//! - High-score table rules
//! - The navigation runtime: screen contract, focus stack, app registry,
//!   menus and crash containment

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod haptic;
pub mod highscore;
pub mod input;
pub mod nav;
