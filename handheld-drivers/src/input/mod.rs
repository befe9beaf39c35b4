//! Input drivers

pub mod encoder;

pub use encoder::{Encoder, EncoderPins, Sample};
