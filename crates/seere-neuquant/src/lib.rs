//! # Seere NeuQuant
//!
//! Neural-network color quantization for GIF encoding.
//!
//! NeuQuant (Dekker, 1994) trains a one-dimensional Kohonen
//! self-organizing map of 256 neurons over a sampled stream of pixels,
//! then reads the settled neurons back as the palette. All arithmetic is
//! biased fixed-point: color positions carry 4 fractional bits, the
//! frequency/bias contest runs at 16, so the whole schedule fits in
//! `i32` registers with truncating division.
//!
//! The quantizer is allocated once and re-trained per frame; no buffer
//! is reallocated between frames.

pub mod network;

pub use network::NeuQuant;
