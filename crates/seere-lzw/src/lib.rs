//! # Seere LZW
//!
//! The GIF flavor of Lempel-Ziv-Welch compression.
//!
//! This is the classic `compress(1)`-derived coder: open-addressed
//! double hashing over prefix/pixel pairs (XOR primary probe, G. Knott
//! relatively-prime secondary probe), variable-width codes growing from
//! `initial + 1` up to 12 bits, a CLEAR code emitted when the table
//! fills, and output bit-packed least-significant-bit-first into GIF
//! sub-blocks of at most 254 data bytes.

pub mod encoder;

pub use encoder::LzwEncoder;
