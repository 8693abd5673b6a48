//! # Seere GIF
//!
//! The GIF89a container writer: header, logical screen descriptor,
//! Netscape 2.0 looping extension, per-frame graphic control and image
//! descriptor blocks, color tables, LZW image data, and the trailer.
//!
//! [`Encoder`] drives the full per-frame pipeline: quantize the RGB
//! input to a palette, map every pixel to its palette index, then
//! compress the indexed image onto the caller's sink.
//!
//! ## Example
//!
//! ```
//! use seere_core::{EncoderConfig, Frame};
//! use seere_gif::Encoder;
//!
//! let red = [0xFF, 0x00, 0x00].repeat(4);
//! let mut out = Vec::new();
//!
//! let mut encoder = Encoder::new(2, 2)?;
//! encoder.start(&mut out)?;
//! encoder.add_frame(&mut out, &Frame::new(&red))?;
//! encoder.finish(&mut out)?;
//!
//! assert!(out.starts_with(b"GIF89a"));
//! assert_eq!(*out.last().unwrap(), 0x3B);
//! # Ok::<(), seere_core::Error>(())
//! ```

mod blocks;
pub mod encoder;

pub use encoder::Encoder;
