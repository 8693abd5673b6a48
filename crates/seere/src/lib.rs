//! # Seere
//!
//! A streaming animated-GIF89a encoder.
//!
//! Seere consumes RGB24 frames and writes a valid GIF89a byte stream to
//! any [`std::io::Write`] sink, one frame at a time. Each frame is
//! quantized to a 256-color palette by a NeuQuant self-organizing map
//! and compressed with the GIF flavor of LZW.
//!
//! Seere is named after the 70th spirit of the Ars Goetia, a prince
//! said to pass over the whole earth in the twinkling of an eye.
//!
//! ## Example
//!
//! ```
//! use seere::{Encoder, EncoderConfig, Frame, Repeat};
//!
//! let mut config = EncoderConfig::default();
//! config.repeat = Repeat::Infinite;
//!
//! let fade: Vec<Vec<u8>> = (0..4u32)
//!     .map(|step| {
//!         (0..16 * 16)
//!             .flat_map(|_| [64 * step as u8, 0, 255 - 64 * step as u8])
//!             .collect()
//!     })
//!     .collect();
//!
//! let mut out = Vec::new();
//! let mut encoder = Encoder::with_config(16, 16, config)?;
//! encoder.start(&mut out)?;
//! for pixels in &fade {
//!     encoder.add_frame(&mut out, &Frame::new(pixels).with_delay(0.1))?;
//! }
//! encoder.finish(&mut out)?;
//!
//! assert!(out.starts_with(b"GIF89a"));
//! # Ok::<(), seere::Error>(())
//! ```

pub use seere_core::{
    ByteSink, EncoderConfig, Error, Frame, Repeat, Result, MAX_COLORS, PALETTE_BYTES,
};
pub use seere_gif::Encoder;
pub use seere_lzw::LzwEncoder;
pub use seere_neuquant::NeuQuant;

/// Encode a whole animation in one call.
///
/// Convenience for callers that have every frame in memory and do not
/// need the streaming API.
pub fn encode_frames(
    width: u32,
    height: u32,
    config: EncoderConfig,
    frames: &[Frame<'_>],
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = Encoder::with_config(width, height, config)?;
    encoder.start(&mut out)?;
    for frame in frames {
        encoder.add_frame(&mut out, frame)?;
    }
    encoder.finish(&mut out)?;
    Ok(out)
}
