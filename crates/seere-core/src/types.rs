//! Core types shared by the encoder pipeline.

/// Number of palette entries in a full GIF color table.
pub const MAX_COLORS: usize = 256;

/// On-disk size of a global or local color table: 256 entries of RGB.
///
/// The quantizer may settle fewer distinct colors, but the table is
/// always zero-padded to this length.
pub const PALETTE_BYTES: usize = 3 * MAX_COLORS;

/// Loop behavior recorded in the Netscape 2.0 application extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Play once; no Netscape extension is written.
    Once,

    /// Loop forever (loop count 0 on disk).
    #[default]
    Infinite,

    /// Loop `n` additional times after the first playback.
    Finite(u16),
}

impl Repeat {
    /// The loop-count field to write, or `None` when the extension is
    /// omitted entirely.
    pub fn loop_count(self) -> Option<u16> {
        match self {
            Repeat::Once => None,
            Repeat::Infinite => Some(0),
            Repeat::Finite(n) => Some(n),
        }
    }
}

/// Configuration for a GIF encoding session.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Frames per second used for frames that carry no explicit delay.
    pub frame_rate: f32,

    /// Loop behavior for the whole animation.
    pub repeat: Repeat,

    /// NeuQuant sampling factor in `1..=30`.
    ///
    /// 1 samples every pixel (slowest, best palette); larger values
    /// sample a prime-strided subset. Values outside the range are
    /// clamped by the quantizer.
    pub quality: u8,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            frame_rate: 30.0,
            repeat: Repeat::Infinite,
            quality: 10,
        }
    }
}

/// One RGB24 input frame, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Packed R,G,B bytes, row-major, length `width * height * 3`.
    pub pixels: &'a [u8],

    /// Display time in seconds; `None` falls back to the configured
    /// frame rate. Negative values are treated as `None`.
    pub delay: Option<f32>,

    /// Rows are stored bottom-to-top and must be reversed before
    /// quantization.
    pub flipped_y: bool,
}

impl<'a> Frame<'a> {
    /// Wrap a top-to-bottom RGB24 buffer with default timing.
    pub fn new(pixels: &'a [u8]) -> Self {
        Frame {
            pixels,
            delay: None,
            flipped_y: false,
        }
    }

    /// Set an explicit display time in seconds.
    pub fn with_delay(mut self, seconds: f32) -> Self {
        self.delay = Some(seconds);
        self
    }

    /// Mark the buffer as bottom-to-top.
    pub fn bottom_up(mut self) -> Self {
        self.flipped_y = true;
        self
    }
}
