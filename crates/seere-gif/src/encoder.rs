//! The container writer: per-frame orchestration of quantizer, pixel
//! indexing, and LZW image data.

use tracing::{debug, trace};

use seere_core::{ByteSink, EncoderConfig, Error, Frame, Result, PALETTE_BYTES};
use seere_lzw::LzwEncoder;
use seere_neuquant::NeuQuant;

use crate::blocks;

/// GIF pixel values are full bytes regardless of palette occupancy.
const COLOR_DEPTH: u8 = 8;

/// Streaming animated-GIF encoder.
///
/// Lifecycle: [`start`](Encoder::start), any number of
/// [`add_frame`](Encoder::add_frame) calls, then
/// [`finish`](Encoder::finish); afterwards the encoder is back in its
/// pre-start state and may be reused on a new sink. All working buffers
/// are owned here and reused across frames and streams.
///
/// A sink failure poisons the stream: the partial output is invalid and
/// every call short of a fresh `start` is rejected.
pub struct Encoder {
    width: u16,
    height: u16,
    config: EncoderConfig,

    quantizer: NeuQuant,
    coder: LzwEncoder,

    /// Palette of the frame currently being written, zero-padded.
    palette: [u8; PALETTE_BYTES],

    /// Palette indices for one frame, `width * height` long.
    indexed: Vec<u8>,

    /// Row-reversal scratch, allocated on the first bottom-up frame.
    flip_scratch: Vec<u8>,

    started: bool,
    first_frame: bool,
    frames_written: u64,
}

impl Encoder {
    /// Create an encoder for the given frame dimensions with the
    /// default configuration.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_config(width, height, EncoderConfig::default())
    }

    /// Create an encoder with an explicit configuration.
    pub fn with_config(width: u32, height: u32, config: EncoderConfig) -> Result<Self> {
        if width == 0 || height == 0 || width > 0xFFFF || height > 0xFFFF {
            return Err(Error::invalid_dimensions(width, height));
        }

        Ok(Encoder {
            width: width as u16,
            height: height as u16,
            quantizer: NeuQuant::new(config.quality),
            coder: LzwEncoder::new(),
            palette: [0; PALETTE_BYTES],
            indexed: vec![0; width as usize * height as usize],
            flip_scratch: Vec::new(),
            config,
            started: false,
            first_frame: true,
            frames_written: 0,
        })
    }

    /// Number of frames written to the current stream.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Begin a stream: signature and logical screen descriptor.
    pub fn start<S: ByteSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        if self.started {
            return Err(Error::AlreadyStarted);
        }

        blocks::header(sink)?;
        blocks::logical_screen_descriptor(sink, self.width, self.height)?;

        self.started = true;
        self.first_frame = true;
        self.frames_written = 0;
        debug!("started {}x{} stream", self.width, self.height);
        Ok(())
    }

    /// Quantize, index, and write one frame.
    ///
    /// The first frame carries the global color table (and the Netscape
    /// looping extension unless `repeat` is `Once`); every later frame
    /// carries its own local table.
    pub fn add_frame<S: ByteSink + ?Sized>(&mut self, sink: &mut S, frame: &Frame<'_>) -> Result<()> {
        if !self.started {
            return Err(Error::NotStarted);
        }

        let expected = self.width as usize * self.height as usize * 3;
        if frame.pixels.len() != expected {
            return Err(Error::frame_size_mismatch(expected, frame.pixels.len()));
        }

        let result = self.write_frame(sink, frame);
        if let Err(ref err) = result {
            if err.is_fatal() {
                self.started = false;
            }
        }
        result
    }

    /// End the stream with the trailer and reset for reuse.
    pub fn finish<S: ByteSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        if !self.started {
            return Err(Error::NotStarted);
        }
        self.started = false;

        blocks::trailer(sink)?;
        sink.flush()?;

        debug!("finished stream after {} frames", self.frames_written);
        self.first_frame = true;
        Ok(())
    }

    fn write_frame<S: ByteSink + ?Sized>(&mut self, sink: &mut S, frame: &Frame<'_>) -> Result<()> {
        let pixels: &[u8] = if frame.flipped_y {
            flip_rows(
                frame.pixels,
                self.width as usize * 3,
                &mut self.flip_scratch,
            );
            &self.flip_scratch
        } else {
            frame.pixels
        };

        self.quantizer.quantize(pixels)?;
        self.quantizer.color_map(&mut self.palette);

        for (slot, px) in self.indexed.iter_mut().zip(pixels.chunks_exact(3)) {
            *slot = self.quantizer.map(px[0], px[1], px[2]);
        }

        if self.first_frame {
            blocks::color_table(sink, &self.palette)?;
            if let Some(count) = self.config.repeat.loop_count() {
                blocks::netscape_loop(sink, count)?;
            }
        }

        let delay = self.delay_hundredths(frame);
        blocks::graphic_control(sink, delay)?;
        blocks::image_descriptor(sink, self.width, self.height, !self.first_frame)?;
        if !self.first_frame {
            blocks::color_table(sink, &self.palette)?;
        }

        self.coder.encode(&self.indexed, COLOR_DEPTH, sink)?;

        self.first_frame = false;
        self.frames_written += 1;
        trace!(
            "frame {}: {} indexed pixels, delay {}cs",
            self.frames_written,
            self.indexed.len(),
            delay
        );
        Ok(())
    }

    /// Frame delay in hundredths of a second, falling back to the
    /// configured frame rate.
    fn delay_hundredths(&self, frame: &Frame<'_>) -> u16 {
        let seconds = match frame.delay {
            Some(d) if d >= 0.0 => d,
            _ => 1.0 / self.config.frame_rate,
        };
        // `as` saturates, so absurd delays pin at the format maximum.
        (seconds * 100.0).floor() as u16
    }
}

/// Copy `pixels` into `scratch` with the row order reversed.
fn flip_rows(pixels: &[u8], row_bytes: usize, scratch: &mut Vec<u8>) {
    scratch.resize(pixels.len(), 0);
    for (dst, src) in scratch
        .chunks_exact_mut(row_bytes)
        .zip(pixels.chunks_exact(row_bytes).rev())
    {
        dst.copy_from_slice(src);
    }
}
