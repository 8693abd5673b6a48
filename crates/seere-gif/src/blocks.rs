//! Low-level GIF89a block writers.
//!
//! Each function emits exactly one block of the container format so the
//! encoder reads as orchestration. Multi-byte fields are little-endian.

use seere_core::{ByteSink, Result, PALETTE_BYTES};

/// Extension introducer.
const EXTENSION: u8 = 0x21;

/// Application extension label.
const APPLICATION: u8 = 0xFF;

/// Graphic control extension label.
const GRAPHIC_CONTROL: u8 = 0xF9;

/// Image descriptor separator.
const IMAGE_SEPARATOR: u8 = 0x2C;

/// Stream trailer.
const TRAILER: u8 = 0x3B;

/// Color-table-present bit of the packed descriptor fields.
const TABLE_PRESENT: u8 = 0x80;

/// Color resolution field: 8 bits per primary, shifted into place.
const COLOR_RESOLUTION: u8 = 0x70;

/// Table size field: 2^(7+1) = 256 entries.
const TABLE_SIZE: u8 = 0x07;

/// `"GIF89a"` signature and version.
pub(crate) fn header<S: ByteSink + ?Sized>(sink: &mut S) -> Result<()> {
    sink.write_ascii("GIF89a")
}

/// Logical screen descriptor announcing a 256-entry global color table.
pub(crate) fn logical_screen_descriptor<S: ByteSink + ?Sized>(
    sink: &mut S,
    width: u16,
    height: u16,
) -> Result<()> {
    sink.write_u16_le(width)?;
    sink.write_u16_le(height)?;
    sink.write_u8(TABLE_PRESENT | COLOR_RESOLUTION | TABLE_SIZE)?;
    sink.write_u8(0)?; // background color index
    sink.write_u8(0) // pixel aspect ratio: unspecified
}

/// A global or local color table, always the full 768 bytes.
pub(crate) fn color_table<S: ByteSink + ?Sized>(
    sink: &mut S,
    palette: &[u8; PALETTE_BYTES],
) -> Result<()> {
    sink.write_bytes(palette)
}

/// Netscape 2.0 application extension carrying the loop count.
///
/// A count of zero means loop forever; `n` means `n` repeats after the
/// first playback.
pub(crate) fn netscape_loop<S: ByteSink + ?Sized>(sink: &mut S, count: u16) -> Result<()> {
    sink.write_u8(EXTENSION)?;
    sink.write_u8(APPLICATION)?;
    sink.write_u8(11)?;
    sink.write_ascii("NETSCAPE2.0")?;
    sink.write_u8(3)?; // sub-block size
    sink.write_u8(1)?; // looping sub-block id
    sink.write_u16_le(count)?;
    sink.write_u8(0)
}

/// Graphic control extension with the frame delay in hundredths of a
/// second. No transparency, no disposal.
pub(crate) fn graphic_control<S: ByteSink + ?Sized>(sink: &mut S, delay: u16) -> Result<()> {
    sink.write_u8(EXTENSION)?;
    sink.write_u8(GRAPHIC_CONTROL)?;
    sink.write_u8(4)?;
    sink.write_u8(0)?; // packed: no disposal, no transparent color
    sink.write_u16_le(delay)?;
    sink.write_u8(0)?; // transparent color index, unused
    sink.write_u8(0)
}

/// Image descriptor for a full-screen frame at the origin.
///
/// `local_table` announces a 768-byte local color table following the
/// descriptor; the first frame uses the global table instead.
pub(crate) fn image_descriptor<S: ByteSink + ?Sized>(
    sink: &mut S,
    width: u16,
    height: u16,
    local_table: bool,
) -> Result<()> {
    sink.write_u8(IMAGE_SEPARATOR)?;
    sink.write_u16_le(0)?; // left
    sink.write_u16_le(0)?; // top
    sink.write_u16_le(width)?;
    sink.write_u16_le(height)?;
    if local_table {
        sink.write_u8(TABLE_PRESENT | TABLE_SIZE)
    } else {
        sink.write_u8(0)
    }
}

/// Stream trailer byte.
pub(crate) fn trailer<S: ByteSink + ?Sized>(sink: &mut S) -> Result<()> {
    sink.write_u8(TRAILER)
}
