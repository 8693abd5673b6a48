//! Hash table, code-width state machine, and sub-block packetizer.

use seere_core::{ByteSink, Result};

/// Maximum code width in bits.
const MAX_BITS: i32 = 12;

/// First code past the 12-bit space; reaching it forces a table clear.
const MAX_MAX_CODE: i32 = 1 << MAX_BITS;

/// Hash table size: a prime giving ~80% occupancy at table-full.
const HSIZE: i32 = 5003;

/// GIF sub-blocks carry at most 255 bytes; the accumulator flushes one
/// byte early, mirroring the original coder.
const PACKET_BYTES: usize = 254;

/// Low-bit masks indexed by bit count.
const MASKS: [u32; 17] = [
    0x0000, 0x0001, 0x0003, 0x0007, 0x000F, 0x001F, 0x003F, 0x007F, 0x00FF, 0x01FF, 0x03FF, 0x07FF,
    0x0FFF, 0x1FFF, 0x3FFF, 0x7FFF, 0xFFFF,
];

/// Variable-width LZW coder for one frame's indexed pixels.
///
/// The hash tables and packet accumulator are allocated once; `encode`
/// re-initializes them, so one coder serves every frame of a stream.
pub struct LzwEncoder {
    /// Open-addressed table of `(pixel << MAX_BITS) | prefix` keys,
    /// `-1` marking an empty slot.
    htab: Vec<i32>,

    /// Code assigned to the key stored at the same `htab` slot.
    codetab: Vec<i32>,

    /// Sub-block staging area.
    accum: [u8; 256],
    a_count: usize,

    /// Bit accumulator; codes are packed LSB-first.
    cur_accum: u32,
    cur_bits: i32,

    n_bits: i32,
    maxcode: i32,
    init_bits: i32,
    clear_code: i32,
    eof_code: i32,
    free_ent: i32,
    clear_flg: bool,
}

impl LzwEncoder {
    /// Create a coder with empty tables.
    pub fn new() -> Self {
        LzwEncoder {
            htab: vec![-1; HSIZE as usize],
            codetab: vec![0; HSIZE as usize],
            accum: [0; 256],
            a_count: 0,
            cur_accum: 0,
            cur_bits: 0,
            n_bits: 0,
            maxcode: 0,
            init_bits: 0,
            clear_code: 0,
            eof_code: 0,
            free_ent: 0,
            clear_flg: false,
        }
    }

    /// Compress `pixels` onto `sink` as a GIF image-data section:
    /// one initial-code-size byte, the sub-block chain, and the zero
    /// terminator.
    ///
    /// `color_depth` is the bit depth of the pixel values; GIF requires
    /// an initial code size of at least 2.
    pub fn encode<S: ByteSink + ?Sized>(
        &mut self,
        pixels: &[u8],
        color_depth: u8,
        sink: &mut S,
    ) -> Result<()> {
        let init_code_size = color_depth.max(2);
        sink.write_u8(init_code_size)?;
        self.compress(i32::from(init_code_size) + 1, pixels, sink)?;
        sink.write_u8(0)
    }

    fn compress<S: ByteSink + ?Sized>(
        &mut self,
        init_bits: i32,
        pixels: &[u8],
        sink: &mut S,
    ) -> Result<()> {
        self.init_bits = init_bits;
        self.clear_flg = false;
        self.n_bits = init_bits;
        self.maxcode = max_code(self.n_bits);

        self.clear_code = 1 << (init_bits - 1);
        self.eof_code = self.clear_code + 1;
        self.free_ent = self.clear_code + 2;

        self.a_count = 0;
        self.cur_accum = 0;
        self.cur_bits = 0;

        // Primary hash shift: scale the pixel into the table's bit width.
        let mut hshift = 0;
        let mut fcode = HSIZE;
        while fcode < 65536 {
            hshift += 1;
            fcode *= 2;
        }
        let hshift = 8 - hshift;

        self.htab.fill(-1);
        self.output(self.clear_code, sink)?;

        let mut iter = pixels.iter();
        let mut ent = match iter.next() {
            Some(&first) => i32::from(first),
            // Degenerate but well-formed: an immediate end of stream.
            None => {
                self.output(self.eof_code, sink)?;
                return Ok(());
            }
        };

        'next_pixel: for &pixel in iter {
            let c = i32::from(pixel);
            let fcode = (c << MAX_BITS) + ent;
            let mut i = (c << hshift) ^ ent;

            if self.htab[i as usize] == fcode {
                ent = self.codetab[i as usize];
                continue;
            }

            if self.htab[i as usize] >= 0 {
                // Secondary probe, relatively prime to the table size.
                let disp = if i == 0 { 1 } else { HSIZE - i };
                loop {
                    i -= disp;
                    if i < 0 {
                        i += HSIZE;
                    }
                    if self.htab[i as usize] == fcode {
                        ent = self.codetab[i as usize];
                        continue 'next_pixel;
                    }
                    if self.htab[i as usize] < 0 {
                        break;
                    }
                }
            }

            self.output(ent, sink)?;
            ent = c;
            if self.free_ent < MAX_MAX_CODE {
                self.codetab[i as usize] = self.free_ent;
                self.free_ent += 1;
                self.htab[i as usize] = fcode;
            } else {
                self.clear_table(sink)?;
            }
        }

        self.output(ent, sink)?;
        self.output(self.eof_code, sink)
    }

    /// Pack one code into the bit accumulator, emitting whole bytes and
    /// adjusting the code width afterwards.
    fn output<S: ByteSink + ?Sized>(&mut self, code: i32, sink: &mut S) -> Result<()> {
        self.cur_accum &= MASKS[self.cur_bits as usize];
        if self.cur_bits > 0 {
            self.cur_accum |= (code as u32) << self.cur_bits;
        } else {
            self.cur_accum = code as u32;
        }
        self.cur_bits += self.n_bits;

        while self.cur_bits >= 8 {
            self.push_byte((self.cur_accum & 0xFF) as u8, sink)?;
            self.cur_accum >>= 8;
            self.cur_bits -= 8;
        }

        // Grow the width once the next code would not fit, or snap back
        // after a CLEAR.
        if self.free_ent > self.maxcode || self.clear_flg {
            if self.clear_flg {
                self.n_bits = self.init_bits;
                self.maxcode = max_code(self.n_bits);
                self.clear_flg = false;
            } else {
                self.n_bits += 1;
                self.maxcode = if self.n_bits == MAX_BITS {
                    MAX_MAX_CODE
                } else {
                    max_code(self.n_bits)
                };
            }
        }

        if code == self.eof_code {
            // Drain the remaining fraction of a byte and close the packet.
            while self.cur_bits > 0 {
                self.push_byte((self.cur_accum & 0xFF) as u8, sink)?;
                self.cur_accum >>= 8;
                self.cur_bits -= 8;
            }
            self.flush_packet(sink)?;
        }

        Ok(())
    }

    /// Reset the dictionary mid-stream and tell the decoder.
    fn clear_table<S: ByteSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        self.htab.fill(-1);
        self.free_ent = self.clear_code + 2;
        self.clear_flg = true;
        self.output(self.clear_code, sink)
    }

    /// Stage one data byte, flushing a full sub-block at 254 bytes.
    #[inline]
    fn push_byte<S: ByteSink + ?Sized>(&mut self, byte: u8, sink: &mut S) -> Result<()> {
        self.accum[self.a_count] = byte;
        self.a_count += 1;
        if self.a_count >= PACKET_BYTES {
            self.flush_packet(sink)?;
        }
        Ok(())
    }

    /// Emit the staged bytes as one length-prefixed sub-block.
    ///
    /// Never writes a zero-length block; the section terminator comes
    /// from `encode`.
    fn flush_packet<S: ByteSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        if self.a_count > 0 {
            sink.write_u8(self.a_count as u8)?;
            sink.write_bytes(&self.accum[..self.a_count])?;
            self.a_count = 0;
        }
        Ok(())
    }
}

impl Default for LzwEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest code expressible in `n_bits`.
#[inline]
fn max_code(n_bits: i32) -> i32 {
    (1 << n_bits) - 1
}
