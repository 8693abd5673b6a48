//! Shared test helpers: a strict GIF89a stream walker and a reference
//! LZW decoder, independent of the encoder's own code paths.
#![allow(dead_code)]

/// One image of a parsed stream.
pub struct ParsedFrame {
    /// GCE delay in hundredths of a second.
    pub delay: u16,
    /// Local color table, if the descriptor announced one.
    pub local_palette: Option<Vec<u8>>,
    /// Initial LZW code size byte.
    pub min_code_size: u8,
    /// Concatenated sub-block payloads.
    pub data: Vec<u8>,
    /// Largest sub-block length byte seen.
    pub max_sub_block: usize,
}

impl ParsedFrame {
    /// Decode the frame's LZW data back to palette indices.
    pub fn indices(&self) -> Vec<u8> {
        lzw_decode(self.min_code_size, &self.data)
    }
}

/// A parsed GIF89a stream.
pub struct ParsedGif {
    pub width: u16,
    pub height: u16,
    pub global_palette: Vec<u8>,
    /// Netscape loop count, if the extension was present.
    pub loop_count: Option<u16>,
    pub frames: Vec<ParsedFrame>,
}

/// Walk a complete GIF89a byte stream, panicking on any framing
/// violation. This is the oracle for the container-layout invariants.
pub fn parse_gif(bytes: &[u8]) -> ParsedGif {
    let mut r = Reader { bytes, pos: 0 };

    assert_eq!(r.take(6), b"GIF89a", "signature");
    let width = r.u16_le();
    let height = r.u16_le();
    assert_eq!(r.u8(), 0xF7, "LSD packed field");
    assert_eq!(r.u8(), 0, "background index");
    assert_eq!(r.u8(), 0, "aspect ratio");
    let global_palette = r.take(768).to_vec();

    let mut loop_count = None;
    let mut pending_delay: Option<u16> = None;
    let mut frames = Vec::new();

    loop {
        match r.u8() {
            0x21 => match r.u8() {
                0xFF => {
                    assert_eq!(r.u8(), 11, "application block size");
                    assert_eq!(r.take(11), b"NETSCAPE2.0");
                    assert_eq!(r.u8(), 3, "loop sub-block size");
                    assert_eq!(r.u8(), 1, "loop sub-block id");
                    loop_count = Some(r.u16_le());
                    assert_eq!(r.u8(), 0, "application terminator");
                }
                0xF9 => {
                    assert_eq!(r.u8(), 4, "GCE block size");
                    assert_eq!(r.u8(), 0, "GCE packed flags");
                    pending_delay = Some(r.u16_le());
                    assert_eq!(r.u8(), 0, "transparent index");
                    assert_eq!(r.u8(), 0, "GCE terminator");
                }
                label => panic!("unexpected extension label 0x{label:02X}"),
            },
            0x2C => {
                assert_eq!(r.u16_le(), 0, "image left");
                assert_eq!(r.u16_le(), 0, "image top");
                assert_eq!(r.u16_le(), width, "image width");
                assert_eq!(r.u16_le(), height, "image height");
                let packed = r.u8();
                let local_palette = match packed {
                    0x00 => None,
                    0x87 => Some(r.take(768).to_vec()),
                    other => panic!("unexpected image packed field 0x{other:02X}"),
                };

                let min_code_size = r.u8();
                let mut data = Vec::new();
                let mut max_sub_block = 0;
                loop {
                    let len = r.u8() as usize;
                    if len == 0 {
                        break;
                    }
                    max_sub_block = max_sub_block.max(len);
                    data.extend_from_slice(r.take(len));
                }

                frames.push(ParsedFrame {
                    delay: pending_delay.take().expect("image without GCE"),
                    local_palette,
                    min_code_size,
                    data,
                    max_sub_block,
                });
            }
            0x3B => break,
            byte => panic!("unexpected block introducer 0x{byte:02X}"),
        }
    }

    assert_eq!(r.pos, bytes.len(), "bytes after trailer");
    ParsedGif {
        width,
        height,
        global_palette,
        loop_count,
        frames,
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn u8(&mut self) -> u8 {
        let v = self.bytes[self.pos];
        self.pos += 1;
        v
    }

    fn u16_le(&mut self) -> u16 {
        u16::from(self.u8()) | (u16::from(self.u8()) << 8)
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let s = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        s
    }
}

/// Standards-compliant GIF LZW decoder: LSB-first variable-width codes,
/// clear/EOF handling, the KwKwK case, and the 12-bit table cap.
pub fn lzw_decode(min_code_size: u8, data: &[u8]) -> Vec<u8> {
    let clear = 1u16 << min_code_size;
    let eof = clear + 1;

    let base_table = || -> Vec<Vec<u8>> {
        let mut t: Vec<Vec<u8>> = (0..clear).map(|i| vec![i as u8]).collect();
        t.push(Vec::new()); // clear code
        t.push(Vec::new()); // end code
        t
    };

    let mut table = base_table();
    let mut code_size = u32::from(min_code_size) + 1;
    let mut acc = 0u32;
    let mut bits = 0u32;
    let mut pos = 0usize;
    let mut prev: Option<u16> = None;
    let mut out = Vec::new();

    loop {
        while bits < code_size {
            assert!(pos < data.len(), "ran out of LZW data before end code");
            acc |= u32::from(data[pos]) << bits;
            pos += 1;
            bits += 8;
        }
        let code = (acc & ((1 << code_size) - 1)) as u16;
        acc >>= code_size;
        bits -= code_size;

        if code == clear {
            table = base_table();
            code_size = u32::from(min_code_size) + 1;
            prev = None;
            continue;
        }
        if code == eof {
            break;
        }

        let entry: Vec<u8> = if (code as usize) < table.len() {
            table[code as usize].clone()
        } else if code as usize == table.len() {
            let p = &table[prev.expect("KwKwK code with no previous code") as usize];
            let mut e = p.clone();
            e.push(p[0]);
            e
        } else {
            panic!("code {code} beyond table of {}", table.len());
        };

        out.extend_from_slice(&entry);

        if let Some(p) = prev {
            if table.len() < 4096 {
                let mut grown = table[p as usize].clone();
                grown.push(entry[0]);
                table.push(grown);
            }
        }
        prev = Some(code);

        if table.len() >= (1 << code_size) as usize && code_size < 12 {
            code_size += 1;
        }
    }

    out
}
