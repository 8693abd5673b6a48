//! LZW roundtrip: the encoded image data must decode back to exactly
//! the indices the quantizer assigned.

mod common;

use common::{lzw_decode, parse_gif};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seere::{encode_frames, EncoderConfig, Frame, LzwEncoder, NeuQuant};

fn random_pixels(count: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count * 3).map(|_| rng.gen()).collect()
}

#[test]
fn raw_coder_roundtrips_arbitrary_indices() {
    let mut rng = StdRng::seed_from_u64(7);
    for len in [1usize, 2, 255, 1000, 10_000] {
        let indices: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

        let mut section = Vec::new();
        LzwEncoder::new().encode(&indices, 8, &mut section).unwrap();

        assert_eq!(section[0], 8);
        assert_eq!(*section.last().unwrap(), 0);
        let payload: Vec<u8> = {
            // Strip the sub-block framing.
            let mut data = Vec::new();
            let mut pos = 1;
            loop {
                let n = section[pos] as usize;
                pos += 1;
                if n == 0 {
                    break;
                }
                data.extend_from_slice(&section[pos..pos + n]);
                pos += n;
            }
            data
        };

        assert_eq!(lzw_decode(8, &payload), indices, "len {len}");
    }
}

#[test]
fn encoded_frames_decode_to_quantizer_indices() {
    let pixels = random_pixels(48 * 48, 99);
    let config = EncoderConfig::default();
    let out = encode_frames(48, 48, config.clone(), &[Frame::new(&pixels)]).unwrap();

    // Recreate the quantizer the encoder ran and derive the expected
    // index for every pixel.
    let mut nq = NeuQuant::new(config.quality);
    nq.quantize(&pixels).unwrap();
    let expected: Vec<u8> = pixels
        .chunks_exact(3)
        .map(|px| nq.map(px[0], px[1], px[2]))
        .collect();

    let gif = parse_gif(&out);
    assert_eq!(gif.frames[0].indices(), expected);
}

#[test]
fn dictionary_reset_roundtrips() {
    // Enough high-entropy pixels to fill the 4096-entry table and force
    // at least one mid-stream CLEAR.
    let pixels = random_pixels(128 * 128, 3);
    let out = encode_frames(128, 128, EncoderConfig::default(), &[Frame::new(&pixels)]).unwrap();

    let gif = parse_gif(&out);
    let indices = gif.frames[0].indices();
    assert_eq!(indices.len(), 128 * 128);
}

#[test]
fn all_zero_frame_compresses_to_one_sub_block() {
    // 23x23 pixels = 1587 input bytes, above the full-sampling
    // threshold, all black.
    let pixels = vec![0u8; 23 * 23 * 3];
    let out = encode_frames(23, 23, EncoderConfig::default(), &[Frame::new(&pixels)]).unwrap();

    let gif = parse_gif(&out);
    let frame = &gif.frames[0];
    assert!(
        frame.data.len() <= 254,
        "single-color data should fit one sub-block, got {}",
        frame.data.len()
    );

    let indices = frame.indices();
    assert_eq!(indices.len(), 23 * 23);
    assert!(indices.iter().all(|&i| i == indices[0]));
    let entry = &gif.global_palette[indices[0] as usize * 3..][..3];
    assert_eq!(entry, [0, 0, 0]);
}

#[test]
fn single_color_output_stays_small() {
    let pixel_count = 64 * 64;
    let pixels: Vec<u8> = [0x30u8, 0x60, 0x90]
        .iter()
        .copied()
        .cycle()
        .take(pixel_count * 3)
        .collect();
    let out = encode_frames(64, 64, EncoderConfig::default(), &[Frame::new(&pixels)]).unwrap();

    let gif = parse_gif(&out);
    let frame = &gif.frames[0];
    assert!(
        frame.data.len() <= pixel_count / 8 + 16,
        "run-length data blew up: {} bytes for {} pixels",
        frame.data.len(),
        pixel_count
    );
    assert!(frame.indices().iter().all(|&i| i == frame.indices()[0]));
}
