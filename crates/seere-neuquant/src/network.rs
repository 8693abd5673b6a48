//! The Kohonen network: training schedule, index build, nearest-color
//! lookup, and palette readout.

use seere_core::{Error, Result, PALETTE_BYTES};

/// Number of neurons; one palette entry each.
const NETSIZE: usize = 256;

/// Highest neuron position.
const MAXNETPOS: i32 = NETSIZE as i32 - 1;

/// Fractional bits carried by neuron color positions.
const NETBIASSHIFT: i32 = 4;

/// Learning cycles over the sampled pixel stream.
const NCYCLES: i32 = 100;

/// Fractional bits of the frequency/bias accumulators.
const INTBIASSHIFT: i32 = 16;
const INTBIAS: i32 = 1 << INTBIASSHIFT;

/// Bias adjustment rate: bias gains `freq >> betashift` per contest.
const GAMMASHIFT: i32 = 10;
const BETASHIFT: i32 = 10;
const BETA: i32 = INTBIAS >> BETASHIFT;
const BETAGAMMA: i32 = INTBIAS << (GAMMASHIFT - BETASHIFT);

/// Initial neighborhood reaches a quarter of the network to either side.
const INITRAD: usize = NETSIZE >> 3;
const RADIUSBIASSHIFT: i32 = 6;
const RADIUSBIAS: i32 = 1 << RADIUSBIASSHIFT;
const INITRADIUS: i32 = (INITRAD as i32) * RADIUSBIAS;

/// Radius shrinks by 1/30 per cycle.
const RADIUSDEC: i32 = 30;

/// Learning rate, biased by 10 bits.
const ALPHABIASSHIFT: i32 = 10;
const INITALPHA: i32 = 1 << ALPHABIASSHIFT;

/// Fixed-point scale of the precomputed neighborhood weights.
const RADBIASSHIFT: i32 = 8;
const RADBIAS: i32 = 1 << RADBIASSHIFT;
const ALPHARADBSHIFT: i32 = ALPHABIASSHIFT + RADBIASSHIFT;
const ALPHARADBIAS: i32 = 1 << ALPHARADBSHIFT;

/// Sampling strides; four primes near 500 so any image length is
/// coprime with at least one of them.
const PRIME1: usize = 499;
const PRIME2: usize = 491;
const PRIME3: usize = 487;
const PRIME4: usize = 503;

/// Below this many input bytes every pixel is sampled.
const MIN_PICTURE_BYTES: usize = 3 * PRIME4;

/// A 256-neuron self-organizing map that learns a GIF palette from a
/// packed 24-bit pixel buffer.
///
/// Channel handling is positional: network slot 0 tracks byte 0 of each
/// input triple, slot 1 byte 1, slot 2 byte 2, and the same order is
/// used by [`NeuQuant::map`] and the palette readout, so an RGB caller
/// gets an RGB palette back. Slot names below follow the classic b/g/r
/// convention; the index is built on slot 1, which is green either way.
pub struct NeuQuant {
    /// Flat neuron storage, `NETSIZE * 4`: three color slots plus the
    /// neuron's original index, recorded when the network is unbiased.
    network: Vec<i32>,

    /// Lookup acceleration: for each green value, a starting position
    /// in the green-sorted network.
    netindex: [i32; 256],

    /// Contest bias per neuron, favoring rarely-winning neurons.
    bias: Vec<i32>,

    /// Contest win frequency per neuron.
    freq: Vec<i32>,

    /// Precomputed neighborhood weights for the current radius.
    radpower: Vec<i32>,

    /// Configured sampling factor, `1..=30`.
    samplefac: i32,
}

impl NeuQuant {
    /// Create a quantizer with the given sampling factor.
    ///
    /// `sample` is clamped to `1..=30`; 1 trains on every pixel.
    pub fn new(sample: u8) -> Self {
        NeuQuant {
            network: vec![0; NETSIZE * 4],
            netindex: [0; 256],
            bias: vec![0; NETSIZE],
            freq: vec![0; NETSIZE],
            radpower: vec![0; INITRAD],
            samplefac: i32::from(sample.clamp(1, 30)),
        }
    }

    /// Train the network on `picture` and build the lookup index.
    ///
    /// `picture` must be a non-empty whole number of 3-byte pixels.
    /// Re-running with the same input produces a byte-identical palette:
    /// every working array is re-initialized here.
    pub fn quantize(&mut self, picture: &[u8]) -> Result<()> {
        if picture.is_empty() || picture.len() % 3 != 0 {
            return Err(Error::InvalidPixelBuffer {
                len: picture.len(),
            });
        }

        self.init();
        self.learn(picture);
        self.unbias();
        self.build_index();
        Ok(())
    }

    /// Write the learned palette into `map`, ordered by original neuron
    /// index so it agrees with [`NeuQuant::map`] return values.
    pub fn color_map(&self, map: &mut [u8; PALETTE_BYTES]) {
        for i in 0..NETSIZE {
            let original = self.network[i * 4 + 3] as usize;
            map[original * 3] = self.network[i * 4] as u8;
            map[original * 3 + 1] = self.network[i * 4 + 1] as u8;
            map[original * 3 + 2] = self.network[i * 4 + 2] as u8;
        }
    }

    /// Find the palette index nearest to the given color under L1
    /// distance, searching outward from the green-channel index.
    pub fn map(&self, b: u8, g: u8, r: u8) -> u8 {
        let (b, g, r) = (i32::from(b), i32::from(g), i32::from(r));

        // Biggest possible distance is 256 * 3.
        let mut bestd = 1000;
        let mut best = -1;

        let mut i = self.netindex[g as usize];
        let mut j = i - 1;

        while i < NETSIZE as i32 || j >= 0 {
            if i < NETSIZE as i32 {
                let p = &self.network[i as usize * 4..i as usize * 4 + 4];
                let mut dist = p[1] - g;
                if dist >= bestd {
                    // Sorted on green: nothing further up can win.
                    i = NETSIZE as i32;
                } else {
                    i += 1;
                    if dist < 0 {
                        dist = -dist;
                    }
                    dist += (p[0] - b).abs();
                    if dist < bestd {
                        dist += (p[2] - r).abs();
                        if dist < bestd {
                            bestd = dist;
                            best = p[3];
                        }
                    }
                }
            }
            if j >= 0 {
                let p = &self.network[j as usize * 4..j as usize * 4 + 4];
                let mut dist = g - p[1];
                if dist >= bestd {
                    j = -1;
                } else {
                    j -= 1;
                    if dist < 0 {
                        dist = -dist;
                    }
                    dist += (p[0] - b).abs();
                    if dist < bestd {
                        dist += (p[2] - r).abs();
                        if dist < bestd {
                            bestd = dist;
                            best = p[3];
                        }
                    }
                }
            }
        }

        best as u8
    }

    /// Reset neurons to the initial gray diagonal and level the contest
    /// state.
    fn init(&mut self) {
        for i in 0..NETSIZE {
            let v = ((i as i32) << (NETBIASSHIFT + 8)) / NETSIZE as i32;
            self.network[i * 4] = v;
            self.network[i * 4 + 1] = v;
            self.network[i * 4 + 2] = v;
            self.network[i * 4 + 3] = 0;
            self.freq[i] = INTBIAS / NETSIZE as i32;
            self.bias[i] = 0;
        }
        self.netindex = [0; 256];
    }

    /// Run the sampling loop with the shrinking alpha/radius schedule.
    fn learn(&mut self, picture: &[u8]) {
        let lengthcount = picture.len();
        let samplefac = if lengthcount < MIN_PICTURE_BYTES {
            1
        } else {
            self.samplefac
        };

        let alphadec = 30 + (samplefac - 1) / 3;
        let samplepixels = lengthcount / (3 * samplefac as usize);
        let delta = ((samplepixels as i32) / NCYCLES).max(1);

        let mut alpha = INITALPHA;
        let mut radius = INITRADIUS;
        let mut rad = radius >> RADIUSBIASSHIFT;
        if rad <= 1 {
            rad = 0;
        }
        self.fill_radpower(rad, alpha);

        let step = if lengthcount < MIN_PICTURE_BYTES {
            3
        } else if lengthcount % PRIME1 != 0 {
            3 * PRIME1
        } else if lengthcount % PRIME2 != 0 {
            3 * PRIME2
        } else if lengthcount % PRIME3 != 0 {
            3 * PRIME3
        } else {
            3 * PRIME4
        };

        let mut pix = 0usize;
        for i in 1..=samplepixels {
            let b = i32::from(picture[pix]) << NETBIASSHIFT;
            let g = i32::from(picture[pix + 1]) << NETBIASSHIFT;
            let r = i32::from(picture[pix + 2]) << NETBIASSHIFT;

            let j = self.contest(b, g, r);
            self.alter_single(alpha, j, b, g, r);
            if rad != 0 {
                self.alter_neighbors(rad, j, b, g, r);
            }

            pix += step;
            if pix >= lengthcount {
                pix -= lengthcount;
            }

            if (i as i32) % delta == 0 {
                alpha -= alpha / alphadec;
                radius -= radius / RADIUSDEC;
                rad = radius >> RADIUSBIASSHIFT;
                if rad <= 1 {
                    rad = 0;
                }
                self.fill_radpower(rad, alpha);
            }
        }
    }

    /// Precompute the quadratic falloff weights for the current radius.
    fn fill_radpower(&mut self, rad: i32, alpha: i32) {
        let radsq = rad * rad;
        for i in 0..rad {
            self.radpower[i as usize] = alpha * (((radsq - i * i) * RADBIAS) / radsq);
        }
    }

    /// Pick the winning neuron for one sample.
    ///
    /// Finds the closest neuron by L1 distance and the closest under the
    /// running bias; decays every neuron's frequency and feeds it into
    /// the bias so overused neurons are pushed aside. The biased winner
    /// is the one that learns.
    fn contest(&mut self, b: i32, g: i32, r: i32) -> i32 {
        let mut bestd = i32::MAX;
        let mut bestbiasd = bestd;
        let mut bestpos = -1;
        let mut bestbiaspos = -1;

        for i in 0..NETSIZE {
            let n = &self.network[i * 4..i * 4 + 3];
            let dist = (n[0] - b).abs() + (n[1] - g).abs() + (n[2] - r).abs();
            if dist < bestd {
                bestd = dist;
                bestpos = i as i32;
            }

            let biasdist = dist - (self.bias[i] >> (INTBIASSHIFT - NETBIASSHIFT));
            if biasdist < bestbiasd {
                bestbiasd = biasdist;
                bestbiaspos = i as i32;
            }

            // Decay first, then feed the decayed amount into the bias.
            let betafreq = self.freq[i] >> BETASHIFT;
            self.freq[i] -= betafreq;
            self.bias[i] += betafreq << GAMMASHIFT;
        }

        self.freq[bestpos as usize] += BETA;
        self.bias[bestpos as usize] -= BETAGAMMA;
        bestbiaspos
    }

    /// Move one neuron toward the sample by `alpha / INITALPHA`.
    fn alter_single(&mut self, alpha: i32, i: i32, b: i32, g: i32, r: i32) {
        let n = &mut self.network[i as usize * 4..i as usize * 4 + 3];
        n[0] -= (alpha * (n[0] - b)) / INITALPHA;
        n[1] -= (alpha * (n[1] - g)) / INITALPHA;
        n[2] -= (alpha * (n[2] - r)) / INITALPHA;
    }

    /// Pull the winner's neighbors toward the sample with the
    /// precomputed falloff, walking outward in both directions.
    fn alter_neighbors(&mut self, rad: i32, i: i32, b: i32, g: i32, r: i32) {
        let lo = (i - rad).max(-1);
        let hi = (i + rad).min(NETSIZE as i32);

        let mut j = i + 1;
        let mut k = i - 1;
        let mut m = 1usize;
        while j < hi || k > lo {
            let a = self.radpower[m];
            m += 1;
            if j < hi {
                let n = &mut self.network[j as usize * 4..j as usize * 4 + 3];
                n[0] -= (a * (n[0] - b)) / ALPHARADBIAS;
                n[1] -= (a * (n[1] - g)) / ALPHARADBIAS;
                n[2] -= (a * (n[2] - r)) / ALPHARADBIAS;
                j += 1;
            }
            if k > lo {
                let n = &mut self.network[k as usize * 4..k as usize * 4 + 3];
                n[0] -= (a * (n[0] - b)) / ALPHARADBIAS;
                n[1] -= (a * (n[1] - g)) / ALPHARADBIAS;
                n[2] -= (a * (n[2] - r)) / ALPHARADBIAS;
                k -= 1;
            }
        }
    }

    /// Strip the fractional bits and record each neuron's original
    /// position in its fourth slot.
    fn unbias(&mut self) {
        for i in 0..NETSIZE {
            self.network[i * 4] >>= NETBIASSHIFT;
            self.network[i * 4 + 1] >>= NETBIASSHIFT;
            self.network[i * 4 + 2] >>= NETBIASSHIFT;
            self.network[i * 4 + 3] = i as i32;
        }
    }

    /// Sort the network on green (selection sort, swapping whole
    /// neurons) and build `netindex` so `map` can start near the answer.
    fn build_index(&mut self) {
        let mut previouscol = 0i32;
        let mut startpos = 0i32;

        for i in 0..NETSIZE {
            let mut smallpos = i;
            let mut smallval = self.network[i * 4 + 1];
            for j in (i + 1)..NETSIZE {
                if self.network[j * 4 + 1] < smallval {
                    smallpos = j;
                    smallval = self.network[j * 4 + 1];
                }
            }
            if smallpos != i {
                for c in 0..4 {
                    self.network.swap(i * 4 + c, smallpos * 4 + c);
                }
            }

            if smallval != previouscol {
                self.netindex[previouscol as usize] = (startpos + i as i32) >> 1;
                for j in (previouscol + 1)..smallval {
                    self.netindex[j as usize] = i as i32;
                }
                previouscol = smallval;
                startpos = i as i32;
            }
        }

        self.netindex[previouscol as usize] = (startpos + MAXNETPOS) >> 1;
        for j in (previouscol + 1)..256 {
            self.netindex[j as usize] = MAXNETPOS;
        }
    }
}
