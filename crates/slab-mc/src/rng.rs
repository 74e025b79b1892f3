// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — RNG Streams
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Counter-based random number streams.
//!
//! Each consumer (a particle history, a fission source, the iterator
//! itself) gets an independent ChaCha substream keyed by the master seed
//! and a stream id. Streams never share state, so the sequence a history
//! draws depends only on `(seed, stream)` and is independent of how many
//! numbers any other consumer drew.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stream ids at or above this value are reserved for non-history
/// consumers (sources, the iterator). History ids count up from zero,
/// one per `(cycle, slot)` pair, and stay far below this.
pub const CONTROL_STREAM_BASE: u64 = 1 << 62;

/// One independent substream of the master generator.
#[derive(Debug, Clone)]
pub struct RngStream {
    rng: ChaCha8Rng,
    seed: u64,
    stream: u64,
}

impl RngStream {
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        RngStream { rng, seed, stream }
    }

    /// Uniform variate in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer in `[lo, hi]` inclusive.
    pub fn uniform_int(&mut self, lo: usize, hi: usize) -> usize {
        self.rng.gen_range(lo..=hi)
    }

    /// Rewind this stream to the start of a (possibly different) substream.
    pub fn reseed(&mut self, seed: u64, stream: u64) {
        *self = RngStream::new(seed, stream);
    }

    /// Fresh stream sharing this one's master seed.
    pub fn substream(&self, stream: u64) -> RngStream {
        RngStream::new(self.seed, stream)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stream(&self) -> u64 {
        self.stream
    }
}

/// Nonzero master seed drawn from system entropy, for configurations that
/// leave the seed unset (sentinel 0).
pub fn entropy_seed() -> u64 {
    let mut rng = rand::thread_rng();
    loop {
        let seed: u64 = rng.gen();
        if seed != 0 {
            return seed;
        }
    }
}
