//! Deterministic random number generation.
//!
//! RULE: nothing in the simulation may call any platform RNG.
//! All randomness flows through `SeededRng` instances forked by name
//! from the single root seed held by the engine.
//!
//! `fork()` derives the child seed from this stream's stored seed and the
//! substream name only. It never reads generator state, which gives the
//! three guarantees the kernel is built on:
//!   - draws on one substream never shift any other substream,
//!   - the same name always reproduces the same substream,
//!   - adding or removing substreams never changes existing ones.
//!
//! A substream is exclusively owned by the system that forked it. Sharing
//! one across two systems silently breaks reproducibility.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct SeededRng {
    seed: u64,
    inner: Pcg64Mcg,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// The seed this stream was constructed from. Forks derive from this,
    /// not from the current generator position.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent named substream.
    pub fn fork(&self, name: &str) -> SeededRng {
        SeededRng::new(substream_seed(self.seed, name))
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Draw a float in [0.0, 1.0). Uses the top 53 bits so the full f64
    /// mantissa is filled.
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw an integer in [min, max], inclusive on both ends.
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "range_i64: min must be <= max");
        let span = max.wrapping_sub(min) as u64;
        if span == u64::MAX {
            return self.inner.next_u64() as i64;
        }
        min.wrapping_add((self.inner.next_u64() % (span + 1)) as i64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Return a new sequence holding a deterministic pseudo-random
    /// permutation of `items` (Fisher–Yates over a copy).
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = (self.inner.next_u64() % (i as u64 + 1)) as usize;
            out.swap(i, j);
        }
        out
    }
}

/// Derive a substream seed from (parent seed, name).
///
/// FNV-1a over the name bytes, golden-ratio spread, then a splitmix64-style
/// finalizer. Stable across platforms and rustc versions — no std hasher.
fn substream_seed(seed: u64, name: &str) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in name.as_bytes() {
        h ^= u64::from(*b);
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    let mut z = seed ^ h.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
