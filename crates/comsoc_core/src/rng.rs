// crates/comsoc_core/src/rng.rs
//
// Deterministic, integer-only RNG for synthetic voters (demo runs, property
// tests). Ballot results never consume randomness; only profile generation
// does.
//
// • Explicit seeding: `u64` little-endian into the first 8 bytes of the
//   ChaCha20 seed, the remaining 24 bytes zero.
// • Unbiased ranges via rejection sampling, no floating point.

use crate::ids::Alternative;
use crate::profile::Preference;
use alloc::vec::Vec;

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// Seeded generator for preferences and approval thresholds.
#[derive(Debug, Clone)]
pub struct ProfileRng {
    rng: ChaCha20Rng,
    words_consumed: u128,
}

impl ProfileRng {
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self { rng: ChaCha20Rng::from_seed(seed32), words_consumed: 0 }
    }

    /// Number of 64-bit words drawn so far (saturating).
    #[inline]
    pub fn words_consumed(&self) -> u128 {
        self.words_consumed
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in `[0, n)`; `None` if `n == 0`.
    ///
    /// Accept `x` if `x >= 2^64 mod n`; then `x % n` is uniform.
    #[inline]
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// Fisher–Yates: for i in (1..len).rev() { j ~ U{0..=i}; swap(i, j) }
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            if let Some(j) = self.gen_range(i as u64 + 1) {
                slice.swap(i, j as usize);
            }
        }
    }

    /// Uniformly random permutation of `1..=n`.
    pub fn random_preference(&mut self, n: usize) -> Preference {
        let mut pref: Vec<Alternative> = (1..=n as u32).map(Alternative::new).collect();
        self.shuffle_in_place(&mut pref);
        pref
    }

    /// Approval threshold uniform in `[1, n]`; `0` when `n == 0`.
    pub fn random_threshold(&mut self, n: usize) -> i64 {
        self.gen_range(n as u64).map(|v| v as i64 + 1).unwrap_or(0)
    }
}
