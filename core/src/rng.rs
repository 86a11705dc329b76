//! Random number generation for the date injector.
//!
//! All randomness flows through a RunRng. Production runs seed it from
//! OS entropy; tests and `--seed` runs seed it explicitly so the injected
//! mediation windows are reproducible.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct RunRng {
    inner: Pcg64Mcg,
}

impl RunRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: Pcg64Mcg::from_entropy(),
        }
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer uniformly in [low, high].
    pub fn range_inclusive(&mut self, low: u64, high: u64) -> u64 {
        assert!(low <= high, "empty range {low}..={high}");
        low + self.next_u64_below(high - low + 1)
    }
}
