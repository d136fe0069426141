//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through the single AmountRng stream seeded
//! from the master seed in GeneratorConfig.
//!
//! Unlike a per-subsystem RNG bank, there is deliberately ONE stream:
//! scenario builders run in a fixed order and every draw advances the
//! same stream, so re-running the generator with the same seed produces
//! a byte-identical dataset. No scenario may construct its own stream.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// The shared amount/jitter stream for a single generator run.
pub struct AmountRng {
    inner: Pcg64Mcg,
}

impl AmountRng {
    /// Seed once, at composer construction. Never reseeded, never rewound.
    pub fn new(master_seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(master_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Draw a uniform amount in [low, high], rounded to 2 fraction digits.
    pub fn amount(&mut self, low: f64, high: f64) -> f64 {
        assert!(low <= high, "amount range inverted: {low} > {high}");
        let raw = low + self.next_f64() * (high - low);
        round_cents(raw)
    }
}

/// Round to 2 fraction digits, the resolution of every amount in the dataset.
pub fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
