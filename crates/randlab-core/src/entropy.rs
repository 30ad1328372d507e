//! Injected entropy for the generators that are not reproducible from a seed.
//!
//! The additive generator and the Mersenne-style tempering generator draw part
//! of their state from an external source of randomness. Instead of reaching
//! for a process-wide RNG, both take a `&mut dyn EntropySource` supplied by the
//! caller, so tests can swap in [`SeededEntropy`] and get repeatable output.

use rand::rngs::{StdRng, ThreadRng};
use rand::{RngCore, SeedableRng};

use crate::error::GeneratorError;

/// A supplier of raw random words.
pub trait EntropySource {
    /// Short identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Next raw 64-bit word.
    fn next_u64(&mut self) -> Result<u64, GeneratorError>;

    /// Next raw 32-bit word (upper half of a 64-bit draw).
    fn next_u32(&mut self) -> Result<u32, GeneratorError> {
        Ok((self.next_u64()? >> 32) as u32)
    }

    /// Uniform integer in `low..=high`.
    ///
    /// Uses rejection sampling so every value in the range is equally likely.
    fn range_inclusive(&mut self, low: u64, high: u64) -> Result<u64, GeneratorError> {
        if low >= high {
            return Ok(low);
        }
        let span = high - low;
        if span == u64::MAX {
            return self.next_u64();
        }
        let bound = span + 1;
        // 2^64 mod bound values at the top of the range would bias low residues.
        let limit = u64::MAX - (u64::MAX - bound + 1) % bound;
        loop {
            let v = self.next_u64()?;
            if v <= limit {
                return Ok(low + v % bound);
            }
        }
    }
}

/// Thread-local RNG from the `rand` crate. The CLI default.
pub struct ThreadEntropy {
    rng: ThreadRng,
}

impl ThreadEntropy {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for ThreadEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for ThreadEntropy {
    fn name(&self) -> &'static str {
        "thread"
    }

    fn next_u64(&mut self) -> Result<u64, GeneratorError> {
        Ok(self.rng.next_u64())
    }
}

/// OS CSPRNG via the `getrandom` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn name(&self) -> &'static str {
        "os"
    }

    fn next_u64(&mut self) -> Result<u64, GeneratorError> {
        let mut buf = [0u8; 8];
        getrandom::fill(&mut buf).map_err(|e| GeneratorError::Entropy {
            source_name: "os",
            reason: e.to_string(),
        })?;
        Ok(u64::from_le_bytes(buf))
    }
}

/// Seeded `StdRng`: the same seed always yields the same words.
pub struct SeededEntropy {
    seed: u64,
    rng: StdRng,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl EntropySource for SeededEntropy {
    fn name(&self) -> &'static str {
        "seeded"
    }

    fn next_u64(&mut self) -> Result<u64, GeneratorError> {
        Ok(self.rng.next_u64())
    }
}
