//! Mersenne-Twister tempering over an entropy-sourced pool.
//!
//! This is **not** MT19937: there is no twist recurrence and no seed. A pool of
//! [`POOL_SIZE`] raw 32-bit words is drawn from the injected entropy source
//! whenever it runs dry, and each word goes through the standard MT tempering
//! transform on the way out. Output is only reproducible with a seeded source.
//! Words are drawn independently, so a pool may repeat a word.

use std::collections::VecDeque;

use super::Generator;
use crate::entropy::EntropySource;
use crate::error::GeneratorError;

/// Words drawn per refill, matching the MT19937 state size.
pub const POOL_SIZE: usize = 624;

const TEMPER_MASK_B: u32 = 0x9D2C_5680;
const TEMPER_MASK_C: u32 = 0xEFC6_0000;

/// The MT19937 tempering transform.
pub fn temper(mut y: u32) -> u32 {
    y ^= y >> 11;
    y ^= (y << 7) & TEMPER_MASK_B;
    y ^= (y << 15) & TEMPER_MASK_C;
    y ^= y >> 18;
    y
}

pub struct MersenneTempering<'a> {
    pool: VecDeque<u32>,
    entropy: &'a mut dyn EntropySource,
    refills: usize,
}

impl<'a> MersenneTempering<'a> {
    pub fn new(entropy: &'a mut dyn EntropySource) -> Self {
        Self {
            pool: VecDeque::with_capacity(POOL_SIZE),
            entropy,
            refills: 0,
        }
    }

    /// Number of times the pool has been drawn from the entropy source.
    pub fn refills(&self) -> usize {
        self.refills
    }

    fn refill(&mut self) -> Result<(), GeneratorError> {
        for _ in 0..POOL_SIZE {
            let word = self.entropy.next_u32()?;
            self.pool.push_back(word);
        }
        self.refills += 1;
        log::debug!(
            "mt: refilled pool #{} from '{}'",
            self.refills,
            self.entropy.name()
        );
        Ok(())
    }
}

impl Generator for MersenneTempering<'_> {
    fn next_value(&mut self) -> Result<u64, GeneratorError> {
        if self.pool.is_empty() {
            self.refill()?;
        }
        let raw = self.pool.pop_front().ok_or_else(|| GeneratorError::Entropy {
            source_name: self.entropy.name(),
            reason: "pool empty after refill".to_string(),
        })?;
        Ok(temper(raw) as u64)
    }
}
