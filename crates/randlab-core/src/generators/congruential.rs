//! Congruential recurrences: linear, five-parameter and additive.

use super::Generator;
use crate::entropy::EntropySource;
use crate::error::GeneratorError;

/// `(a*x + b) mod m` without overflow for any `u64` inputs.
fn affine_mod(a: u64, x: u64, b: u128, m: u64) -> u64 {
    ((a as u128 * x as u128 + b) % m as u128) as u64
}

/// `seed = (a*seed + c) mod m`
#[derive(Debug, Clone)]
pub struct LinearCongruential {
    state: u64,
    a: u64,
    c: u64,
    m: u64,
}

impl LinearCongruential {
    pub fn new(seed: u64, a: u64, c: u64, m: u64) -> Result<Self, GeneratorError> {
        if m == 0 {
            return Err(GeneratorError::ZeroModulus { method: "lc" });
        }
        Ok(Self {
            state: seed,
            a,
            c,
            m,
        })
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

impl Generator for LinearCongruential {
    fn next_value(&mut self) -> Result<u64, GeneratorError> {
        self.state = affine_mod(self.a, self.state, self.c as u128, self.m);
        Ok(self.state)
    }
}

/// `seed = (a*seed + c + e) mod m`
#[derive(Debug, Clone)]
pub struct FiveParameter {
    state: u64,
    m: u64,
    a: u64,
    c: u64,
    e: u64,
}

impl FiveParameter {
    pub fn new(seed: u64, m: u64, a: u64, c: u64, e: u64) -> Result<Self, GeneratorError> {
        if m == 0 {
            return Err(GeneratorError::ZeroModulus { method: "5p" });
        }
        Ok(Self {
            state: seed,
            m,
            a,
            c,
            e,
        })
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

impl Generator for FiveParameter {
    fn next_value(&mut self) -> Result<u64, GeneratorError> {
        let offset = self.c as u128 + self.e as u128;
        self.state = affine_mod(self.a, self.state, offset, self.m);
        Ok(self.state)
    }
}

/// `seed = (seed + U(1, m-1)) mod m` with U drawn from injected entropy.
///
/// A modulus of 0 or 1 leaves no room for a step, so it is clamped to 2.
pub struct Additive<'a> {
    state: u64,
    m: u64,
    entropy: &'a mut dyn EntropySource,
}

impl<'a> Additive<'a> {
    pub fn new(seed: u64, m: u64, entropy: &'a mut dyn EntropySource) -> Self {
        let m = if m <= 1 {
            log::warn!("additive: modulus {m} too small, using 2");
            2
        } else {
            m
        };
        Self {
            state: seed,
            m,
            entropy,
        }
    }

    /// Effective modulus after clamping.
    pub fn modulus(&self) -> u64 {
        self.m
    }
}

impl Generator for Additive<'_> {
    fn next_value(&mut self) -> Result<u64, GeneratorError> {
        let step = self.entropy.range_inclusive(1, self.m - 1)?;
        self.state = ((self.state as u128 + step as u128) % self.m as u128) as u64;
        Ok(self.state)
    }
}
