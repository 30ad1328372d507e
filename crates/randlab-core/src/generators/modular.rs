//! Generators stepping by modular squaring and exponentiation.

use super::Generator;
use crate::error::GeneratorError;

/// `(a * b) mod m` through a `u128` intermediate.
pub fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// `base^exp mod m` by square-and-multiply.
pub fn pow_mod(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let mut result = 1u64;
    let mut base = base % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

/// `x = (x*x + c) mod m`
#[derive(Debug, Clone)]
pub struct BlumBlumShub {
    x: u64,
    c: u64,
    m: u64,
}

impl BlumBlumShub {
    pub fn new(c: u64, m: u64, x: u64) -> Result<Self, GeneratorError> {
        if m == 0 {
            return Err(GeneratorError::ZeroModulus { method: "bbs" });
        }
        Ok(Self { x, c, m })
    }

    pub fn state(&self) -> u64 {
        self.x
    }
}

impl Generator for BlumBlumShub {
    fn next_value(&mut self) -> Result<u64, GeneratorError> {
        let sq = self.x as u128 * self.x as u128;
        self.x = ((sq + self.c as u128) % self.m as u128) as u64;
        Ok(self.x)
    }
}

/// `x = x^e mod n`, each step seeded by the previous output.
#[derive(Debug, Clone)]
pub struct RsaGenerator {
    x: u64,
    e: u64,
    n: u64,
}

impl RsaGenerator {
    pub fn new(n: u64, e: u64, seed: u64) -> Result<Self, GeneratorError> {
        if n == 0 {
            return Err(GeneratorError::ZeroModulus { method: "rsa" });
        }
        Ok(Self { x: seed, e, n })
    }

    pub fn state(&self) -> u64 {
        self.x
    }
}

impl Generator for RsaGenerator {
    fn next_value(&mut self) -> Result<u64, GeneratorError> {
        self.x = pow_mod(self.x, self.e, self.n);
        Ok(self.x)
    }
}
