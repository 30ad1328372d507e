//! Generator library: one state object per algorithm family.
//!
//! Every generator owns its state explicitly and advances it one draw at a
//! time through [`Generator::next_value`]. [`generate`] is the single entry
//! point used by callers holding a [`GeneratorParams`] record.
//!
//! Additive and Mersenne-tempering output depends on the injected
//! [`EntropySource`] and is only reproducible with a seeded source. All other
//! families are pure functions of their parameters.

pub mod congruential;
pub mod modular;
pub mod rc4;
pub mod shift_register;
pub mod tempering;

pub use congruential::{Additive, FiveParameter, LinearCongruential};
pub use modular::{BlumBlumShub, RsaGenerator};
pub use rc4::Rc4;
pub use shift_register::{ShiftRegister, TapOrder};
pub use tempering::{MersenneTempering, POOL_SIZE, temper};

use crate::entropy::EntropySource;
use crate::error::GeneratorError;
use crate::params::GeneratorParams;

/// Largest up-front allocation for [`Generator::take_values`]; longer runs grow.
const PREALLOCATE_LIMIT: usize = 1 << 20;

/// A stateful sequence generator.
pub trait Generator {
    /// Advance the state by one step and return the emitted value.
    fn next_value(&mut self) -> Result<u64, GeneratorError>;

    /// Draw `length` consecutive values.
    fn take_values(&mut self, length: usize) -> Result<Vec<u64>, GeneratorError> {
        let mut out = Vec::with_capacity(length.min(PREALLOCATE_LIMIT));
        for _ in 0..length {
            out.push(self.next_value()?);
        }
        Ok(out)
    }
}

/// Build the generator state for `params`.
///
/// Entropy-backed generators borrow `entropy` for as long as they live; the
/// others ignore it.
pub fn build<'a>(
    params: &GeneratorParams,
    entropy: &'a mut dyn EntropySource,
) -> Result<Box<dyn Generator + 'a>, GeneratorError> {
    let generator: Box<dyn Generator + 'a> = match params {
        GeneratorParams::LinearCongruential { seed, a, c, m } => {
            Box::new(LinearCongruential::new(*seed, *a, *c, *m)?)
        }
        GeneratorParams::Additive { seed, m } => Box::new(Additive::new(*seed, *m, entropy)),
        GeneratorParams::FiveParameter { seed, m, a, c, e } => {
            Box::new(FiveParameter::new(*seed, *m, *a, *c, *e)?)
        }
        GeneratorParams::Lfsr(p) => Box::new(ShiftRegister::new(p, TapOrder::Linear)?),
        GeneratorParams::Nfsr(p) => Box::new(ShiftRegister::new(p, TapOrder::Nonlinear)?),
        GeneratorParams::MersenneTempering => Box::new(MersenneTempering::new(entropy)),
        GeneratorParams::Rc4 { key } => Box::new(Rc4::new(key)?),
        GeneratorParams::BlumBlumShub { c, m, x, .. } => {
            Box::new(BlumBlumShub::new(*c, *m, *x)?)
        }
        GeneratorParams::Rsa { n, e, seed, .. } => Box::new(RsaGenerator::new(*n, *e, *seed)?),
    };
    Ok(generator)
}

/// Produce exactly `length` values from the generator described by `params`.
pub fn generate(
    length: usize,
    params: &GeneratorParams,
    entropy: &mut dyn EntropySource,
) -> Result<Vec<u64>, GeneratorError> {
    let method = params.method();
    if method.uses_entropy() {
        log::debug!("{method}: drawing from entropy source '{}'", entropy.name());
    }
    let mut generator = build(params, entropy)?;
    let values = generator.take_values(length)?;
    log::debug!("{method}: generated {} values", values.len());
    Ok(values)
}
