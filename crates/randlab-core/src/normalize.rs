//! Mapping integer sequences onto `[0, 1)`.

use crate::error::GeneratorError;

/// Largest `f64` strictly below 1.0.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Divide every element by `max + 1`.
///
/// Every output lies in `[0, 1)` and the map is monotonic, so the relative
/// order of the input is preserved. For very wide values (above 2^53) the
/// quotient can round up to 1.0; those are pinned to the largest double below
/// one.
pub fn normalize(sequence: &[u64]) -> Result<Vec<f64>, GeneratorError> {
    let max = sequence
        .iter()
        .copied()
        .max()
        .ok_or(GeneratorError::EmptySequence)?;
    let divisor = max as f64 + 1.0;
    Ok(sequence
        .iter()
        .map(|&v| (v as f64 / divisor).min(BELOW_ONE))
        .collect())
}
