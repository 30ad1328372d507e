//! Feedback shift registers.
//!
//! Both variants shift the register right by one, XOR the tapped bits of the
//! shifted state into a single feedback bit, and set that bit at position
//! `size - 1`. They differ only in which end the 1-indexed taps count from.
//! The emitted value is the whole register after the step.

use super::Generator;
use crate::error::GeneratorError;
use crate::params::RegisterParams;

/// Which end of the register tap positions are counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOrder {
    /// Tap `t` reads bit `t - 1` (LFSR).
    Linear,
    /// Tap `t` reads bit `size - t` (NFSR).
    Nonlinear,
}

#[derive(Debug, Clone)]
pub struct ShiftRegister {
    state: u64,
    size: u32,
    /// Bit indices resolved from the tap positions.
    tap_bits: Vec<u32>,
}

impl ShiftRegister {
    pub const MAX_SIZE: u32 = 64;

    pub fn new(params: &RegisterParams, order: TapOrder) -> Result<Self, GeneratorError> {
        let size = params.size;
        if size == 0 || size > Self::MAX_SIZE {
            return Err(GeneratorError::InvalidParameter {
                name: "size",
                reason: format!("register width {size} is outside 1..={}", Self::MAX_SIZE),
            });
        }
        if size < 64 && params.seed >> size != 0 {
            return Err(GeneratorError::InvalidParameter {
                name: "seed",
                reason: format!("{} does not fit in {size} bits", params.seed),
            });
        }
        if params.taps.is_empty() {
            return Err(GeneratorError::InvalidParameter {
                name: "taps",
                reason: "at least one tap is required".to_string(),
            });
        }
        let tap_bits = params
            .taps
            .iter()
            .map(|&tap| {
                if tap == 0 || tap > size {
                    return Err(GeneratorError::InvalidTap { tap, size });
                }
                Ok(match order {
                    TapOrder::Linear => tap - 1,
                    TapOrder::Nonlinear => size - tap,
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;
        Ok(Self {
            state: params.seed,
            size,
            tap_bits,
        })
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    fn step(&mut self) {
        // The outgoing low bit does not take part in the feedback.
        self.state >>= 1;
        let feedback = self
            .tap_bits
            .iter()
            .fold(0u64, |acc, &bit| acc ^ ((self.state >> bit) & 1));
        self.state |= feedback << (self.size - 1);
    }
}

impl Generator for ShiftRegister {
    fn next_value(&mut self) -> Result<u64, GeneratorError> {
        self.step();
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(seed: u64, size: u32, taps: &[u32]) -> RegisterParams {
        RegisterParams {
            seed,
            size,
            taps: taps.to_vec(),
        }
    }

    #[test]
    fn test_lfsr_single_step() {
        // 0b1010 → shift → 0b0101; bit3 ^ bit2 = 0 ^ 1 = 1 → 0b1101.
        let mut g = ShiftRegister::new(&register(0b1010, 4, &[4, 3]), TapOrder::Linear).unwrap();
        assert_eq!(g.next_value().unwrap(), 13);
    }

    #[test]
    fn test_nfsr_single_step() {
        // Taps [4, 3] on a 4-bit register read bits 0 and 1 of 0b0101: 1 ^ 0 = 1.
        let mut g =
            ShiftRegister::new(&register(0b1010, 4, &[4, 3]), TapOrder::Nonlinear).unwrap();
        assert_eq!(g.next_value().unwrap(), 0b1101);
        // 0b1101 → 0b0110; bits 0 and 1 = 0 ^ 1 = 1 → 0b1110.
        assert_eq!(g.next_value().unwrap(), 0b1110);
    }

    #[test]
    fn test_tap_order_changes_output() {
        let p = register(0xACE1, 16, &[1, 3, 4, 6]);
        let mut lin = ShiftRegister::new(&p, TapOrder::Linear).unwrap();
        let mut non = ShiftRegister::new(&p, TapOrder::Nonlinear).unwrap();
        assert_ne!(lin.take_values(32).unwrap(), non.take_values(32).unwrap());
    }

    #[test]
    fn test_state_fits_in_register() {
        for order in [TapOrder::Linear, TapOrder::Nonlinear] {
            for size in [1u32, 3, 8, 17, 31, 63, 64] {
                let taps: Vec<u32> = [1, size / 2 + 1, size]
                    .into_iter()
                    .filter(|&t| t >= 1 && t <= size)
                    .collect();
                let seed = if size == 64 { u64::MAX } else { (1u64 << size) - 1 };
                let mut g = ShiftRegister::new(&register(seed, size, &taps), order).unwrap();
                for _ in 0..500 {
                    let v = g.next_value().unwrap();
                    if size < 64 {
                        assert!(v < (1u64 << size), "size={size} v={v:#x}");
                    }
                }
                assert_eq!(g.size(), size);
            }
        }
    }

    #[test]
    fn test_lfsr_period() {
        // Feedback reads the shifted state, so the top bit is always 0 when
        // sampled and a 4-bit register behaves like x^3 + x + 1: period 7.
        let mut g = ShiftRegister::new(&register(0b0010, 4, &[1, 2]), TapOrder::Linear).unwrap();
        let first = g.take_values(7).unwrap();
        let second = g.take_values(7).unwrap();
        let distinct: std::collections::HashSet<u64> = first.iter().copied().collect();
        assert_eq!(distinct.len(), 7);
        assert!(!distinct.contains(&0));
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_taps() {
        assert_eq!(
            ShiftRegister::new(&register(1, 4, &[5]), TapOrder::Linear).unwrap_err(),
            GeneratorError::InvalidTap { tap: 5, size: 4 }
        );
        assert_eq!(
            ShiftRegister::new(&register(1, 4, &[0]), TapOrder::Nonlinear).unwrap_err(),
            GeneratorError::InvalidTap { tap: 0, size: 4 }
        );
    }

    #[test]
    fn test_empty_taps_reported_as_taps() {
        for order in [TapOrder::Linear, TapOrder::Nonlinear] {
            assert!(matches!(
                ShiftRegister::new(&register(1, 4, &[]), order),
                Err(GeneratorError::InvalidParameter { name: "taps", .. })
            ));
        }
    }

    #[test]
    fn test_invalid_size_and_seed() {
        assert!(ShiftRegister::new(&register(0, 0, &[1]), TapOrder::Linear).is_err());
        assert!(ShiftRegister::new(&register(0, 65, &[1]), TapOrder::Linear).is_err());
        assert!(ShiftRegister::new(&register(16, 4, &[1]), TapOrder::Linear).is_err());
        assert!(ShiftRegister::new(&register(15, 4, &[1]), TapOrder::Linear).is_ok());
    }
}
