//! # randlab-core
//!
//! Classical pseudo-random generators, the normalizer that prepares their
//! output for statistical testing, and closed-form distribution transforms.
//!
//! ## Quick Start
//!
//! ```
//! use randlab_core::{GeneratorParams, Method, SeededEntropy, generate, normalize};
//!
//! let params = GeneratorParams::parse(Method::LinearCongruential, "1;5;3;16").unwrap();
//! let values = generate(5, &params, &mut SeededEntropy::new(0)).unwrap();
//! assert_eq!(values, vec![8, 11, 10, 5, 12]);
//!
//! let unit = normalize(&values).unwrap();
//! assert!(unit.iter().all(|&x| (0.0..1.0).contains(&x)));
//! ```
//!
//! ## Architecture
//!
//! Params → Generator (explicit state) → `Vec<u64>` → normalize → `Vec<f64>` in `[0, 1)`
//!
//! Generator families: linear congruential, additive, five-parameter, LFSR,
//! NFSR, Mersenne tempering, RC4, Blum-Blum-Shub and RSA. Additive and
//! Mersenne tempering read from an injected [`EntropySource`]; the rest are
//! pure functions of their parameters.

pub mod distributions;
pub mod entropy;
pub mod error;
pub mod generators;
pub mod normalize;
pub mod params;
pub mod sequence;

pub use distributions::Distribution;
pub use entropy::{EntropySource, OsEntropy, SeededEntropy, ThreadEntropy};
pub use error::{GeneratorError, SequenceError};
pub use generators::{Generator, build, generate};
pub use normalize::normalize;
pub use params::{GeneratorParams, Method, RegisterParams};
pub use sequence::{parse_sequence, read_sequence_file, write_sequence, write_sequence_file};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
