//! Closed-form transforms from a uniform `[0, 1)` sequence to other distributions.
//!
//! The transforms consume the uniform input in order and never draw randomness
//! of their own, so the output is fully determined by the input sequence.
//! Each sample uses a fixed number of uniforms ([`Distribution::uniforms_per_sample`]);
//! a trailing remainder too short for one more sample is dropped.

use std::f64::consts::PI;
use std::fmt;

use crate::error::GeneratorError;

const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Clamp into the open interval `(0, 1)` ahead of a logarithm.
fn open_unit(u: f64) -> f64 {
    u.clamp(f64::MIN_POSITIVE, BELOW_ONE)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// `st`: uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
    /// `tr`: triangular with the given mode.
    Triangular { left: f64, mode: f64, right: f64 },
    /// `ex`: exponential with mean `scale`.
    Exponential { scale: f64 },
    /// `nr`: normal via Box-Muller.
    Normal { mean: f64, std_dev: f64 },
    /// `gm`: Erlang (gamma with integer shape) as a sum of exponentials.
    Gamma { shape: u32, scale: f64 },
    /// `ln`: `exp` of a normal sample.
    Lognormal { mean: f64, std_dev: f64 },
    /// `ls`: logistic.
    Logistic { loc: f64, scale: f64 },
    /// `bi`: count of `u < p` over `trials` uniforms.
    Binomial { trials: u32, p: f64 },
}

impl Distribution {
    pub const CODES: [&'static str; 8] = ["st", "tr", "ex", "nr", "gm", "ln", "ls", "bi"];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Uniform { .. } => "st",
            Self::Triangular { .. } => "tr",
            Self::Exponential { .. } => "ex",
            Self::Normal { .. } => "nr",
            Self::Gamma { .. } => "gm",
            Self::Lognormal { .. } => "ln",
            Self::Logistic { .. } => "ls",
            Self::Binomial { .. } => "bi",
        }
    }

    /// Build a distribution from its two-letter code and positional parameters.
    pub fn parse(code: &str, params: &[f64]) -> Result<Self, GeneratorError> {
        let code_key = code.trim().to_lowercase();
        let dist = match code_key.as_str() {
            "st" => {
                let [low, high] = take::<2>("st", params)?;
                if !(low < high) {
                    return Err(invalid("high", format!("{high} must exceed low {low}")));
                }
                Self::Uniform { low, high }
            }
            "tr" => {
                let [left, mode, right] = take::<3>("tr", params)?;
                if !(left < right && left <= mode && mode <= right) {
                    return Err(invalid(
                        "mode",
                        format!("need left <= mode <= right with left < right, got {left}, {mode}, {right}"),
                    ));
                }
                Self::Triangular { left, mode, right }
            }
            "ex" => {
                let [scale] = take::<1>("ex", params)?;
                positive("scale", scale)?;
                Self::Exponential { scale }
            }
            "nr" | "ln" => {
                let [mean, std_dev] = take::<2>(if code_key == "nr" { "nr" } else { "ln" }, params)?;
                if !(std_dev >= 0.0) {
                    return Err(invalid("std_dev", format!("{std_dev} is negative")));
                }
                if code_key == "nr" {
                    Self::Normal { mean, std_dev }
                } else {
                    Self::Lognormal { mean, std_dev }
                }
            }
            "gm" => {
                let [shape, scale] = take::<2>("gm", params)?;
                positive("scale", scale)?;
                Self::Gamma {
                    shape: whole("shape", shape)?,
                    scale,
                }
            }
            "ls" => {
                let [loc, scale] = take::<2>("ls", params)?;
                positive("scale", scale)?;
                Self::Logistic { loc, scale }
            }
            "bi" => {
                let [trials, p] = take::<2>("bi", params)?;
                if !(0.0..=1.0).contains(&p) {
                    return Err(invalid("p", format!("{p} is not a probability")));
                }
                Self::Binomial {
                    trials: whole("trials", trials)?,
                    p,
                }
            }
            _ => return Err(GeneratorError::UnknownDistribution(code.to_string())),
        };
        Ok(dist)
    }

    /// Uniform inputs consumed per output sample.
    pub fn uniforms_per_sample(&self) -> usize {
        match self {
            Self::Normal { .. } | Self::Lognormal { .. } => 2,
            Self::Gamma { shape, .. } => *shape as usize,
            Self::Binomial { trials, .. } => *trials as usize,
            _ => 1,
        }
    }

    /// Map a uniform sequence onto this distribution.
    pub fn transform(&self, uniforms: &[f64]) -> Vec<f64> {
        let width = self.uniforms_per_sample().max(1);
        let out: Vec<f64> = uniforms
            .chunks_exact(width)
            .map(|chunk| self.sample(chunk))
            .collect();
        log::debug!(
            "{}: {} uniforms → {} samples",
            self.code(),
            uniforms.len(),
            out.len()
        );
        out
    }

    fn sample(&self, u: &[f64]) -> f64 {
        match *self {
            Self::Uniform { low, high } => low + (high - low) * u[0],
            Self::Triangular { left, mode, right } => {
                let span = right - left;
                let cut = (mode - left) / span;
                if u[0] < cut {
                    left + (u[0] * span * (mode - left)).sqrt()
                } else {
                    right - ((1.0 - u[0]) * span * (right - mode)).sqrt()
                }
            }
            Self::Exponential { scale } => -scale * (1.0 - open_unit(u[0])).ln(),
            Self::Normal { mean, std_dev } => mean + std_dev * box_muller(u[0], u[1]),
            Self::Lognormal { mean, std_dev } => (mean + std_dev * box_muller(u[0], u[1])).exp(),
            Self::Gamma { scale, .. } => {
                scale * u.iter().map(|&x| -(1.0 - open_unit(x)).ln()).sum::<f64>()
            }
            Self::Logistic { loc, scale } => {
                let x = open_unit(u[0]);
                loc + scale * (x / (1.0 - x)).ln()
            }
            Self::Binomial { p, .. } => u.iter().filter(|&&x| x < p).count() as f64,
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

fn box_muller(u1: f64, u2: f64) -> f64 {
    (-2.0 * open_unit(u1).ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn take<const N: usize>(code: &'static str, params: &[f64]) -> Result<[f64; N], GeneratorError> {
    <[f64; N]>::try_from(params).map_err(|_| GeneratorError::ParameterCount {
        method: code,
        expected: match N {
            1 => "1",
            2 => "2",
            _ => "3",
        },
        got: params.len(),
    })
}

fn invalid(name: &'static str, reason: String) -> GeneratorError {
    GeneratorError::InvalidParameter { name, reason }
}

fn positive(name: &'static str, v: f64) -> Result<(), GeneratorError> {
    if v > 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, format!("{v} must be positive")))
    }
}

fn whole(name: &'static str, v: f64) -> Result<u32, GeneratorError> {
    if v >= 1.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Ok(v as u32)
    } else {
        Err(invalid(name, format!("{v} must be a positive integer")))
    }
}
