//! Descriptive statistics for normalized sequences.

use serde::Serialize;

/// Mean of the continuous uniform distribution on `[0, 1)`.
pub const IDEAL_MEAN: f64 = 0.5;
/// Standard deviation of the continuous uniform distribution, `1/√12`, rounded.
pub const IDEAL_STD_DEV: f64 = 0.2887;

/// Mean and spread of a sequence, with distances from the ideal uniform values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SequenceSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (`n - 1` denominator); 0 for a single value.
    pub std_dev: f64,
    pub mean_error: f64,
    pub std_dev_error: f64,
}

impl SequenceSummary {
    /// Summarize `data`, or `None` when it is empty.
    pub fn from_sequence(data: &[f64]) -> Option<Self> {
        let point = running_statistics(data).pop()?;
        Some(Self {
            count: point.size,
            mean: point.mean,
            std_dev: point.std_dev,
            mean_error: (point.mean - IDEAL_MEAN).abs(),
            std_dev_error: (point.std_dev - IDEAL_STD_DEV).abs(),
        })
    }
}

/// Mean and standard deviation of one prefix of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunningPoint {
    pub size: usize,
    pub mean: f64,
    pub std_dev: f64,
}

/// Prefix statistics for every prefix length `1..=N` (Welford's update).
pub fn running_statistics(data: &[f64]) -> Vec<RunningPoint> {
    let mut mean = 0.0;
    let mut m2 = 0.0;
    data.iter()
        .enumerate()
        .map(|(i, &x)| {
            let size = i + 1;
            let delta = x - mean;
            mean += delta / size as f64;
            m2 += delta * (x - mean);
            let std_dev = if size < 2 {
                0.0
            } else {
                (m2 / (size - 1) as f64).sqrt()
            };
            RunningPoint {
                size,
                mean,
                std_dev,
            }
        })
        .collect()
}
