//! Chi-square randomness test battery for normalized sequences.
//!
//! Provides seven classical tests for sequences of reals in `[0, 1)`: the
//! plain chi-square frequency test, series, interval (gap), partition,
//! permutation, monotonicity (run) and conflict (collision). Each test returns
//! a [`TestResult`] carrying a `+`/`-` verdict, the computed statistic, its
//! upper-tail p-value and the critical value at the chosen significance level.
//!
//! Tests never return errors. Inputs that are too short or degenerate produce a
//! failing result whose `details` explain what was missing.

pub mod summary;

pub use summary::{IDEAL_MEAN, IDEAL_STD_DEV, RunningPoint, SequenceSummary, running_statistics};

use serde::Serialize;
use statrs::distribution::{ChiSquared, Continuous, ContinuousCDF, Normal};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Significance level used when the caller does not pick one.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Above this many degrees of freedom the critical value comes from the
/// Wilson-Hilferty normal approximation.
const EXACT_QUANTILE_MAX_DF: f64 = 1000.0;

const QUANTILE_NEWTON_STEPS: usize = 20;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_pass(passed: bool) -> Self {
        if passed { Self::Pass } else { Self::Fail }
    }

    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }

    /// `+` for pass, `-` for fail.
    pub fn symbol(self) -> char {
        match self {
            Self::Pass => '+',
            Self::Fail => '-',
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Result of a single randomness test.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub verdict: Verdict,
    pub statistic: f64,
    /// Upper-tail probability of the statistic, when it follows chi-square.
    pub p_value: Option<f64>,
    /// Bound the statistic was compared against, if the test got that far.
    pub critical_value: Option<f64>,
    pub details: String,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }
}

/// Battery-wide settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryConfig {
    /// Significance level for every chi-square comparison.
    pub alpha: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Observed counts per category, built fresh for each test.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    counts: HashMap<K, u64>,
    total: u64,
}

impl<K: Hash + Eq> FrequencyTable<K> {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            total: 0,
        }
    }

    pub fn tally(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn count(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct categories seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of tallied observations.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Observed counts, largest first.
    pub fn counts_descending(&self) -> Vec<u64> {
        let mut v: Vec<u64> = self.counts.values().copied().collect();
        v.sort_unstable_by(|a, b| b.cmp(a));
        v
    }
}

impl<K: Hash + Eq> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.tally(key);
        }
        table
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Return a failing `TestResult` when data is too short.
fn insufficient(name: &str, needed: usize, got: usize) -> TestResult {
    TestResult {
        name: name.to_string(),
        verdict: Verdict::Fail,
        statistic: 0.0,
        p_value: None,
        critical_value: None,
        details: format!("Insufficient data: need {needed}, got {got}"),
    }
}

/// Bucket index of `x` on a grid of `dim` cells over `[0, 1)`.
fn cell(x: f64, dim: usize) -> usize {
    // Negative and NaN inputs saturate to 0 in the cast.
    ((x * dim as f64) as usize).min(dim - 1)
}

/// Key for counting equal reals; folds -0.0 into 0.0.
fn value_key(x: f64) -> u64 {
    if x == 0.0 { 0.0f64.to_bits() } else { x.to_bits() }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. CHI-SQUARE PRIMITIVE
// ═══════════════════════════════════════════════════════════════════════════════

/// Chi-square quantile at `1 - alpha` for `df` degrees of freedom.
///
/// Returns `None` for `df < 1` or `alpha` outside `(0, 1)`. Reported next to
/// the statistic; verdicts are decided by [`p_value`].
pub fn critical_value(df: f64, alpha: f64) -> Option<f64> {
    if !(df >= 1.0) || !(alpha > 0.0 && alpha < 1.0) {
        return None;
    }
    if df <= EXACT_QUANTILE_MAX_DF {
        let dist = ChiSquared::new(df).ok()?;
        return Some(refine_quantile(&dist, dist.inverse_cdf(1.0 - alpha), 1.0 - alpha));
    }
    let z = Normal::standard().inverse_cdf(1.0 - alpha);
    let h = 2.0 / (9.0 * df);
    Some(df * (1.0 - h + z * h.sqrt()).powi(3))
}

/// Newton steps on `cdf(x) - target`; the statrs inverse is only a few
/// decimals accurate.
fn refine_quantile(dist: &ChiSquared, start: f64, target: f64) -> f64 {
    let mut x = start;
    for _ in 0..QUANTILE_NEWTON_STEPS {
        let density = dist.pdf(x);
        if !(density > 0.0) || !x.is_finite() {
            break;
        }
        let step = (dist.cdf(x) - target) / density;
        let next = if x - step > 0.0 { x - step } else { x / 2.0 };
        let done = (next - x).abs() <= 1e-12 * x.max(1.0);
        x = next;
        if done {
            break;
        }
    }
    x
}

/// Upper-tail probability of `statistic` under chi-square with `df` degrees
/// of freedom (Wilson-Hilferty above 1000 degrees of freedom).
pub fn p_value(statistic: f64, df: f64) -> Option<f64> {
    if !(df >= 1.0) || statistic.is_nan() {
        return None;
    }
    if statistic == f64::INFINITY {
        return Some(0.0);
    }
    if statistic <= 0.0 {
        return Some(1.0);
    }
    if df <= EXACT_QUANTILE_MAX_DF {
        return Some(ChiSquared::new(df).ok()?.sf(statistic));
    }
    let h = 2.0 / (9.0 * df);
    let z = ((statistic / df).cbrt() - (1.0 - h)) / h.sqrt();
    Some(Normal::standard().sf(z))
}

/// `Σ (O - E)² / E` over paired categories.
///
/// A category expecting nothing adds 0 if nothing was seen and makes the
/// statistic infinite otherwise.
pub fn chi_square_statistic(observed: &[f64], expected: &[f64]) -> f64 {
    observed
        .iter()
        .zip(expected)
        .map(|(&o, &e)| {
            if e > 0.0 {
                (o - e) * (o - e) / e
            } else if o == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        })
        .sum()
}

/// Judge an already computed statistic with `categories - 1` degrees of
/// freedom: fail when its upper-tail probability drops below `alpha`.
fn verdict_from_statistic(
    name: &str,
    statistic: f64,
    categories: usize,
    alpha: f64,
    details: String,
) -> TestResult {
    if categories < 2 {
        return insufficient(name, 2, categories);
    }
    let df = (categories - 1) as f64;
    let (Some(critical), Some(p)) = (critical_value(df, alpha), p_value(statistic, df)) else {
        return TestResult {
            name: name.to_string(),
            verdict: Verdict::Fail,
            statistic,
            p_value: None,
            critical_value: None,
            details: format!("No critical value for alpha={alpha}"),
        };
    };
    TestResult {
        name: name.to_string(),
        verdict: Verdict::from_pass(p >= alpha),
        statistic,
        p_value: Some(p),
        critical_value: Some(critical),
        details,
    }
}

/// Chi-square goodness of fit: fail when the upper-tail probability of the
/// statistic with `categories - 1` degrees of freedom is below `alpha`.
pub fn chi_square_verdict(
    name: &str,
    observed: &[f64],
    expected: &[f64],
    categories: usize,
    alpha: f64,
) -> TestResult {
    if observed.len() != expected.len() {
        return TestResult {
            name: name.to_string(),
            verdict: Verdict::Fail,
            statistic: 0.0,
            p_value: None,
            critical_value: None,
            details: format!(
                "Category mismatch: {} observed vs {} expected",
                observed.len(),
                expected.len()
            ),
        };
    }
    let chi2 = chi_square_statistic(observed, expected);
    verdict_from_statistic(
        name,
        chi2,
        categories,
        alpha,
        format!("categories={categories}, df={}", categories.saturating_sub(1)),
    )
}

/// Test 1: Chi-square frequency -- every distinct value is a category, expected
/// counts are a uniform split of the sample.
pub fn chi_square_test(data: &[f64], alpha: f64) -> TestResult {
    default_chi_square("Chi-Square", data, alpha)
}

fn default_chi_square(name: &str, data: &[f64], alpha: f64) -> TestResult {
    let n = data.len();
    if n < 2 {
        return insufficient(name, 2, n);
    }
    let table: FrequencyTable<u64> = data.iter().map(|&x| value_key(x)).collect();
    let categories = table.len();
    let observed: Vec<f64> = table.counts.values().map(|&c| c as f64).collect();
    let expected = vec![n as f64 / categories as f64; categories];
    let mut result = chi_square_verdict(name, &observed, &expected, categories, alpha);
    if result.critical_value.is_some() {
        result.details = format!("n={n}, distinct={categories}");
    }
    result
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. SERIES TEST
// ═══════════════════════════════════════════════════════════════════════════════

/// Grid resolution per axis for the series test.
pub const SERIES_DIM: usize = 16;

/// Test 2: Series -- non-overlapping pairs on a 16×16 grid, 256 cells against a
/// uniform expectation of `N / 512`.
pub fn series_test(data: &[f64], alpha: f64) -> TestResult {
    let name = "Series";
    let n = data.len();
    let pairs = n / 2;
    if pairs == 0 {
        return insufficient(name, 2, n);
    }
    let categories = SERIES_DIM * SERIES_DIM;
    let mut counts = vec![0.0f64; categories];
    for pair in data.chunks_exact(2) {
        counts[cell(pair[0], SERIES_DIM) * SERIES_DIM + cell(pair[1], SERIES_DIM)] += 1.0;
    }
    let expected = vec![n as f64 / (2.0 * categories as f64); categories];
    let mut result = chi_square_verdict(name, &counts, &expected, categories, alpha);
    result.details = format!("pairs={pairs}, cells={categories}");
    result
}

// ═══════════════════════════════════════════════════════════════════════════════
// 3. INTERVAL (GAP) TEST
// ═══════════════════════════════════════════════════════════════════════════════

/// Run-length buckets `0..=6` plus a final `>= 7` bucket.
pub const GAP_BUCKETS: usize = 8;

/// Values below this threshold extend a run.
const GAP_THRESHOLD: f64 = 0.5;

/// Test 3: Interval -- lengths of runs below 0.5, each ended by a value at or
/// above 0.5, against the geometric distribution. Collects `N / 10` runs and
/// fails outright if the sequence runs out first.
pub fn interval_test(data: &[f64], alpha: f64) -> TestResult {
    let name = "Interval";
    let n = data.len();
    let required = n / 10;
    if required == 0 {
        return insufficient(name, 10, n);
    }

    let mut observed = [0.0f64; GAP_BUCKETS];
    let mut runs = 0usize;
    let mut index = 0usize;
    while runs < required {
        let mut run_length = 0usize;
        while index < n && data[index] < GAP_THRESHOLD {
            index += 1;
            run_length += 1;
        }
        if index == n {
            return TestResult {
                name: name.to_string(),
                verdict: Verdict::Fail,
                statistic: 0.0,
                p_value: None,
                critical_value: None,
                details: format!(
                    "Insufficient data: sequence ended after {runs} of {required} runs"
                ),
            };
        }
        // The terminating value closes this run and is not part of the next.
        index += 1;
        observed[run_length.min(GAP_BUCKETS - 1)] += 1.0;
        runs += 1;
    }

    let total = required as f64;
    let p = GAP_THRESHOLD;
    let mut expected = [0.0f64; GAP_BUCKETS];
    for (r, slot) in expected.iter_mut().enumerate().take(GAP_BUCKETS - 1) {
        *slot = total * p * (1.0 - p).powi(r as i32);
    }
    expected[GAP_BUCKETS - 1] = total * (1.0 - p).powi((GAP_BUCKETS - 1) as i32);

    let mut result = chi_square_verdict(name, &observed, &expected, GAP_BUCKETS, alpha);
    result.details = format!("runs={runs}, consumed={index}/{n}");
    result
}

// ═══════════════════════════════════════════════════════════════════════════════
// 4. PARTITION TEST
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of contiguous blocks examined.
pub const PARTITION_BLOCKS: usize = 100;
/// Elements per block.
pub const PARTITION_BLOCK_LEN: usize = 100;
/// Value classes each element is scaled into.
pub const PARTITION_CLASSES: usize = 100;
/// Pooled buckets must expect at least this many blocks.
const PARTITION_MIN_EXPECTED: f64 = 5.0;

/// Probability of seeing exactly `r` distinct bins after throwing `balls`
/// balls uniformly into `bins` bins, for `r` in `0..=bins`.
pub fn occupancy_distribution(balls: usize, bins: usize) -> Vec<f64> {
    let d = bins as f64;
    let mut p = vec![0.0f64; bins + 1];
    p[0] = 1.0;
    for _ in 0..balls {
        let mut next = vec![0.0f64; bins + 1];
        for j in 0..=bins {
            if p[j] == 0.0 {
                continue;
            }
            // Lands in an occupied bin.
            next[j] += p[j] * j as f64 / d;
            // Lands in a fresh bin.
            if j < bins {
                next[j + 1] += p[j] * (d - j as f64) / d;
            }
        }
        p = next;
    }
    p
}

/// Merge adjacent categories left to right until each expects at least
/// `min_expected`; a short remainder joins the last bucket.
fn pool_categories(observed: &[f64], expected: &[f64], min_expected: f64) -> (Vec<f64>, Vec<f64>) {
    let mut pooled_obs = Vec::new();
    let mut pooled_exp = Vec::new();
    let (mut acc_o, mut acc_e) = (0.0, 0.0);
    for (&o, &e) in observed.iter().zip(expected) {
        acc_o += o;
        acc_e += e;
        if acc_e >= min_expected {
            pooled_obs.push(acc_o);
            pooled_exp.push(acc_e);
            acc_o = 0.0;
            acc_e = 0.0;
        }
    }
    if acc_e > 0.0 || acc_o > 0.0 {
        match (pooled_obs.last_mut(), pooled_exp.last_mut()) {
            (Some(o), Some(e)) => {
                *o += acc_o;
                *e += acc_e;
            }
            _ => {
                pooled_obs.push(acc_o);
                pooled_exp.push(acc_e);
            }
        }
    }
    (pooled_obs, pooled_exp)
}

/// Test 4: Partition -- 100 blocks of 100 values, each scaled into 100
/// classes; the number of distinct classes per block is compared with the
/// balls-into-bins occupancy distribution.
pub fn partition_test(data: &[f64], alpha: f64) -> TestResult {
    let name = "Partition";
    let needed = PARTITION_BLOCKS * PARTITION_BLOCK_LEN;
    let n = data.len();
    if n < needed {
        return insufficient(name, needed, n);
    }

    let mut observed = vec![0.0f64; PARTITION_CLASSES + 1];
    for block in data[..needed].chunks_exact(PARTITION_BLOCK_LEN) {
        let mut seen = [false; PARTITION_CLASSES];
        for &x in block {
            seen[cell(x, PARTITION_CLASSES)] = true;
        }
        let distinct = seen.iter().filter(|&&s| s).count();
        observed[distinct] += 1.0;
    }

    let expected: Vec<f64> = occupancy_distribution(PARTITION_BLOCK_LEN, PARTITION_CLASSES)
        .into_iter()
        .map(|p| p * PARTITION_BLOCKS as f64)
        .collect();
    let (obs, exp) = pool_categories(&observed, &expected, PARTITION_MIN_EXPECTED);
    let categories = obs.len();
    let mut result = chi_square_verdict(name, &obs, &exp, categories, alpha);
    if result.critical_value.is_some() {
        result.details = format!("blocks={PARTITION_BLOCKS}, pooled categories={categories}");
    }
    result
}

// ═══════════════════════════════════════════════════════════════════════════════
// 5. PERMUTATION TEST
// ═══════════════════════════════════════════════════════════════════════════════

/// Elements per tuple.
pub const PERMUTATION_TUPLE: usize = 10;

fn factorial(k: usize) -> usize {
    (1..=k).product()
}

/// Lehmer rank of the order pattern of `tuple`, in `0..len!`.
///
/// Equal values are ordered by position.
pub fn order_pattern_rank(tuple: &[f64]) -> usize {
    let k = tuple.len();
    let mut rank = 0usize;
    for i in 0..k {
        let smaller_after = tuple[i + 1..].iter().filter(|&&x| x < tuple[i]).count();
        rank += smaller_after * factorial(k - 1 - i);
    }
    rank
}

/// Test 5: Permutation -- order patterns of non-overlapping 10-tuples against
/// a uniform expectation over all 10! patterns.
pub fn permutation_test(data: &[f64], alpha: f64) -> TestResult {
    let name = "Permutation";
    let n = data.len();
    let groups = n / PERMUTATION_TUPLE;
    if groups == 0 {
        return insufficient(name, PERMUTATION_TUPLE, n);
    }
    let classes = factorial(PERMUTATION_TUPLE);
    let table: FrequencyTable<usize> = data
        .chunks_exact(PERMUTATION_TUPLE)
        .map(order_pattern_rank)
        .collect();

    // One draw per tuple, so each class expects `groups / 10!`.
    let expected = groups as f64 / classes as f64;
    let unseen = (classes - table.len()) as f64;
    let observed = table.counts_descending();
    let chi2 = observed
        .iter()
        .map(|&o| {
            let d = o as f64 - expected;
            d * d / expected
        })
        .sum::<f64>()
        + unseen * expected;

    let top: Vec<String> = observed.iter().take(5).map(|c| c.to_string()).collect();
    verdict_from_statistic(
        name,
        chi2,
        classes,
        alpha,
        format!(
            "groups={groups}, patterns seen={}, top counts=[{}]",
            table.len(),
            top.join(", ")
        ),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 6. MONOTONICITY (RUN) TEST
// ═══════════════════════════════════════════════════════════════════════════════

/// Longest run prefix that enters the quadratic form.
pub const RUN_TERMS: usize = 6;

const RUN_WEIGHTS: [f64; RUN_TERMS] = [
    1.0 / 6.0,
    5.0 / 24.0,
    11.0 / 120.0,
    19.0 / 720.0,
    29.0 / 5040.0,
    1.0 / 840.0,
];

/// Knuth's symmetric run-test matrix (`A[0][3] = 18091`, `A[2][4] = 67852`).
const RUN_MATRIX: [[f64; RUN_TERMS]; RUN_TERMS] = [
    [4529.4, 9044.9, 13568.0, 18091.0, 22615.0, 27892.0],
    [9044.9, 18097.0, 27139.0, 36187.0, 45234.0, 55789.0],
    [13568.0, 27139.0, 40721.0, 54281.0, 67852.0, 83685.0],
    [18091.0, 36187.0, 54281.0, 72414.0, 90470.0, 111580.0],
    [22615.0, 45234.0, 67852.0, 90470.0, 113262.0, 139476.0],
    [27892.0, 55789.0, 83685.0, 111580.0, 139476.0, 172860.0],
];

/// Maximal non-decreasing runs as `(start, len)` pairs.
pub fn ascending_runs(data: &[f64]) -> Vec<(usize, usize)> {
    let n = data.len();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < n {
        let mut len = 1;
        while i + len < n && data[i + len - 1] <= data[i + len] {
            len += 1;
        }
        runs.push((i, len));
        i += len;
    }
    runs
}

/// Quadratic-form score of one run.
fn run_score(run: &[f64], n: f64) -> f64 {
    let terms = run.len().min(RUN_TERMS);
    let mut score = 1.0 / 6.0;
    for i in 0..terms {
        let di = run[i] - n * RUN_WEIGHTS[i];
        for j in 0..terms {
            let dj = run[j] - n * RUN_WEIGHTS[j];
            score += di * dj * RUN_MATRIX[i][j];
        }
    }
    score
}

/// Test 6: Monotonicity -- each maximal non-decreasing run is reduced to a
/// quadratic-form score over its first six terms; the scores are then
/// chi-square tested by value frequency.
pub fn monotonicity_test(data: &[f64], alpha: f64) -> TestResult {
    let name = "Monotonicity";
    let n = data.len();
    if n == 0 {
        return insufficient(name, 1, 0);
    }
    let runs = ascending_runs(data);
    let scores: Vec<f64> = runs
        .iter()
        .map(|&(start, len)| run_score(&data[start..start + len], n as f64))
        .collect();
    let longest = runs.iter().map(|&(_, len)| len).max().unwrap_or(0);
    let mut result = default_chi_square(name, &scores, alpha);
    if result.critical_value.is_some() {
        result.details = format!("runs={}, longest={longest}", runs.len());
    }
    result
}

// ═══════════════════════════════════════════════════════════════════════════════
// 7. CONFLICT (COLLISION) TEST
// ═══════════════════════════════════════════════════════════════════════════════

/// Buckets the sequence positions are hashed into.
pub const CONFLICT_BUCKETS: usize = 1024;
/// Largest accepted gap between the two occupancy metrics.
pub const CONFLICT_TOLERANCE: f64 = 10.0;

/// Test 7: Conflict -- birthday approximation of bucket occupancy for `N`
/// positions in 1024 buckets, checked against a fixed tolerance of 10.
///
/// This is a numeric bound on `N` rather than a distributional test; the
/// observed collision count is reported in the details only.
pub fn conflict_test(data: &[f64], _alpha: f64) -> TestResult {
    let name = "Conflict";
    let n = data.len();
    if n == 0 {
        return insufficient(name, 1, 0);
    }
    let nf = n as f64;
    let m = CONFLICT_BUCKETS as f64;
    let fill = nf / m;
    let p0 = 1.0 - nf / m + nf * (nf - 1.0) / (2.0 * m * m);
    let conflicts = nf / m - 1.0 + p0;
    let metric = (conflicts - fill).abs();

    let mut occupied = vec![false; CONFLICT_BUCKETS];
    for &x in data {
        occupied[cell(x, CONFLICT_BUCKETS)] = true;
    }
    let observed = n - occupied.iter().filter(|&&o| o).count();

    TestResult {
        name: name.to_string(),
        verdict: Verdict::from_pass(metric <= CONFLICT_TOLERANCE),
        statistic: metric,
        p_value: None,
        critical_value: Some(CONFLICT_TOLERANCE),
        details: format!("p0={p0:.4}, expected conflicts={conflicts:.2}, observed={observed}"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test battery
// ═══════════════════════════════════════════════════════════════════════════════

type BatteryTest = fn(&[f64], f64) -> TestResult;

const BATTERY: [(&str, BatteryTest); 7] = [
    ("Chi-Square", chi_square_test),
    ("Series", series_test),
    ("Interval", interval_test),
    ("Partition", partition_test),
    ("Permutation", permutation_test),
    ("Monotonicity", monotonicity_test),
    ("Conflict", conflict_test),
];

/// Run all seven tests on a normalized sequence.
pub fn run_battery(data: &[f64], config: &BatteryConfig) -> Vec<TestResult> {
    log::debug!("running battery on {} values, alpha={}", data.len(), config.alpha);
    BATTERY
        .iter()
        .map(|&(name, test_fn)| {
            match std::panic::catch_unwind(|| test_fn(data, config.alpha)) {
                Ok(result) => {
                    log::debug!("{name}: {} ({})", result.verdict, result.details);
                    result
                }
                Err(_) => TestResult {
                    name: name.to_string(),
                    verdict: Verdict::Fail,
                    statistic: 0.0,
                    p_value: None,
                    critical_value: None,
                    details: "Test panicked".to_string(),
                },
            }
        })
        .collect()
}

/// Number of passing results.
pub fn passed_count(results: &[TestResult]) -> usize {
    results.iter().filter(|r| r.passed()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pseudo-random reals in [0, 1) from a 64-bit LCG (top 53 bits).
    fn pseudo_random(n: usize) -> Vec<f64> {
        let mut state: u64 = 0xDEAD_BEEF_CAFE_BABE;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 11) as f64 / (1u64 << 53) as f64
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Verdict / TestResult
    // -----------------------------------------------------------------------

    #[test]
    fn test_verdict_symbols() {
        assert_eq!(Verdict::Pass.to_string(), "+");
        assert_eq!(Verdict::Fail.to_string(), "-");
        assert!(Verdict::from_pass(true).is_pass());
        assert!(!Verdict::from_pass(false).is_pass());
    }

    #[test]
    fn test_default_config() {
        assert_eq!(BatteryConfig::default().alpha, 0.05);
    }

    #[test]
    fn test_frequency_table() {
        let table: FrequencyTable<u8> = [3, 1, 3, 3, 2, 1].into_iter().collect();
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 6);
        assert_eq!(table.count(&3), 3);
        assert_eq!(table.count(&9), 0);
        assert_eq!(table.counts_descending(), vec![3, 2, 1]);
        assert!(FrequencyTable::<u8>::new().is_empty());
    }

    // -----------------------------------------------------------------------
    // Chi-square primitive
    // -----------------------------------------------------------------------

    #[test]
    fn test_critical_values() {
        let c1 = critical_value(1.0, 0.05).unwrap();
        assert!((c1 - 3.841_459).abs() < 1e-5, "{c1}");
        let c7 = critical_value(7.0, 0.05).unwrap();
        assert!((c7 - 14.067_140).abs() < 1e-5, "{c7}");
        let c255 = critical_value(255.0, 0.05).unwrap();
        assert!((c255 - 293.247_835).abs() < 1e-4, "{c255}");
        assert!(critical_value(0.0, 0.05).is_none());
        assert!(critical_value(5.0, 0.0).is_none());
        assert!(critical_value(5.0, 1.0).is_none());
    }

    #[test]
    fn test_critical_value_sits_at_alpha() {
        for df in [1.0, 7.0, 50.0, 99.0, 255.0, 500.0, 999.0, 1000.0] {
            for alpha in [0.01, 0.05, 0.1] {
                let c = critical_value(df, alpha).unwrap();
                let p = p_value(c, df).unwrap();
                assert!((p - alpha).abs() < 1e-6, "df={df} alpha={alpha} p={p}");
            }
        }
    }

    #[test]
    fn test_series_df_boundary_verdicts() {
        // Quantile for 255 degrees of freedom is 293.2478.
        let above = verdict_from_statistic("Series", 293.4, 256, 0.05, String::new());
        assert_eq!(above.verdict, Verdict::Fail);
        assert!(above.p_value.unwrap() < 0.05);
        let below = verdict_from_statistic("Series", 293.2, 256, 0.05, String::new());
        assert_eq!(below.verdict, Verdict::Pass);
        assert!(below.p_value.unwrap() > 0.05);
    }

    #[test]
    fn test_p_value_edges() {
        assert_eq!(p_value(0.0, 4.0), Some(1.0));
        assert_eq!(p_value(f64::INFINITY, 4.0), Some(0.0));
        assert_eq!(p_value(f64::INFINITY, 5_000.0), Some(0.0));
        assert!(p_value(1.0, 0.0).is_none());
        // Wilson-Hilferty puts the median close to df.
        let mid = p_value(3_628_799.0, 3_628_799.0).unwrap();
        assert!((mid - 0.5).abs() < 0.01, "{mid}");
    }

    #[test]
    fn test_critical_value_approximation_is_continuous() {
        let exact = critical_value(1000.0, 0.05).unwrap();
        let approx = critical_value(1000.0 + 1e-9, 0.05).unwrap();
        assert!((exact - approx).abs() / exact < 1e-4, "{exact} vs {approx}");
    }

    #[test]
    fn test_statistic_and_zero_expectation() {
        assert_eq!(chi_square_statistic(&[10.0, 10.0], &[10.0, 10.0]), 0.0);
        assert_eq!(chi_square_statistic(&[12.0, 8.0], &[10.0, 10.0]), 0.8);
        assert_eq!(chi_square_statistic(&[0.0, 5.0], &[0.0, 5.0]), 0.0);
        assert!(chi_square_statistic(&[1.0, 5.0], &[0.0, 5.0]).is_infinite());
    }

    #[test]
    fn test_statistic_monotonic_in_mismatch() {
        let expected = [25.0; 4];
        let mut last = -1.0;
        let mut last_verdict = Verdict::Pass;
        for extra in 0..40 {
            let o = 25.0 + extra as f64;
            let observed = [o, 25.0, 25.0, 25.0];
            let r = chi_square_verdict("m", &observed, &expected, 4, 0.05);
            assert!(r.statistic > last);
            // Once failing, never passing again.
            if last_verdict == Verdict::Fail {
                assert_eq!(r.verdict, Verdict::Fail);
            }
            last = r.statistic;
            last_verdict = r.verdict;
        }
        assert_eq!(last_verdict, Verdict::Fail);
    }

    #[test]
    fn test_verdict_mismatch_and_too_few_categories() {
        let r = chi_square_verdict("x", &[1.0], &[1.0, 2.0], 2, 0.05);
        assert!(!r.passed());
        assert!(r.details.contains("mismatch"));
        let r = chi_square_verdict("x", &[3.0], &[3.0], 1, 0.05);
        assert!(!r.passed());
        assert!(r.details.contains("Insufficient"));
    }

    #[test]
    fn test_chi_square_frequency_uniform_values() {
        // Ten distinct values, each seen ten times: a perfect fit.
        let data: Vec<f64> = (0..100).map(|i| (i % 10) as f64 / 10.0).collect();
        let r = chi_square_test(&data, 0.05);
        assert!(r.passed());
        assert_eq!(r.statistic, 0.0);
    }

    #[test]
    fn test_chi_square_frequency_skewed_values() {
        let mut data = vec![0.0; 90];
        data.extend((1..=10).map(|i| i as f64 / 20.0));
        let r = chi_square_test(&data, 0.05);
        assert!(!r.passed());
    }

    #[test]
    fn test_chi_square_frequency_single_value() {
        let r = chi_square_test(&[0.5; 20], 0.05);
        assert!(!r.passed());
        assert!(r.critical_value.is_none());
    }

    // -----------------------------------------------------------------------
    // Series
    // -----------------------------------------------------------------------

    #[test]
    fn test_series_balanced_grid_passes() {
        let mut data = Vec::with_capacity(512);
        for i in 0..16 {
            for j in 0..16 {
                data.push((i as f64 + 0.5) / 16.0);
                data.push((j as f64 + 0.5) / 16.0);
            }
        }
        let r = series_test(&data, 0.05);
        assert!(r.passed(), "{r:?}");
        assert_eq!(r.statistic, 0.0);
    }

    #[test]
    fn test_series_single_cell_fails() {
        let data = vec![0.01; 512];
        let r = series_test(&data, 0.05);
        assert!(!r.passed());
    }

    #[test]
    fn test_series_insufficient() {
        let r = series_test(&[0.3], 0.05);
        assert!(!r.passed());
        assert!(r.details.contains("Insufficient"));
    }

    // -----------------------------------------------------------------------
    // Interval
    // -----------------------------------------------------------------------

    #[test]
    fn test_interval_runs_out_of_data() {
        // Nothing ever ends a run.
        let r = interval_test(&[0.1; 100], 0.05);
        assert!(!r.passed());
        assert!(r.details.contains("Insufficient"));
    }

    #[test]
    fn test_interval_too_short() {
        let r = interval_test(&[0.9, 0.1, 0.7], 0.05);
        assert!(!r.passed());
        assert!(r.details.contains("Insufficient"));
    }

    #[test]
    fn test_interval_all_zero_length_runs_fails() {
        // Every value terminates a run immediately: all runs have length 0.
        let r = interval_test(&[0.9; 1000], 0.05);
        assert!(!r.passed());
        assert!(r.critical_value.is_some());
    }

    #[test]
    fn test_interval_geometric_runs_pass() {
        // 128 runs laid out exactly in geometric proportion: 64 of length 0,
        // 32 of length 1, ..., 1 of length 6 and 1 of length 7.
        let mut data = Vec::new();
        let counts = [64, 32, 16, 8, 4, 2, 1, 1];
        for (len, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                data.extend(std::iter::repeat_n(0.25, len));
                data.push(0.75);
            }
        }
        data.resize(1280, 0.75);
        let r = interval_test(&data, 0.05);
        assert!(r.passed(), "{r:?}");
        assert!(r.statistic < 1e-9);
    }

    // -----------------------------------------------------------------------
    // Partition
    // -----------------------------------------------------------------------

    #[test]
    fn test_occupancy_distribution_sums_to_one() {
        let p = occupancy_distribution(100, 100);
        assert_eq!(p.len(), 101);
        let total: f64 = p.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        let mean: f64 = p.iter().enumerate().map(|(r, &q)| r as f64 * q).sum();
        let exact = 100.0 * (1.0 - 0.99f64.powi(100));
        assert!((mean - exact).abs() < 1e-6);
        assert_eq!(p[0], 0.0);
    }

    #[test]
    fn test_occupancy_small_case() {
        // Two balls in two bins: one bin with prob 1/2, both with 1/2.
        let p = occupancy_distribution(2, 2);
        assert_eq!(p, vec![0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_pool_categories_keeps_totals() {
        let observed = [0.0, 1.0, 7.0, 9.0, 2.0, 1.0];
        let expected = [0.5, 2.0, 8.0, 7.0, 1.5, 1.0];
        let (o, e) = pool_categories(&observed, &expected, 5.0);
        assert_eq!(o.iter().sum::<f64>(), 20.0);
        assert_eq!(e.iter().sum::<f64>(), 20.0);
        assert!(e.iter().all(|&x| x >= 5.0));
        assert_eq!(e, vec![10.5, 9.5]);
    }

    #[test]
    fn test_partition_insufficient() {
        let r = partition_test(&pseudo_random(9_999), 0.05);
        assert!(!r.passed());
        assert!(r.details.contains("Insufficient"));
    }

    #[test]
    fn test_partition_constant_blocks_fail() {
        let r = partition_test(&vec![0.5; 10_000], 0.05);
        assert!(!r.passed());
    }

    #[test]
    fn test_partition_random_passes() {
        let r = partition_test(&pseudo_random(10_000), 0.05);
        assert!(r.passed(), "{r:?}");
    }

    // -----------------------------------------------------------------------
    // Permutation
    // -----------------------------------------------------------------------

    #[test]
    fn test_order_pattern_rank_extremes() {
        let ascending: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let descending: Vec<f64> = (0..10).rev().map(|i| i as f64).collect();
        assert_eq!(order_pattern_rank(&ascending), 0);
        assert_eq!(order_pattern_rank(&descending), factorial(10) - 1);
        assert_eq!(order_pattern_rank(&[0.2, 0.1, 0.3]), 2);
        // Ties rank by position, like the ascending case.
        assert_eq!(order_pattern_rank(&[0.5, 0.5, 0.5]), 0);
    }

    #[test]
    fn test_order_pattern_rank_is_bijective_for_small_tuples() {
        let perms = [
            [0.0, 1.0, 2.0],
            [0.0, 2.0, 1.0],
            [1.0, 0.0, 2.0],
            [1.0, 2.0, 0.0],
            [2.0, 0.0, 1.0],
            [2.0, 1.0, 0.0],
        ];
        let mut ranks: Vec<usize> = perms.iter().map(|p| order_pattern_rank(p)).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_permutation_repeated_pattern_fails() {
        let data: Vec<f64> = (0..2_000).map(|i| (i % 10) as f64 / 10.0).collect();
        let r = permutation_test(&data, 0.05);
        assert!(!r.passed());
        assert!(r.details.contains("patterns seen=1"));
    }

    #[test]
    fn test_permutation_random_passes() {
        let r = permutation_test(&pseudo_random(2_000), 0.05);
        assert!(r.passed(), "{r:?}");
    }

    #[test]
    fn test_permutation_expects_groups_per_class() {
        // 200 tuples with distinct patterns: Σ o²/E - groups = 10! - 200.
        let data = pseudo_random(2_000);
        let r = permutation_test(&data, 0.05);
        assert!(r.details.contains("patterns seen=200"), "{}", r.details);
        let expected = (factorial(PERMUTATION_TUPLE) - 200) as f64;
        assert!((r.statistic - expected).abs() < 1e-3, "{}", r.statistic);
    }

    #[test]
    fn test_permutation_insufficient() {
        let r = permutation_test(&[0.1; 9], 0.05);
        assert!(!r.passed());
    }

    // -----------------------------------------------------------------------
    // Monotonicity
    // -----------------------------------------------------------------------

    #[test]
    fn test_ascending_runs() {
        let runs = ascending_runs(&[0.1, 0.2, 0.2, 0.1, 0.5, 0.3]);
        assert_eq!(runs, vec![(0, 3), (3, 2), (5, 1)]);
        assert!(ascending_runs(&[]).is_empty());
    }

    #[test]
    fn test_run_matrix_is_symmetric() {
        for i in 0..RUN_TERMS {
            for j in 0..RUN_TERMS {
                assert_eq!(RUN_MATRIX[i][j], RUN_MATRIX[j][i]);
            }
        }
    }

    #[test]
    fn test_run_score_uses_at_most_six_terms() {
        let long: Vec<f64> = (0..10).map(|i| i as f64 / 10.0).collect();
        assert_eq!(run_score(&long, 10.0), run_score(&long[..6], 10.0));
        assert_ne!(run_score(&long[..5], 10.0), run_score(&long[..6], 10.0));
    }

    #[test]
    fn test_monotonicity_single_run_fails() {
        let data: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        let r = monotonicity_test(&data, 0.05);
        assert!(!r.passed());
    }

    #[test]
    fn test_monotonicity_random_passes() {
        let r = monotonicity_test(&pseudo_random(1_000), 0.05);
        assert!(r.passed(), "{r:?}");
        assert!(r.details.starts_with("runs="));
    }

    // -----------------------------------------------------------------------
    // Conflict
    // -----------------------------------------------------------------------

    #[test]
    fn test_conflict_bound() {
        assert!(conflict_test(&pseudo_random(1_000), 0.05).passed());
        assert!(conflict_test(&pseudo_random(5_000), 0.05).passed());
        // n(n-1)/2m² - n/m exceeds 10 once n is past ~5700.
        assert!(!conflict_test(&pseudo_random(10_000), 0.05).passed());
        assert!(!conflict_test(&[], 0.05).passed());
    }

    #[test]
    fn test_conflict_reports_observed_collisions() {
        let r = conflict_test(&[0.5; 10], 0.05);
        assert!(r.details.ends_with("observed=9"), "{}", r.details);
    }

    // -----------------------------------------------------------------------
    // Battery
    // -----------------------------------------------------------------------

    #[test]
    fn test_battery_has_seven_results_in_order() {
        let results = run_battery(&pseudo_random(10_000), &BatteryConfig::default());
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Chi-Square",
                "Series",
                "Interval",
                "Partition",
                "Permutation",
                "Monotonicity",
                "Conflict"
            ]
        );
    }

    #[test]
    fn test_constant_data_fails_most() {
        let results = run_battery(&vec![0.0; 10_000], &BatteryConfig::default());
        assert!(passed_count(&results) < results.len() / 2);
    }

    #[test]
    fn test_pseudo_random_passes_most() {
        let results = run_battery(&pseudo_random(5_000), &BatteryConfig::default());
        let passed = passed_count(&results);
        assert!(
            passed > results.len() / 2,
            "Only {passed}/{} tests passed",
            results.len()
        );
    }
}
