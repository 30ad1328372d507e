//! Battery runs over real generator output from randlab-core.

use randlab_core::{GeneratorParams, Method, SeededEntropy, generate, normalize};
use randlab_tests::{BatteryConfig, SequenceSummary, Verdict, passed_count, run_battery};

fn normalized(method: Method, text: &str, length: usize) -> Vec<f64> {
    let params = GeneratorParams::parse(method, text).unwrap();
    let values = generate(length, &params, &mut SeededEntropy::new(99)).unwrap();
    normalize(&values).unwrap()
}

#[test]
fn battery_reports_every_test_once() {
    let unit = normalized(Method::Rc4, "1;2;3;4;5", 10_000);
    let results = run_battery(&unit, &BatteryConfig::default());
    assert_eq!(results.len(), 7);
    for r in &results {
        assert!(!r.name.is_empty());
        assert!(!r.details.is_empty(), "{} has no details", r.name);
    }
}

#[test]
fn short_period_lc_fails_the_series_test() {
    // Modulus 16: the sequence repeats every 16 values and covers few grid cells.
    let unit = normalized(Method::LinearCongruential, "1;5;3;16", 4_096);
    let results = run_battery(&unit, &BatteryConfig::default());
    let series = results.iter().find(|r| r.name == "Series").unwrap();
    assert_eq!(series.verdict, Verdict::Fail);
}

#[test]
fn lower_alpha_never_fails_more_chi_square_tests() {
    let unit = normalized(Method::MersenneTempering, "", 5_000);
    let strict = run_battery(&unit, &BatteryConfig { alpha: 0.001 });
    let loose = run_battery(&unit, &BatteryConfig { alpha: 0.2 });
    assert!(passed_count(&strict) >= passed_count(&loose));
}

#[test]
fn summary_of_generator_output_is_near_uniform() {
    let unit = normalized(Method::Rc4, "9;9;9", 20_000);
    let summary = SequenceSummary::from_sequence(&unit).unwrap();
    assert_eq!(summary.count, 20_000);
    assert!(summary.mean_error < 0.02, "{summary:?}");
    assert!(summary.std_dev_error < 0.02, "{summary:?}");
}
