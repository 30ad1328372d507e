use std::io::Write;

use randlab_core::GeneratorError;
use randlab_tests::{BatteryConfig, RunningPoint, SequenceSummary, TestResult};
use serde::Serialize;

use crate::error::{CliError, Result};

pub struct AnalyzeCommandConfig<'a> {
    pub path: &'a str,
    pub alpha: f64,
    pub output_path: Option<&'a str>,
    pub running_path: Option<&'a str>,
}

/// Machine-readable analysis written by `--output`.
#[derive(Serialize)]
pub struct AnalysisReport {
    pub file: String,
    pub alpha: f64,
    pub summary: SequenceSummary,
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub total: usize,
}

pub fn analyze_file(config: &AnalyzeCommandConfig<'_>) -> Result<(AnalysisReport, Vec<f64>)> {
    if !(config.alpha > 0.0 && config.alpha < 1.0) {
        return Err(CliError::Usage(format!(
            "alpha must lie strictly between 0 and 1, got {}",
            config.alpha
        )));
    }
    let unit = super::load_normalized(config.path)?;
    log::debug!("analyzing {} ({} values, alpha={})", config.path, unit.len(), config.alpha);
    let summary = SequenceSummary::from_sequence(&unit).ok_or(GeneratorError::EmptySequence)?;
    let results = randlab_tests::run_battery(&unit, &BatteryConfig { alpha: config.alpha });
    let passed = randlab_tests::passed_count(&results);
    let report = AnalysisReport {
        file: config.path.to_string(),
        alpha: config.alpha,
        summary,
        total: results.len(),
        results,
        passed,
    };
    Ok((report, unit))
}

/// Running statistics as `size,mean,std_dev` rows with a header.
pub fn write_running_csv<W: Write>(mut writer: W, points: &[RunningPoint]) -> std::io::Result<()> {
    writeln!(writer, "size,mean,std_dev")?;
    for p in points {
        writeln!(writer, "{},{},{}", p.size, p.mean, p.std_dev)?;
    }
    writer.flush()
}

pub fn run(config: AnalyzeCommandConfig<'_>) -> Result<()> {
    let (report, unit) = analyze_file(&config)?;
    let s = &report.summary;

    println!("Sequence: {} ({} values)\n", report.file, s.count);
    println!(
        "  mean    {:>10.6}  (ideal {:.4}, error {:.6})",
        s.mean,
        randlab_tests::IDEAL_MEAN,
        s.mean_error
    );
    println!(
        "  std dev {:>10.6}  (ideal {:.4}, error {:.6})",
        s.std_dev,
        randlab_tests::IDEAL_STD_DEV,
        s.std_dev_error
    );

    println!("\n{}", "=".repeat(72));
    println!(
        "{:<14} {:>7} {:>14} {:>14}  Details",
        "Test", "Verdict", "Statistic", "Critical"
    );
    println!("{}", "-".repeat(72));
    for r in &report.results {
        let critical = r
            .critical_value
            .map(|c| format!("{c:.4}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<14} {:>7} {:>14.4} {:>14}  {}",
            r.name, r.verdict, r.statistic, critical, r.details
        );
    }
    println!("{}", "=".repeat(72));
    println!(
        "{}/{} tests passed at alpha={}",
        report.passed, report.total, report.alpha
    );

    if let Some(path) = config.output_path {
        super::write_file(path, &serde_json::to_string_pretty(&report)?)?;
        println!("\nReport saved to: {path}");
    }

    if let Some(path) = config.running_path {
        let points = randlab_tests::running_statistics(&unit);
        let mut buf = Vec::new();
        write_running_csv(&mut buf, &points).map_err(|source| CliError::Write {
            path: path.to_string(),
            source,
        })?;
        super::write_file(path, &String::from_utf8_lossy(&buf))?;
        println!("Running statistics saved to: {path}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_lcg_file(dir: &std::path::Path, n: usize) -> String {
        let path = dir.join("seq.txt");
        let mut state: u64 = 12345;
        let values: Vec<u64> = (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                state >> 33
            })
            .collect();
        randlab_core::write_sequence_file(&path, &values).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_analyze_report_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_lcg_file(dir.path(), 2_000);
        let config = AnalyzeCommandConfig {
            path: &path,
            alpha: 0.05,
            output_path: None,
            running_path: None,
        };
        let (report, unit) = analyze_file(&config).unwrap();
        assert_eq!(report.summary.count, 2_000);
        assert_eq!(unit.len(), 2_000);
        assert_eq!(report.total, 7);
        assert_eq!(report.results.len(), 7);
        assert!(report.summary.mean_error < 0.05);
    }

    #[test]
    fn test_analyze_rejects_bad_alpha() {
        let config = AnalyzeCommandConfig {
            path: "unused.txt",
            alpha: 1.5,
            output_path: None,
            running_path: None,
        };
        assert!(matches!(analyze_file(&config), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_analyze_missing_file() {
        let config = AnalyzeCommandConfig {
            path: "/nonexistent/randlab/seq.txt",
            alpha: 0.05,
            output_path: None,
            running_path: None,
        };
        assert!(matches!(analyze_file(&config), Err(CliError::Sequence(_))));
    }

    #[test]
    fn test_running_csv() {
        let points = randlab_tests::running_statistics(&[0.5, 0.25]);
        let mut buf = Vec::new();
        write_running_csv(&mut buf, &points).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "size,mean,std_dev");
        assert_eq!(lines[1], "1,0.5,0");
        assert!(lines[2].starts_with("2,0.375,"));
    }

    #[test]
    fn test_run_writes_json_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_lcg_file(dir.path(), 500);
        let json_path = dir.path().join("report.json");
        let csv_path = dir.path().join("running.csv");
        let json_str = json_path.to_str().unwrap().to_string();
        let csv_str = csv_path.to_str().unwrap().to_string();
        run(AnalyzeCommandConfig {
            path: &path,
            alpha: 0.01,
            output_path: Some(&json_str),
            running_path: Some(&csv_str),
        })
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["alpha"], 0.01);
        assert_eq!(json["results"].as_array().unwrap().len(), 7);
        assert_eq!(json["summary"]["count"], 500);
        let verdict = json["results"][0]["verdict"].as_str().unwrap();
        assert!(verdict == "pass" || verdict == "fail");

        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(csv.lines().count(), 501);
    }
}
