//! Per-configuration statistics and their rendering.

mod stats;
mod text;

use std::io::Write;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::bench::{RunResults, SuiteResults};
use crate::conf::ReportFormat;
use crate::core::BenchError;

pub use stats::LatencyStats;

fn as_micros<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_nanos() as f64 / 1e3)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub batch_size: usize,
    pub iterations: usize,
    pub failed: usize,
    /// Writes submitted, failed batches included.
    pub total_ops: usize,
    pub acknowledged: u64,
    #[serde(serialize_with = "as_micros", rename = "total_us")]
    pub total: Duration,
    #[serde(serialize_with = "as_micros", rename = "mean_us")]
    pub mean: Duration,
    #[serde(serialize_with = "as_micros", rename = "min_us")]
    pub min: Duration,
    #[serde(serialize_with = "as_micros", rename = "max_us")]
    pub max: Duration,
    #[serde(serialize_with = "as_micros", rename = "p50_us")]
    pub p50: Duration,
    #[serde(serialize_with = "as_micros", rename = "p99_us")]
    pub p99: Duration,
    #[serde(serialize_with = "as_micros", rename = "mean_per_op_us")]
    pub mean_per_op: Duration,
    pub ops_per_sec: f64,
}

impl RunSummary {
    pub fn from_run(run: &RunResults) -> Self {
        let samples: Vec<Duration> = run.results.iter().map(|r| r.elapsed).collect();
        let stats = LatencyStats::from_samples(&samples);
        let total_ops: usize = run.results.iter().map(|r| r.batch_size).sum();

        let (mean_per_op, ops_per_sec) = if total_ops == 0 || stats.total.is_zero() {
            (Duration::ZERO, 0.0)
        } else {
            (
                stats.total / total_ops as u32,
                total_ops as f64 / stats.total.as_secs_f64(),
            )
        };

        Self {
            batch_size: run.config.batch_size,
            iterations: run.results.len(),
            failed: run.failures(),
            total_ops,
            acknowledged: run.results.iter().map(|r| r.acknowledged()).sum(),
            total: stats.total,
            mean: stats.mean,
            min: stats.min,
            max: stats.max,
            p50: stats.p50,
            p99: stats.p99,
            mean_per_op,
            ops_per_sec,
        }
    }

    pub fn passed(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub backend: String,
    pub passed: bool,
    pub aborted: bool,
    pub runs: Vec<RunSummary>,
}

impl Report {
    pub fn from_results(results: &SuiteResults) -> Self {
        Self {
            backend: results.backend.clone(),
            passed: results.passed(),
            aborted: results.aborted,
            runs: results.runs.iter().map(RunSummary::from_run).collect(),
        }
    }

    pub fn write<W: Write>(&self, format: ReportFormat, out: &mut W) -> Result<(), BenchError> {
        match format {
            ReportFormat::Text => text::write_table(self, out)?,
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Process exit status for a finished run: 0 when every submission
/// succeeded, 1 when any failed or the suite aborted, 2 when the suite could
/// not run or report (configuration, connection or output errors).
pub fn exit_code(result: &Result<Report, BenchError>) -> u8 {
    match result {
        Ok(report) if report.passed => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::{BenchmarkResult, Outcome, run_configured};
    use crate::conf::{BackendConfig, BackendKind, Config, RunConfig};

    fn result(iteration: usize, batch_size: usize, ms: u64, failed: bool) -> BenchmarkResult {
        BenchmarkResult {
            iteration,
            batch_size,
            elapsed: Duration::from_millis(ms),
            outcome: if failed {
                Outcome::Failed("boom".to_string())
            } else {
                Outcome::Acknowledged(batch_size as u64)
            },
        }
    }

    fn suite() -> SuiteResults {
        SuiteResults {
            backend: "memory".to_string(),
            runs: vec![
                RunResults {
                    config: RunConfig::new(10, 2),
                    results: vec![result(1, 10, 10, false), result(2, 10, 30, true)],
                },
                RunResults {
                    config: RunConfig::new(20, 1),
                    results: vec![result(1, 20, 40, false)],
                },
            ],
            aborted: false,
        }
    }

    #[test]
    fn test_run_summary() {
        let report = Report::from_results(&suite());
        assert!(!report.passed);

        let first = &report.runs[0];
        assert_eq!(first.iterations, 2);
        assert_eq!(first.failed, 1);
        assert_eq!(first.total_ops, 20);
        assert_eq!(first.acknowledged, 10);
        assert_eq!(first.total, Duration::from_millis(40));
        assert_eq!(first.mean, Duration::from_millis(20));
        assert_eq!(first.mean_per_op, Duration::from_millis(2));
        assert!((first.ops_per_sec - 500.0).abs() < 1e-6);

        assert!(report.runs[1].passed());
    }

    #[test]
    fn test_json_report() {
        let report = Report::from_results(&suite());
        let mut out = Vec::new();
        report.write(ReportFormat::Json, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["backend"], "memory");
        assert_eq!(json["passed"], false);
        assert_eq!(json["runs"][0]["batch_size"], 10);
        assert_eq!(json["runs"][0]["failed"], 1);
        assert_eq!(json["runs"][0]["total_us"], 40_000.0);
        assert_eq!(json["runs"][1]["p99_us"], 40_000.0);
    }

    #[test]
    fn test_text_report() {
        let report = Report::from_results(&suite());
        let mut out = Vec::new();
        report.write(ReportFormat::Text, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("backend: memory"));
        assert!(text.contains("bulk_write/batch_10"));
        assert!(text.contains("bulk_write/batch_20"));
        assert!(text.trim_end().ends_with("FAIL (1 failed submission(s))"));
    }

    #[test]
    fn test_exit_code_passed() {
        let mut results = suite();
        results.runs[0].results[1] = result(2, 10, 30, false);
        assert_eq!(exit_code(&Ok(Report::from_results(&results))), 0);
    }

    #[test]
    fn test_exit_code_failed_submission() {
        assert_eq!(exit_code(&Ok(Report::from_results(&suite()))), 1);
    }

    #[test]
    fn test_exit_code_aborted() {
        let mut results = suite();
        results.runs[0].results[1] = result(2, 10, 30, false);
        results.aborted = true;
        assert_eq!(exit_code(&Ok(Report::from_results(&results))), 1);
    }

    #[test]
    fn test_exit_code_config_error() {
        let err = BenchError::ConfigParsingError("bad".to_string());
        assert_eq!(exit_code(&Err(err)), 2);
    }

    #[tokio::test]
    async fn test_exit_code_unreachable_backend() {
        let config = Config {
            backend: BackendConfig {
                kind: BackendKind::Redis,
                endpoint: "redis://127.0.0.1:1".to_string(),
                connect_timeout: Duration::from_millis(300),
                ..BackendConfig::default()
            },
            ..Config::default()
        };
        let result = run_configured(&config)
            .await
            .map(|results| Report::from_results(&results));

        assert!(matches!(result, Err(BenchError::ConnectionError(_))));
        assert_eq!(exit_code(&result), 2);
    }
}
