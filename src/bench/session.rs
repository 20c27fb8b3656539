use std::future::Future;

use log::warn;

use crate::backend::{self, BulkBackend};
use crate::conf::{Config, RunConfig};
use crate::core::BenchError;
use crate::workload::BatchGenerator;

use super::{Runner, SuiteResults};

/// Connect, run the whole plan and close the backend.
///
/// A failed connection returns before anything is generated or submitted.
/// Once connected the backend is closed whether or not submissions failed.
pub async fn run_session<B, F, G>(
    connecting: F,
    runner: &Runner<G>,
    plan: &[RunConfig],
) -> Result<SuiteResults, BenchError>
where
    B: BulkBackend,
    F: Future<Output = Result<B, BenchError>>,
    G: BatchGenerator,
{
    let mut backend = connecting.await?;
    let results = runner.run_suite(&backend, plan).await;
    if let Err(e) = backend.close().await {
        warn!("failed to close {} backend: {}", backend.name(), e);
    }
    Ok(results)
}

/// Resolve the plan from `config` and run it against the configured backend.
pub async fn run_configured(config: &Config) -> Result<SuiteResults, BenchError> {
    let plan = config.suite.plan()?;
    let runner = Runner::from_config(&config.suite);
    run_session(backend::connect(&config.backend), &runner, &plan).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::{BackendConfig, BackendKind, SuiteConfig};

    #[tokio::test]
    async fn test_run_configured_memory() {
        let config = Config {
            backend: BackendConfig {
                kind: BackendKind::Memory,
                ..BackendConfig::default()
            },
            suite: SuiteConfig {
                total_ops: 100,
                batch_sizes: vec![1, 10, 100],
                ..SuiteConfig::default()
            },
            ..Config::default()
        };

        let results = run_configured(&config).await.unwrap();

        assert!(results.passed());
        let counts: Vec<(usize, usize)> = results
            .runs
            .iter()
            .map(|r| (r.config.batch_size, r.results.len()))
            .collect();
        assert_eq!(counts, vec![(1, 100), (10, 10), (100, 1)]);
    }

    #[tokio::test]
    async fn test_invalid_plan_fails_before_connecting() {
        let config = Config {
            suite: SuiteConfig {
                batch_sizes: vec![7],
                ..SuiteConfig::default()
            },
            ..Config::default()
        };
        assert!(matches!(
            run_configured(&config).await,
            Err(BenchError::ConfigParsingError(_))
        ));
    }
}
