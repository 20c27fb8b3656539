//! Timing harness: generate a batch, time its submission, record the result.

mod result;
mod runner;
mod session;

pub use result::{BenchmarkResult, Outcome, RunResults, SuiteResults};
pub use runner::Runner;
pub use session::{run_configured, run_session};
