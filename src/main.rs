use std::process::ExitCode;

use bulkbench::bench::run_configured;
use bulkbench::conf::Config;
use bulkbench::core::{BenchError, CliArgs, setup_logging};
use bulkbench::report::{Report, exit_code};
use clap::Parser;
use log::{error, info};

async fn run(args: &CliArgs) -> Result<Report, BenchError> {
    let config = Config::load(args)?;
    let results = run_configured(&config).await?;

    let report = Report::from_results(&results);
    report.write(config.report.format, &mut std::io::stdout().lock())?;
    Ok(report)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "bulkbench started");

    let result = run(&args).await;
    if let Err(e) = &result {
        error!("{e}");
    }
    ExitCode::from(exit_code(&result))
}
