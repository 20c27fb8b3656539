use crate::{
    conf::{BackendConfig, ReportConfig, SuiteConfig},
    core::{
        BenchError::{self, ConfigParsingError},
        CliArgs,
    },
};
use config::builder::DefaultState;
use config::{Config as CConfig, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "BULKBENCH";

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub suite: SuiteConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, BenchError> {
        let config = CConfig::builder()
            .add_source(File::from_str(toml_str, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        return Ok(config);
    }

    /// Layer the optional TOML file, `BULKBENCH_*` environment variables and
    /// CLI flags, later sources winning.
    pub fn load(args: &CliArgs) -> Result<Config, BenchError> {
        Self::load_with_env(args, environment())
    }

    fn load_with_env(args: &CliArgs, env: Environment) -> Result<Config, BenchError> {
        let mut builder = CConfig::builder();
        if let Some(path) = &args.config {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }
        builder = builder.add_source(env);
        let config = with_cli_overrides(builder, args)?
            .build()?
            .try_deserialize::<Config>()?;
        Ok(config)
    }
}

/// `BULKBENCH_SUITE__TOTAL_OPS=100` maps to `suite.total_ops`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("suite.batch_sizes")
        .try_parsing(true)
}

fn with_cli_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    args: &CliArgs,
) -> Result<ConfigBuilder<DefaultState>, BenchError> {
    if let Some(kind) = &args.backend {
        builder = builder.set_override("backend.kind", kind.as_str())?;
    }
    if let Some(endpoint) = &args.endpoint {
        builder = builder.set_override("backend.endpoint", endpoint.as_str())?;
    }
    if let Some(timeout) = &args.timeout {
        builder = builder.set_override("backend.connect_timeout", timeout.as_str())?;
    }
    if let Some(format) = &args.format {
        builder = builder.set_override("report.format", format.as_str())?;
    }
    // Sizing flags on the command line replace any explicit runs from files.
    if args.batch_sizes.is_some() || args.total_ops.is_some() {
        builder = builder.set_override("suite.runs", Vec::<config::Value>::new())?;
    }
    if let Some(sizes) = &args.batch_sizes {
        let sizes: Vec<i64> = sizes.iter().map(|&s| s as i64).collect();
        builder = builder.set_override("suite.batch_sizes", sizes)?;
    }
    if let Some(total_ops) = args.total_ops {
        builder = builder.set_override("suite.total_ops", total_ops as i64)?;
    }
    Ok(builder)
}
