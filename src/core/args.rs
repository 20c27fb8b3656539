use clap::Parser;
use log::kv::{ToValue, Value};

/// Times bulk writes against a document store across batch sizes.
#[derive(Parser, Debug, Default, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    /// TOML config file.
    #[arg(short, long)]
    pub config: Option<String>,
    /// Backend kind: mongodb, redis or memory.
    #[arg(short, long)]
    pub backend: Option<String>,
    /// Connection URI, e.g. mongodb://localhost:27017
    #[arg(short, long)]
    pub endpoint: Option<String>,
    /// Connection establishment timeout, e.g. "10s".
    #[arg(short, long)]
    pub timeout: Option<String>,
    /// Comma-separated batch sizes.
    #[arg(long, value_delimiter = ',')]
    pub batch_sizes: Option<Vec<usize>>,
    /// Write operations per configuration.
    #[arg(long)]
    pub total_ops: Option<usize>,
    /// Report format: text or json.
    #[arg(short, long)]
    pub format: Option<String>,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
