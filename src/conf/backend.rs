use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Mongodb,
    Redis,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Mongodb => "mongodb",
            BackendKind::Redis => "redis",
            BackendKind::Memory => "memory",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    #[serde(default = "BackendConfig::default_kind")]
    pub kind: BackendKind,
    #[serde(default = "BackendConfig::default_endpoint")]
    pub endpoint: String,
    #[serde(
        with = "humantime_serde",
        default = "BackendConfig::default_connect_timeout"
    )]
    pub connect_timeout: Duration,
    #[serde(default = "BackendConfig::default_database")]
    pub database: String,
    #[serde(default = "BackendConfig::default_collection")]
    pub collection: String,
}

impl BackendConfig {
    fn default_kind() -> BackendKind {
        BackendKind::Mongodb
    }

    fn default_endpoint() -> String {
        String::from("mongodb://localhost:27017")
    }

    fn default_connect_timeout() -> Duration {
        Duration::from_secs(10)
    }

    fn default_database() -> String {
        String::from("foo")
    }

    fn default_collection() -> String {
        String::from("bar")
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: Self::default_kind(),
            endpoint: Self::default_endpoint(),
            connect_timeout: Self::default_connect_timeout(),
            database: Self::default_database(),
            collection: Self::default_collection(),
        }
    }
}
