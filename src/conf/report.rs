use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "ReportConfig::default_format")]
    pub format: ReportFormat,
}

impl ReportConfig {
    fn default_format() -> ReportFormat {
        ReportFormat::Text
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: Self::default_format(),
        }
    }
}
