mod backend;
mod config;
mod report;
mod suite;

pub use backend::{BackendConfig, BackendKind};
pub use config::Config;
pub use report::{ReportConfig, ReportFormat};
pub use suite::{RunConfig, SuiteConfig};
