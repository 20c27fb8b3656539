use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BenchError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("Connection error: {0}")]
    ConnectionError(String),
    #[error("Submission error: {0}")]
    SubmissionError(String),
    #[error("Report error: {0}")]
    ReportError(String),
}

impl From<std::io::Error> for BenchError {
    fn from(err: std::io::Error) -> Self {
        BenchError::ReportError(err.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::ReportError(err.to_string())
    }
}

impl From<config::ConfigError> for BenchError {
    fn from(err: config::ConfigError) -> Self {
        BenchError::ConfigParsingError(err.to_string())
    }
}

/// Driver errors surface as submission failures; connect paths remap them
/// to `ConnectionError` explicitly.
impl From<mongodb::error::Error> for BenchError {
    fn from(err: mongodb::error::Error) -> Self {
        BenchError::SubmissionError(err.to_string())
    }
}

impl From<redis::RedisError> for BenchError {
    fn from(err: redis::RedisError) -> Self {
        BenchError::SubmissionError(err.to_string())
    }
}

impl BenchError {
    pub fn into_connection_error(self) -> Self {
        match self {
            BenchError::SubmissionError(msg) => BenchError::ConnectionError(msg),
            other => other,
        }
    }
}
