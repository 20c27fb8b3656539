use std::time::Duration;

use rstest::rstest;

use bulkbench::backend::connect;
use bulkbench::conf::{BackendConfig, BackendKind};
use bulkbench::core::BenchError;

#[rstest]
#[case(BackendKind::Mongodb, "mongodb://127.0.0.1:1")]
#[case(BackendKind::Redis, "redis://127.0.0.1:1")]
#[tokio::test]
async fn test_unreachable_backend_is_connection_error(
    #[case] kind: BackendKind,
    #[case] endpoint: &str,
) {
    let config = BackendConfig {
        kind,
        endpoint: endpoint.to_string(),
        connect_timeout: Duration::from_millis(300),
        ..BackendConfig::default()
    };
    let result = connect(&config).await;
    assert!(matches!(result, Err(BenchError::ConnectionError(_))));
}

#[tokio::test]
async fn test_malformed_endpoint_is_connection_error() {
    let config = BackendConfig {
        endpoint: "not a uri".to_string(),
        ..BackendConfig::default()
    };
    assert!(matches!(
        connect(&config).await,
        Err(BenchError::ConnectionError(_))
    ));
}
