//! Integration tests for configuration loading

use bulk_upload::prelude::*;
use std::io::Write;

#[test]
fn test_load_from_yaml_file() {
    let yaml = r#"
acquisition:
  max_size_bytes: 10485760
  allowed_extensions: [".csv"]
  progress_step: 5
  progress_cap: 80
  progress_interval_ms: 100
validation:
  max_rows: 200
"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let config = UploadConfig::from_yaml_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.acquisition.max_size_bytes, 10 * 1024 * 1024);
    assert_eq!(config.acquisition.progress_step, 5);
    assert_eq!(config.acquisition.progress_cap, 80);
    assert_eq!(config.validation.max_rows, Some(200));
}

#[test]
fn test_missing_file_is_config_error() {
    let err = UploadConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, UploadError::Config(_)));
}

#[test]
fn test_empty_yaml_gives_defaults() {
    let config = UploadConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, UploadConfig::default());
}

#[test]
fn test_malformed_yaml_is_config_error() {
    let err = UploadConfig::from_yaml_str("acquisition: [not, a, map]").unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_empty_extension_list_rejected() {
    let err = UploadConfig::from_yaml_str("acquisition:\n  allowed_extensions: []\n").unwrap_err();
    assert!(err.to_string().contains("allowed_extensions"));
}

#[tokio::test]
async fn test_configured_row_limit_reaches_preview() {
    let config = UploadConfig::from_yaml_str("validation:\n  max_rows: 1\n").unwrap();
    let orchestrator = UploadOrchestrator::new(
        config,
        std::sync::Arc::new(TracingNotifier),
        std::sync::Arc::new(PendingRoutePlanner),
    );
    let source = MemorySource::new(
        "orders.csv",
        "id,customerName,address,phoneNumber,items\nA1,Ann,1 St,555,x\nB2,Bob,2 St,556,y",
    );

    let preview = orchestrator.handle_file(&source, |_| {}).await.unwrap();
    assert_eq!(preview.failure.unwrap().code, "TOO_MANY_ROWS");
}
