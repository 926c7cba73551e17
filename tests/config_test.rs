//! Integration tests for configuration loading

use std::io::Write;

use trendcast::config::Config;

#[test]
fn test_default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.scheduler.refresh_interval_secs, 180);
    assert_eq!(config.scheduler.metrics_interval_secs, 60);
    assert_eq!(config.scheduler.activity_interval_secs, 45);
    assert_eq!(config.simulation.growth_jitter, 5.0);
    assert_eq!(config.simulation.searches_jitter, 25_000);
}

#[test]
fn test_load_full_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [server]
        bind_address = "0.0.0.0:9999"
        enable_cors = false
        enable_request_logging = false
        send_queue_capacity = 128

        [scheduler]
        refresh_interval_secs = 30
        metrics_interval_secs = 10
        activity_interval_secs = 5
        rng_seed = 7

        [simulation]
        growth_jitter = 2.5
        searches_jitter = 10000
        active_users_min = 100
        active_users_max = 500
        trending_threshold = 25.0

        [logging]
        level = "debug"
        format = "json"
        "#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.server.bind_address.port(), 9999);
    assert!(!config.server.enable_cors);
    assert_eq!(config.scheduler.rng_seed, Some(7));
    assert_eq!(config.simulation.trending_threshold, 25.0);
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_missing_sections_fall_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [logging]
        level = "trace"
        format = "text"
        "#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.logging.level, "trace");
    assert_eq!(config.server.send_queue_capacity, 256);
    assert_eq!(config.scheduler.refresh_interval_secs, 180);
}

#[test]
fn test_malformed_toml_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[server\nbind_address = nonsense").unwrap();

    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_reported() {
    let result = Config::from_file(std::path::Path::new("/nonexistent/trendcast.toml"));
    assert!(result.is_err());
}

#[test]
fn test_invalid_values_fail_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [scheduler]
        refresh_interval_secs = 0
        metrics_interval_secs = 60
        activity_interval_secs = 45
        "#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
}
