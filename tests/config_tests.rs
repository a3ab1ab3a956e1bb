use grc_desk::config::Config;
use grc_desk::modals::{ControllerOptions, DEFAULT_MAX_EVENTS};
use std::time::Duration;
use tempfile::TempDir;

use test_utils::write_temp_file;

#[test]
fn test_defaults_when_sections_missing() {
    let config = Config::parse("").expect("empty config is valid");

    assert_eq!(config, Config::default());
    assert!(config.submit.timeout().is_none());
    assert_eq!(config.history.max_events, DEFAULT_MAX_EVENTS);
    assert!(!config.logging.verbose);
}

#[test]
fn test_load_from_file() {
    let (_dir, path) = write_temp_file(
        "config.toml",
        r#"
[submit]
timeout_ms = 1500

[history]
max_events = 50

[logging]
verbose = true
log_file = "desk.log"
"#,
    );

    let config = Config::load_from(&path).expect("valid config");

    assert_eq!(config.submit.timeout(), Some(Duration::from_millis(1500)));
    assert_eq!(config.history.max_events, 50);
    assert!(config.logging.verbose);
    assert_eq!(config.logging.log_file.as_deref(), Some("desk.log"));

    let options = ControllerOptions::from(&config);
    assert_eq!(options.submit_timeout, Some(Duration::from_millis(1500)));
    assert_eq!(options.max_history, 50);
}

#[test]
fn test_zero_timeout_means_unbounded() {
    let config = Config::parse("[submit]\ntimeout_ms = 0\n").expect("valid config");
    assert!(config.submit.timeout().is_none());
}

#[test]
fn test_zero_history_rejected() {
    let err = Config::parse("[history]\nmax_events = 0\n").unwrap_err();
    assert!(err.to_string().contains("max_events"));
}

#[test]
fn test_malformed_file_reports_path() {
    let (_dir, path) = write_temp_file("config.toml", "[submit\ntimeout_ms = ");

    let err = Config::load_from(&path).unwrap_err();

    assert!(format!("{err:#}").contains("config.toml"));
}

#[test]
fn test_save_and_reload() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("nested").join("config.toml");
    let mut config = Config::default();
    config.apply_overrides(Some(250), Some("session.log".to_string()));

    config.save_to(&path).expect("config saved");
    let reloaded = Config::load_from(&path).expect("config reloads");

    assert_eq!(reloaded, config);
    assert_eq!(reloaded.submit.timeout_ms, Some(250));
}
