//! Integration tests for configuration resolution.
//!
//! Covers the source priority chain, construction from each source kind,
//! the argument round-trip guarantee, and role validity.

use std::env;
use std::fs;
use std::sync::Mutex;

use browser_grid::config::{
    ConfigError, ConfigProperty, ConfigSource, Configuration, FileSource, ServerType,
};

// Tests that touch BROWSER_GRID_* variables mutate process-global state.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn string_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn clear_recognized_env() {
    for property in ConfigProperty::ALL {
        env::remove_var(property.env_var());
    }
}

#[test]
fn resolves_port_and_timeout_from_arguments() {
    let config =
        Configuration::resolve(&string_args(&["-port", "8080", "-timeoutSeconds", "30"])).unwrap();

    assert_eq!(config.port(), 8080);
    assert_eq!(config.timeout_seconds(), 30);
    assert!(config.browser_file_names().is_empty());
    assert!(config.remote_machine_urls().is_empty());
    assert_eq!(config.description(), None);
    assert!(config.should_close_browsers_after_test_runs());
    assert!(config.should_log_status());
    assert!(!config.should_ignore_unresponsive_remote_machines());
}

#[test]
fn arguments_win_over_environment() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_recognized_env();
    env::set_var(ConfigProperty::Port.env_var(), "7000");

    let source = ConfigSource::resolve(&string_args(&["-port", "8080"])).unwrap();
    assert!(matches!(source, ConfigSource::Arguments(_)));
    let config = Configuration::from_source(&source).unwrap();
    assert_eq!(config.port(), 8080);

    clear_recognized_env();
}

#[test]
fn environment_configures_record_when_no_arguments() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_recognized_env();
    env::set_var(ConfigProperty::Port.env_var(), "9005");
    env::set_var(ConfigProperty::BrowserFileNames.env_var(), "firefox,chrome");

    let config = Configuration::resolve(&[]).unwrap();
    assert_eq!(config.port(), 9005);
    assert_eq!(config.browser_file_names(), ["firefox", "chrome"]);
    assert!(config.is_valid_for(ServerType::Server));

    clear_recognized_env();
}

#[test]
fn file_source_configures_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("browser-grid.toml");
    fs::write(
        &path,
        "port = 9006\n\
         browserFileNames = [\"firefox\"]\n\
         description = \"from file\"\n\
         timeoutSeconds = 120\n",
    )
    .unwrap();

    let source = ConfigSource::File(FileSource::open(&path).unwrap());
    let config = Configuration::from_source(&source).unwrap();

    assert_eq!(config.port(), 9006);
    assert_eq!(config.browser_file_names(), ["firefox"]);
    assert_eq!(config.description(), Some("from file"));
    assert_eq!(config.timeout_seconds(), 120);
}

#[test]
fn resolution_fails_fatally_without_any_source() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_recognized_env();

    let err = Configuration::resolve(&[]).unwrap_err();
    assert!(matches!(err, ConfigError::NoSource));

    clear_recognized_env();
}

#[test]
fn arguments_round_trip_reproduces_record() {
    let config = Configuration::resolve(&string_args(&[
        "-browserFileNames",
        "firefox,chrome,safari",
        "-closeBrowsersAfterTestRuns",
        "false",
        "-description",
        "nightly run",
        "-ignoreUnresponsiveRemoteMachines",
        "true",
        "-logsDirectory",
        "/var/log/grid",
        "-shouldLogStatus",
        "false",
        "-port",
        "9001",
        "-remoteMachineURLs",
        "http://runner1:8081/,http://runner2:8082/",
        "-resourceBase",
        "/srv/tests",
        "-timeoutSeconds",
        "300",
        "-testURL",
        "http://grid/suite.html",
    ]))
    .unwrap();

    let rebuilt = Configuration::resolve(&config.as_arguments()).unwrap();
    assert_eq!(config, rebuilt);
}

#[test]
fn defaults_round_trip_through_arguments() {
    // Absent optionals render as empty strings, which must parse back to
    // absent, not to empty values.
    let config = Configuration::resolve(&string_args(&["-port", "8080"])).unwrap();
    let rebuilt = Configuration::resolve(&config.as_arguments()).unwrap();
    assert_eq!(config, rebuilt);
    assert_eq!(rebuilt.description(), None);
    assert_eq!(rebuilt.test_url(), None);
    assert!(rebuilt.browser_file_names().is_empty());
}

#[test]
fn validity_tracks_required_properties_per_role() {
    let server_only = Configuration::resolve(&string_args(&["-browserFileNames", "firefox"]))
        .unwrap();
    assert!(server_only.is_valid_for(ServerType::Server));
    assert!(!server_only.is_valid_for(ServerType::Farm));

    let farm_only =
        Configuration::resolve(&string_args(&["-remoteMachineURLs", "http://runner1:8081/"]))
            .unwrap();
    assert!(!farm_only.is_valid_for(ServerType::Server));
    assert!(farm_only.is_valid_for(ServerType::Farm));
}

#[test]
fn malformed_property_value_aborts_construction() {
    let err = Configuration::resolve(&string_args(&["-timeoutSeconds", "soon"])).unwrap_err();
    match err {
        ConfigError::InvalidValue { property, value, .. } => {
            assert_eq!(property, "timeoutSeconds");
            assert_eq!(value, "soon");
        }
        other => panic!("unexpected error: {}", other),
    }
}
