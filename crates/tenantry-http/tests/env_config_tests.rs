//! Integration tests for environment-based configuration

use serial_test::serial;
use std::{env, path::PathBuf, time::Duration};
use tenantry_http::runtime::{ConfigError, ServerConfigBuilder};

const ALL_VARS: &[&str] = &[
    "TENANTRY_BIND_ADDR",
    "TENANTRY_TASKS_FILE",
    "TENANTRY_BLOCKED_TENANTS",
    "TENANTRY_REQUEST_TIMEOUT_SECS",
    "TENANTRY_MAX_BODY_SIZE",
    "TENANTRY_ENABLE_CORS",
    "TENANTRY_LOCK_TIMEOUT_MS",
    "TENANTRY_NOTIFY_BASE_URL",
    "TENANTRY_NOTIFY_PATH",
    "TENANTRY_NOTIFY_USER",
    "TENANTRY_NOTIFY_PASSWORD",
    "TENANTRY_NOTIFY_CABINET_ID",
    "TENANTRY_NOTIFY_TIMEOUT_SECS",
];

/// Helper to set environment variable for test
fn set_env(key: &str, value: &str) {
    unsafe {
        env::set_var(key, value);
    }
}

fn clear_all_tenantry_env_vars() {
    for key in ALL_VARS {
        unsafe {
            env::remove_var(key);
        }
    }
}

#[test]
#[serial]
fn test_env_config_default_when_no_vars_set() {
    clear_all_tenantry_env_vars();

    let config = ServerConfigBuilder::from_env()
        .expect("should load defaults when no env vars set")
        .build()
        .expect("should build valid config");

    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(config.tasks_file, PathBuf::from("data/tasks.json"));
    assert_eq!(config.request_timeout_secs, 30);
    assert!(config.blocked_tenants.is_empty());
    assert!(config.notifier.is_none());
}

#[test]
#[serial]
fn test_env_config_server_values() {
    clear_all_tenantry_env_vars();
    set_env("TENANTRY_BIND_ADDR", "0.0.0.0:9090");
    set_env("TENANTRY_TASKS_FILE", "/var/lib/tenantry/tasks.json");
    set_env("TENANTRY_BLOCKED_TENANTS", "NotAllowed, evil ,,");
    set_env("TENANTRY_ENABLE_CORS", "yes");
    set_env("TENANTRY_LOCK_TIMEOUT_MS", "250");

    let config = ServerConfigBuilder::from_env()
        .expect("should load config")
        .build()
        .expect("should build valid config");

    assert_eq!(config.bind_addr.port(), 9090);
    assert_eq!(
        config.tasks_file,
        PathBuf::from("/var/lib/tenantry/tasks.json")
    );
    assert_eq!(config.blocked_tenants, vec!["NotAllowed", "evil"]);
    assert!(config.enable_cors);
    assert_eq!(config.lock_timeout, Some(Duration::from_millis(250)));

    clear_all_tenantry_env_vars();
}

#[test]
#[serial]
fn test_env_config_notifier() {
    clear_all_tenantry_env_vars();
    set_env("TENANTRY_NOTIFY_BASE_URL", "https://docs.example.com");
    set_env("TENANTRY_NOTIFY_USER", "svc");
    set_env("TENANTRY_NOTIFY_PASSWORD", "hunter2");
    set_env("TENANTRY_NOTIFY_CABINET_ID", "cab-1");
    set_env("TENANTRY_NOTIFY_TIMEOUT_SECS", "3");

    let config = ServerConfigBuilder::from_env()
        .expect("should load config")
        .build()
        .expect("should build valid config");

    let notifier = config.notifier.expect("notifier should be configured");
    assert_eq!(notifier.base_url, "https://docs.example.com");
    assert_eq!(notifier.path, "/api2/Docuware/add-record");
    assert_eq!(notifier.user, "svc");
    assert_eq!(notifier.cabinet_id, "cab-1");
    assert_eq!(notifier.timeout, Duration::from_secs(3));
    assert!(!format!("{notifier:?}").contains("hunter2"));

    clear_all_tenantry_env_vars();
}

#[test]
#[serial]
fn test_env_config_invalid_number() {
    clear_all_tenantry_env_vars();
    set_env("TENANTRY_REQUEST_TIMEOUT_SECS", "soon");

    let result = ServerConfigBuilder::from_env();
    match result {
        Err(ConfigError::InvalidEnvVar { key, .. }) => {
            assert_eq!(key, "TENANTRY_REQUEST_TIMEOUT_SECS");
        }
        other => panic!("expected InvalidEnvVar, got {other:?}"),
    }

    clear_all_tenantry_env_vars();
}

#[test]
#[serial]
fn test_env_config_invalid_bool() {
    clear_all_tenantry_env_vars();
    set_env("TENANTRY_ENABLE_CORS", "maybe");

    assert!(matches!(
        ServerConfigBuilder::from_env(),
        Err(ConfigError::InvalidEnvVar { .. })
    ));

    clear_all_tenantry_env_vars();
}

#[test]
#[serial]
fn test_env_config_out_of_range_fails_validation() {
    clear_all_tenantry_env_vars();
    set_env("TENANTRY_MAX_BODY_SIZE", "0");

    let result = ServerConfigBuilder::from_env()
        .expect("value parses")
        .build();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));

    clear_all_tenantry_env_vars();
}
