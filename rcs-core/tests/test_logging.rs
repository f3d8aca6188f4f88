//! Integration tests for the harness logger.
//!
//! Covers file output format, disabled sinks, and the console-only fallback
//! when the log file cannot be created. The shared instance has its own test
//! binary in `test_instance.rs`.

mod common;

use std::fs;

use rcs_core::logging::LogConfigurator;
use tempfile::TempDir;

#[test]
fn file_sink_writes_pattern_lines() {
    let (mut config, dir) = common::create_test_logging_config();
    config.file_pattern = "%p|%c|%m%n".to_string();

    let logger = LogConfigurator::new(config).configure().unwrap();
    assert_eq!(logger.file_path(), Some(&dir.path().join("oictest.log")));

    logger.warn(format_args!("resource {} lost", "/a/light"));
    let contents = fs::read_to_string(dir.path().join("oictest.log")).unwrap();
    assert!(contents.lines().any(|l| l == "WARN|IoTivityLogger|resource /a/light lost"), "{contents}");
}

#[test]
fn unwritable_log_directory_fails_configure() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let config = rcs_core::LoggingConfig {
        directory: blocker.display().to_string(),
        use_console_sink: false,
        ..Default::default()
    };

    let err = LogConfigurator::new(config.clone()).configure().unwrap_err();
    assert!(!err.is_platform());
    assert!(err.message().contains("log file sink setup failed"), "{err}");

    let logger = LogConfigurator::new(config).configure_or_degrade();
    assert!(!logger.file_sink_active());
    assert!(logger.file_sink_error().is_some());
    assert!(logger.file_path().is_none());
}

#[test]
fn unwritable_log_directory_keeps_console_and_warns() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let console = common::CapturedConsole::default();
    let logger = LogConfigurator::new(rcs_core::LoggingConfig {
        directory: blocker.display().to_string(),
        ..Default::default()
    })
    .with_console_writer(console.clone())
    .configure_or_degrade();

    assert!(!logger.file_sink_active());
    assert!(logger.console_sink_active());
    assert!(logger.file_sink_error().is_some());

    let out = console.contents();
    assert!(out.contains("[WARN ] - file sink disabled: log file sink setup failed"), "{out}");

    logger.info("still on the console");
    assert!(console.contents().contains("[INFO ] - still on the console"));
}

#[test]
fn configurator_accepts_loaded_config_file() {
    let (config, dir) = common::create_test_logging_config();
    let path = dir.path().join("config.toml");
    let mut saved = rcs_core::RcsConfig { logging: config };
    saved.logging.file_pattern = "%p %m%n".to_string();
    saved.save_to_file(&path).unwrap();

    let loaded = rcs_core::RcsConfig::load_from_file(&path).unwrap();
    let logger = LogConfigurator::new(loaded.logging).configure().unwrap();
    logger.info("from file config");

    let contents = fs::read_to_string(dir.path().join("oictest.log")).unwrap();
    assert!(contents.lines().any(|l| l == "INFO from file config"), "{contents}");
}

#[test]
fn sinks_can_be_disabled() {
    let (mut config, dir) = common::create_test_logging_config();
    config.use_file_sink = false;

    let logger = LogConfigurator::new(config).configure().unwrap();
    assert!(!logger.file_sink_active());
    assert!(!logger.console_sink_active());
    logger.info("nowhere");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
