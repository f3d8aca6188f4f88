//! Integration test for the shared harness logger.
//!
//! The instance and the global subscriber are process-wide, so this binary
//! holds a single test: two call sites, one configuration, one log file with
//! every line written exactly once.

use std::fs;
use std::thread;

use rcs_core::logging::{get_instance, try_get_instance, LoggerHandle};
use tempfile::TempDir;
use tracing::level_filters::LevelFilter;

#[test]
fn shared_instance_is_configured_once() {
    let dir = TempDir::new().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    assert!(try_get_instance().is_none());

    let from_thread: &'static LoggerHandle = thread::spawn(get_instance).join().unwrap();
    let from_main = get_instance();
    assert!(std::ptr::eq(from_thread, from_main));

    let logger = from_main;
    assert_eq!(logger.name(), "IoTivityLogger");
    assert_eq!(logger.level(), LevelFilter::DEBUG);
    assert!(logger.file_sink_active());
    assert!(logger.console_sink_active());
    assert!(logger.file_sink_error().is_none());
    assert!(logger.is_global());

    logger.debug("scenario line from handle");
    tracing::info!("scenario line from macro");
    tracing::trace!("below threshold");

    let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1, "exactly one log file expected");

    let contents = fs::read_to_string(dir.path().join("oictest.log")).unwrap();
    let handle_lines: Vec<&str> = contents
        .lines()
        .filter(|l| l.contains("scenario line from handle"))
        .collect();
    assert_eq!(handle_lines.len(), 1, "{contents}");

    let line = handle_lines[0];
    assert!(line.starts_with("[IoTivityLogger] ["), "{line}");
    assert!(line.contains("test_instance.rs:"), "{line}");
    assert!(line.ends_with("[DEBUG] - scenario line from handle"), "{line}");

    assert!(contents.contains("[INFO ] - scenario line from macro"), "{contents}");
    assert!(!contents.contains("below threshold"));
}
