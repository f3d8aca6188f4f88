//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use rcs_core::config::LoggingConfig;
use rcs_core::error::{PlatformError, RcsResult};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// Stand-in for the native bridge: zero is success, anything else fails
/// with that value as the reason code.
pub fn native_call(operation: &str, status: i32) -> Result<(), PlatformError> {
    if status == 0 {
        Ok(())
    } else {
        Err(PlatformError::new(format!("native {operation} failed"), status))
    }
}

/// Stand-in for the API layer, which only speaks the framework error type.
pub fn api_call(operation: &str, status: i32) -> RcsResult<()> {
    native_call(operation, status)?;
    Ok(())
}

/// Logging config writing into a fresh temporary directory.
/// Returns the config and the TempDir (must be held alive for the duration of the test).
pub fn create_test_logging_config() -> (LoggingConfig, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let config = LoggingConfig {
        directory: dir.path().display().to_string(),
        use_console_sink: false,
        ..LoggingConfig::default()
    };
    (config, dir)
}

/// Console writer that collects everything into a shared buffer.
#[derive(Clone, Default)]
pub struct CapturedConsole(Arc<Mutex<Vec<u8>>>);

impl CapturedConsole {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedConsole {
    type Writer = CapturedConsole;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
