//! Resource container service core - error taxonomy and harness logging.
//!
//! This crate provides the shared foundation used by the resource container
//! API and its test harness:
//! - `RcsError`, the framework error, and `PlatformError`, which carries the
//!   reason code reported by the native layer
//! - The well-known harness logger with console and rolling file sinks
//! - log4j-style line patterns for those sinks
//! - TOML-backed logging configuration

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pattern;

// Re-export commonly used items at the crate root
pub use config::{LoggingConfig, RcsConfig};
pub use error::{HasMessage, HasReasonCode, PlatformError, RcsError, RcsResult};
pub use logging::{get_instance, LogConfigurator, LoggerHandle};
pub use pattern::LinePattern;
