//! Fixed names used by the test-harness logger.

/// Well-known name of the shared logger.
pub const LOGGER_NAME: &str = "IoTivityLogger";

/// Log file written by the file sink, relative to the log directory.
pub const LOG_FILE_NAME: &str = "oictest.log";

/// Root severity threshold applied by default.
pub const DEFAULT_LEVEL: &str = "debug";

/// Line pattern shared by the file and console sinks.
pub const DEFAULT_PATTERN: &str = "[%c] [%d{dd MMM yyyy} %d{HH:mm:ss.SSS}] %l [%-5p] - %m%n";

/// Date format used by `%d` when no explicit format is given.
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd HH:mm:ss.SSS";

/// Directory name under the platform config dir holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = "iotivity-rcs";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_covers_every_field() {
        for token in ["%c", "%d{", "%l", "%-5p", "%m", "%n"] {
            assert!(DEFAULT_PATTERN.contains(token), "missing {token}");
        }
    }
}
