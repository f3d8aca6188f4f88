//! Logger setup for the resource container and its test harness.
//!
//! Wires the well-known logger to a console sink (stdout) and a rolling file
//! sink, each rendering lines through its own [`LinePattern`]. The process-wide
//! handle is created once behind a [`OnceLock`]; every caller of
//! [`get_instance`] receives the same, already-configured handle.

use std::fmt;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Level};
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt as sub_fmt, layer::SubscriberExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_LEVEL, LOGGER_NAME};
use crate::error::{RcsError, RcsResult};
use crate::pattern::LinePattern;

static INSTANCE: OnceLock<LoggerHandle> = OnceLock::new();

/// Get the shared harness logger, configuring it on first use.
///
/// Safe to call from any number of call sites and threads: configuration runs
/// exactly once and later callers receive the same handle. This never fails;
/// if the log file cannot be opened the handle logs to the console only and
/// reports the cause through [`LoggerHandle::file_sink_error`].
pub fn get_instance() -> &'static LoggerHandle {
    INSTANCE.get_or_init(configure_log)
}

/// Get the shared logger only if [`get_instance`] has already configured it.
pub fn try_get_instance() -> Option<&'static LoggerHandle> {
    INSTANCE.get()
}

/// Apply the fixed harness configuration and return a fresh handle.
///
/// Applies, in order: the debug threshold, the `oictest.log` file sink, the
/// console sink, then commits. Most callers want [`get_instance`], which runs
/// this once and caches the result.
pub fn configure_log() -> LoggerHandle {
    LogConfigurator::new(LoggingConfig::default()).configure_or_degrade()
}

/// Builds a [`LoggerHandle`] from a [`LoggingConfig`].
pub struct LogConfigurator {
    config: LoggingConfig,
    console_writer: Option<BoxMakeWriter>,
}

/// Failures collected while degrading instead of failing.
#[derive(Default)]
struct SetupErrors {
    level: Option<RcsError>,
    file_sink: Option<RcsError>,
    console_sink: Option<RcsError>,
}

struct FileSink {
    pattern: LinePattern,
    appender: RollingFileAppender,
    path: PathBuf,
}

impl LogConfigurator {
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            config,
            console_writer: None,
        }
    }

    /// Send console output somewhere other than stdout.
    pub fn with_console_writer<W>(mut self, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.console_writer = Some(BoxMakeWriter::new(writer));
        self
    }

    /// Build the handle, failing if any enabled sink cannot be set up.
    pub fn configure(self) -> RcsResult<LoggerHandle> {
        let level = self.root_level()?;
        let file = if self.config.use_file_sink {
            Some(self.file_sink()?)
        } else {
            None
        };
        let console = if self.config.use_console_sink {
            Some(LinePattern::compile(&self.config.logger_name, &self.config.console_pattern)?)
        } else {
            None
        };
        Ok(self.commit(level, file, console, SetupErrors::default()))
    }

    /// Build the handle, disabling any sink that cannot be set up.
    ///
    /// An unknown level falls back to debug. The fallback and any sink
    /// failures are recorded on the handle and announced on whichever sink
    /// survived.
    pub fn configure_or_degrade(self) -> LoggerHandle {
        let (level, level_error) = match self.root_level() {
            Ok(level) => (level, None),
            Err(e) => (default_level(), Some(e)),
        };

        let (file, file_error) = if self.config.use_file_sink {
            match self.file_sink() {
                Ok(sink) => (Some(sink), None),
                Err(e) => (None, Some(e)),
            }
        } else {
            (None, None)
        };

        let (console, console_error) = if self.config.use_console_sink {
            match LinePattern::compile(&self.config.logger_name, &self.config.console_pattern) {
                Ok(pattern) => (Some(pattern), None),
                Err(e) => (None, Some(e)),
            }
        } else {
            (None, None)
        };

        let errors = SetupErrors {
            level: level_error,
            file_sink: file_error,
            console_sink: console_error,
        };
        let handle = self.commit(level, file, console, errors);
        if let Some(e) = handle.level_error() {
            handle.warn(format_args!("root level fell back to {level}: {e}"));
        }
        if let Some(e) = handle.file_sink_error() {
            handle.warn(format_args!("file sink disabled: {e}"));
        }
        if let Some(e) = handle.console_sink_error() {
            handle.warn(format_args!("console sink disabled: {e}"));
        }
        handle
    }

    fn root_level(&self) -> RcsResult<LevelFilter> {
        self.config.level.trim().parse::<LevelFilter>().map_err(|_| {
            RcsError::new(format!(
                "configuration error: unknown log level '{}'",
                self.config.level
            ))
        })
    }

    fn file_sink(&self) -> RcsResult<FileSink> {
        let pattern = LinePattern::compile(&self.config.logger_name, &self.config.file_pattern)?;
        let appender = RollingFileAppender::builder()
            .rotation(self.config.rotation.into())
            .filename_prefix(self.config.file_name.clone())
            .build(&self.config.directory)
            .map_err(|e| {
                RcsError::new(format!(
                    "log file sink setup failed for {}: {e}",
                    self.config.effective_log_path().display()
                ))
            })?;
        Ok(FileSink {
            pattern,
            appender,
            path: self.config.effective_log_path(),
        })
    }

    fn commit(
        self,
        level: LevelFilter,
        file: Option<FileSink>,
        console: Option<LinePattern>,
        errors: SetupErrors,
    ) -> LoggerHandle {
        let env_filter = EnvFilter::new(level.to_string());
        let file_path = file.as_ref().map(|sink| sink.path.clone());
        let console_active = console.is_some();

        let file_layer = file.map(|sink| {
            sub_fmt::layer()
                .with_writer(sink.appender)
                .with_ansi(false)
                .event_format(sink.pattern)
        });

        let console_writer = self
            .console_writer
            .unwrap_or_else(|| BoxMakeWriter::new(std::io::stdout));
        let console_layer = console.map(|pattern| {
            sub_fmt::layer()
                .with_writer(console_writer)
                .with_ansi(false)
                .event_format(pattern)
        });

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(console_layer);
        let dispatch = Dispatch::new(subscriber);
        let global = tracing::dispatcher::set_global_default(dispatch.clone()).is_ok();

        let handle = LoggerHandle {
            name: self.config.logger_name,
            level,
            dispatch,
            file_path,
            console_active,
            level_error: errors.level,
            file_sink_error: errors.file_sink,
            console_sink_error: errors.console_sink,
            global,
        };

        let fallback = if handle.level_error.is_some() {
            format!(" (fallback from '{}')", self.config.level)
        } else {
            String::new()
        };
        let file = handle
            .file_path
            .as_ref()
            .map_or_else(|| "off".to_string(), |p| p.display().to_string());
        handle.in_scope(|| {
            tracing::debug!(
                target: LOGGER_NAME,
                "logging configured: level={level}{fallback}, file={file}, \
                 console={console_active}, global={global}",
            )
        });
        handle
    }
}

impl Default for LogConfigurator {
    fn default() -> Self {
        Self::new(LoggingConfig::default())
    }
}

/// A configured logger.
///
/// If this handle won the process-wide default subscriber slot, plain
/// `tracing` macros anywhere in the process reach its sinks. Otherwise log
/// through the handle's own methods or [`LoggerHandle::in_scope`].
#[derive(Debug)]
pub struct LoggerHandle {
    name: String,
    level: LevelFilter,
    dispatch: Dispatch,
    file_path: Option<PathBuf>,
    console_active: bool,
    level_error: Option<RcsError>,
    file_sink_error: Option<RcsError>,
    console_sink_error: Option<RcsError>,
    global: bool,
}

impl LoggerHandle {
    /// Logger name rendered by `%c`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root severity threshold.
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Path of the active log file, `None` when the file sink is off.
    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    pub fn file_sink_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn console_sink_active(&self) -> bool {
        self.console_active
    }

    /// Why the configured level was replaced by the debug fallback.
    pub fn level_error(&self) -> Option<&RcsError> {
        self.level_error.as_ref()
    }

    /// Why the file sink was disabled, if it was requested but failed.
    pub fn file_sink_error(&self) -> Option<&RcsError> {
        self.file_sink_error.as_ref()
    }

    /// Why the console sink was disabled, if it was requested but failed.
    pub fn console_sink_error(&self) -> Option<&RcsError> {
        self.console_sink_error.as_ref()
    }

    /// Whether this handle is the process-wide default subscriber.
    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the current subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    #[track_caller]
    pub fn trace(&self, message: impl fmt::Display) {
        self.emit(Level::TRACE, &message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(Level::DEBUG, &message);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(Level::INFO, &message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(Level::WARN, &message);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(Level::ERROR, &message);
    }

    #[track_caller]
    fn emit(&self, level: Level, message: &dyn fmt::Display) {
        let location = Location::caller();
        let caller = format!("{}:{}", location.file(), location.line());

        // Event levels are part of static callsite metadata, hence the ladder.
        self.in_scope(|| {
            if level == Level::ERROR {
                tracing::error!(target: LOGGER_NAME, caller = %caller, "{message}");
            } else if level == Level::WARN {
                tracing::warn!(target: LOGGER_NAME, caller = %caller, "{message}");
            } else if level == Level::INFO {
                tracing::info!(target: LOGGER_NAME, caller = %caller, "{message}");
            } else if level == Level::DEBUG {
                tracing::debug!(target: LOGGER_NAME, caller = %caller, "{message}");
            } else {
                tracing::trace!(target: LOGGER_NAME, caller = %caller, "{message}");
            }
        });
    }
}

/// Fall-back level used when the configured one cannot be parsed.
pub fn default_level() -> LevelFilter {
    DEFAULT_LEVEL.parse().unwrap_or(LevelFilter::DEBUG)
}
