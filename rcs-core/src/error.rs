//! Error types for the resource container service.
//!
//! Failures fall into two kinds. A generic framework failure carries only a
//! message. A platform failure is raised where a base-layer (native) operation
//! fails and additionally carries the reason code that layer reported.
//! `RcsError` covers both kinds, so code that only knows about framework errors
//! handles platform errors too, and specialized handlers can narrow back to
//! [`PlatformError`] to recover the code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience type alias for Results using RcsError.
pub type RcsResult<T> = Result<T, RcsError>;

/// Anything that carries a human-readable failure description.
pub trait HasMessage {
    /// The message, exactly as it was supplied at construction.
    fn message(&self) -> &str;
}

/// A failure that also carries a reason code from the native layer.
pub trait HasReasonCode: HasMessage {
    /// The reason code, exactly as it was supplied at construction.
    fn reason_code(&self) -> i32;
}

/// Thrown when an operation that has a base-layer dependency fails.
///
/// The reason code is opaque: it is defined by whatever native layer raised it
/// and is never validated or interpreted here.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[error("{message} (reason code {reason_code})")]
pub struct PlatformError {
    message: String,
    reason_code: i32,
}

impl PlatformError {
    /// Create a platform error from a native failure.
    pub fn new(message: impl Into<String>, reason_code: i32) -> Self {
        Self {
            message: message.into(),
            reason_code,
        }
    }

    /// Get the message supplied by the native layer.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the reason code supplied by the native layer.
    pub fn reason_code(&self) -> i32 {
        self.reason_code
    }
}

impl HasMessage for PlatformError {
    fn message(&self) -> &str {
        &self.message
    }
}

impl HasReasonCode for PlatformError {
    fn reason_code(&self) -> i32 {
        self.reason_code
    }
}

/// Framework error covering every failure surfaced by the service API.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RcsError {
    /// A failure with no further structured cause.
    #[error("{message}")]
    Generic {
        /// Human-readable description.
        message: String,
    },

    /// A failure reported by the native layer, with its reason code.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl RcsError {
    /// Create a generic framework error.
    pub fn new(message: impl Into<String>) -> Self {
        RcsError::Generic {
            message: message.into(),
        }
    }

    /// Create a platform error already widened to the framework type.
    pub fn platform(message: impl Into<String>, reason_code: i32) -> Self {
        RcsError::Platform(PlatformError::new(message, reason_code))
    }

    /// Get the stored message for either kind.
    pub fn message(&self) -> &str {
        match self {
            RcsError::Generic { message } => message,
            RcsError::Platform(e) => e.message(),
        }
    }

    /// Get the reason code if this is a platform failure.
    pub fn reason_code(&self) -> Option<i32> {
        self.as_platform().map(PlatformError::reason_code)
    }

    /// Whether this error originated in the native layer.
    pub fn is_platform(&self) -> bool {
        matches!(self, RcsError::Platform(_))
    }

    /// Borrow the platform error, if this is one.
    pub fn as_platform(&self) -> Option<&PlatformError> {
        match self {
            RcsError::Platform(e) => Some(e),
            RcsError::Generic { .. } => None,
        }
    }

    /// Narrow to the platform error, handing the original back on mismatch.
    pub fn into_platform(self) -> Result<PlatformError, RcsError> {
        match self {
            RcsError::Platform(e) => Ok(e),
            other => Err(other),
        }
    }
}

impl HasMessage for RcsError {
    fn message(&self) -> &str {
        RcsError::message(self)
    }
}

impl TryFrom<RcsError> for PlatformError {
    type Error = RcsError;

    fn try_from(err: RcsError) -> Result<Self, Self::Error> {
        err.into_platform()
    }
}

impl From<std::io::Error> for RcsError {
    fn from(e: std::io::Error) -> Self {
        RcsError::new(format!("io error: {e}"))
    }
}

impl From<toml::de::Error> for RcsError {
    fn from(e: toml::de::Error) -> Self {
        RcsError::new(format!("configuration error: {e}"))
    }
}

impl From<toml::ser::Error> for RcsError {
    fn from(e: toml::ser::Error) -> Self {
        RcsError::new(format!("configuration error: {e}"))
    }
}
