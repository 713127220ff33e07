//! Shared error type across sieve crates.

use thiserror::Error;

/// Stable error codes for hosts that surface failures to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A pattern was rejected by its matcher syntax.
    InvalidPattern,
    /// A policy could not be constructed from the supplied strategy.
    Configuration,
    /// Config document failed to parse or validate.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Referenced filter does not exist.
    NotFound,
    /// Internal error (I/O and the like).
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and audit output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidPattern => "INVALID_PATTERN",
            ErrorCode::Configuration => "CONFIGURATION",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SieveError>;

/// Unified error type used by core and gate.
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("configuration: {0}")]
    Configuration(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SieveError {
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        SieveError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SieveError::InvalidPattern { .. } => ErrorCode::InvalidPattern,
            SieveError::Configuration(_) => ErrorCode::Configuration,
            SieveError::BadConfig(_) => ErrorCode::BadConfig,
            SieveError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            SieveError::UnknownFilter(_) => ErrorCode::NotFound,
            SieveError::Internal(_) => ErrorCode::Internal,
        }
    }
}
