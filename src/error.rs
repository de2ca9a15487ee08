//! Error taxonomy for the product API harness
//!
//! This module provides:
//! - `InvalidArgument` for generator calls outside their contract
//! - `AssertionFailure` for contract violations detected by validators
//! - `Transport` for network and timeout failures (never retried)
//! - Stable error categories for structured logging

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type used across the harness
pub type HarnessResult<T> = Result<T, HarnessError>;

// =============================================================================
// ERROR KINDS
// =============================================================================

/// Coarse classification of a [`HarnessError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// A generator was called with out-of-contract parameters
    InvalidArgument,
    /// A validator detected a contract violation in an observed value
    AssertionFailure,
    /// The request could not complete (connection, timeout, status policy)
    Transport,
    /// A request or response body could not be (de)serialized
    Serialization,
    /// Configuration could not be loaded or is inconsistent
    Config,
}

impl ErrorKind {
    /// Get the error category for logs
    pub fn category(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::AssertionFailure => "assertion_failure",
            ErrorKind::Transport => "transport_failure",
            ErrorKind::Serialization => "serialization_error",
            ErrorKind::Config => "config_error",
        }
    }

    /// Local failures are raised before any request is issued
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidArgument | ErrorKind::Serialization | ErrorKind::Config
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

// =============================================================================
// ASSERTION FAILURE
// =============================================================================

/// A validator's report of an expectation that did not hold.
///
/// Carries enough detail to read the failure without re-running the case:
/// which check fired, where in the value it looked, what it wanted and what
/// it saw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionFailure {
    /// Name of the check that failed (e.g. `pagination_structure`)
    pub check: &'static str,
    /// Field path or subject the check inspected
    pub context: String,
    /// Human-readable expectation
    pub expected: String,
    /// Human-readable observation
    pub actual: String,
}

impl AssertionFailure {
    pub fn new(
        check: &'static str,
        context: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            check,
            context: context.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.context, self.expected, self.actual
        )
    }
}

impl std::error::Error for AssertionFailure {}

// =============================================================================
// HARNESS ERROR
// =============================================================================

/// Main error type for harness operations
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Generator parameter outside its documented domain
    #[error("invalid argument '{parameter}': {reason}")]
    InvalidArgument { parameter: String, reason: String },

    /// Validator detected a contract violation
    #[error("assertion failed [{}]: {0}", .0.check)]
    AssertionFailure(#[from] AssertionFailure),

    /// Network, timeout or status-policy failure
    #[error("transport failure during {operation}: {message}")]
    Transport { operation: String, message: String },

    /// JSON body could not be encoded or decoded
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded or failed validation
    #[error("configuration error: {0}")]
    Config(String),
}

impl HarnessError {
    pub fn invalid_argument(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        HarnessError::InvalidArgument {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        HarnessError::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            HarnessError::AssertionFailure(_) => ErrorKind::AssertionFailure,
            HarnessError::Transport { .. } => ErrorKind::Transport,
            HarnessError::Serialization(_) => ErrorKind::Serialization,
            HarnessError::Config(_) => ErrorKind::Config,
        }
    }

    /// Borrow the assertion details when this is an `AssertionFailure`
    pub fn as_assertion(&self) -> Option<&AssertionFailure> {
        match self {
            HarnessError::AssertionFailure(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HarnessError {
    fn from(err: reqwest::Error) -> Self {
        let operation = if err.is_timeout() {
            "request (timeout)"
        } else if err.is_connect() {
            "connect"
        } else if err.is_decode() {
            "decode"
        } else {
            "request"
        };
        HarnessError::transport(operation, err.to_string())
    }
}
