//! Unified error types for the CSP license adapter.
//!
//! Every crate maps its failures into [`AppError`] so callers see a single
//! error type carrying a coarse [`ErrorKind`] and, where one exists, the
//! underlying cause.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Settings or cloud configuration could not be loaded.
    Configuration,
    /// The caller identity lookup failed or returned no account.
    Identity,
    /// No license exists for the queried product, or an unknown token was used.
    NotFound,
    /// A license is missing a field required by the requested operation.
    MalformedLicense,
    /// The remote service returned an error or could not be reached.
    ExternalService,
    /// A value reported by the remote service could not be parsed.
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Identity => write!(f, "IDENTITY"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::MalformedLicense => write!(f, "MALFORMED_LICENSE"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Parse => write!(f, "PARSE"),
        }
    }
}

/// The unified error used throughout the adapter.
///
/// The display form is `{KIND}: {message}`; the message alone is what gets
/// embedded when one error is folded into another.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an identity error.
    pub fn identity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Identity, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a malformed-license error.
    pub fn malformed_license(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedLicense, message)
    }

    /// Create an external service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
