//! Error types for the Triggerio analytics dashboard

use std::{error::Error as StdError, fmt};

/// Main error type for the Triggerio analytics dashboard
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// No valid session exists; the caller must send the user to the auth service
    AuthMissing {
        /// External authentication URL to redirect to
        redirect_to: String,
    },

    /// The dashboard request failed (network, HTTP status or body parsing)
    FetchFailed {
        /// HTTP status code, when the backend answered at all
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a [`Error::FetchFailed`] without an HTTP status
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::AuthMissing { redirect_to } => {
                write!(f, "No valid session, redirecting to {redirect_to}")
            }
            Self::FetchFailed {
                status: Some(status),
                message,
            } => write!(f, "Dashboard fetch failed ({status}): {message}"),
            Self::FetchFailed {
                status: None,
                message,
            } => write!(f, "Dashboard fetch failed: {message}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

// From implementations for automatic conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::uninlined_format_args,
    clippy::match_same_arms
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = Error::from(io_error);

        match app_error {
            Error::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }

        assert!(format!("{}", app_error).contains("I/O error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_auth_missing_display() {
        let error = Error::AuthMissing {
            redirect_to: "https://auth.example.com/login".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "No valid session, redirecting to https://auth.example.com/login"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_fetch_failed_with_status() {
        let error = Error::FetchFailed {
            status: Some(401),
            message: "token expired".to_string(),
        };

        assert_eq!(error.to_string(), "Dashboard fetch failed (401): token expired");
    }

    #[test]
    fn test_fetch_failed_without_status() {
        let error = Error::fetch("connection refused");

        assert_eq!(error.to_string(), "Dashboard fetch failed: connection refused");
        match error {
            Error::FetchFailed { status: None, .. } => {}
            _ => panic!("Expected FetchFailed without status"),
        }
    }

    #[test]
    fn test_validation_error() {
        let error = Error::Validation {
            field: "auth.storage_key".to_string(),
            message: "must not be empty".to_string(),
        };

        assert_eq!(
            format!("{}", error),
            "Validation error: auth.storage_key - must not be empty"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>(r#"{"invalid": json}"#)
            .unwrap_err();
        let app_error = Error::from(json_error);

        assert!(app_error.to_string().starts_with("Serialization error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_other_error() {
        let error = Error::Other("Unexpected error occurred".to_string());
        assert_eq!(format!("{}", error), "Unexpected error occurred");
    }
}
