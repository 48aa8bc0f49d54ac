//! # Client Error Types
//!
//! Error types for the data access layer.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Api            │  │  Decode                 │ │
//! │  │  InvalidUrl     │  │  Http           │  │                         │ │
//! │  │  ConfigLoad     │  │  Snapshot       │  │                         │ │
//! │  │  Failed         │  │  StaticModeWrite│  │                         │ │
//! │  │                 │  │  Rejected       │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation Policy
//! Every transport-level error surfaces to the immediate caller unchanged;
//! nothing is retried automatically (retry is a presentation decision) and
//! nothing here is fatal to the process. Coercion failures on caller input
//! are NOT errors: they are absorbed into empty/no-op results at the
//! resource-client layer.

use thiserror::Error;

/// Result type alias for data access operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering all data access failures.
///
/// ## Design Principles
/// - Each variant includes enough context for debugging
/// - Errors are categorized for different handling strategies
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid backend base URL.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The backend answered with a failing status code.
    ///
    /// `message` is the decoded body's `message` field when the body was
    /// structured and carried one, otherwise a generic description.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// The decoded response body, if there was one.
        payload: Option<serde_json::Value>,
    },

    /// A write was attempted against the read-only static backend.
    ///
    /// Raised before any I/O: this is a fail-fast guard, not a server
    /// round trip.
    #[error("Static data source does not allow write operations ({method} {resource})")]
    StaticModeWriteRejected { method: String, resource: String },

    /// Network-level failure (connect, timeout, broken body).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Static snapshot file could not be read.
    #[error("Failed to read snapshot {path}: {reason}")]
    Snapshot { path: String, reason: String },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// The payload did not match the expected shape.
    #[error("Failed to decode payload: {0}")]
    Decode(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns the HTTP status code, when the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this error is the static-mode write guard firing.
    pub fn is_write_rejected(&self) -> bool {
        matches!(self, ClientError::StaticModeWriteRejected { .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 404,
            message: "Not found".into(),
            payload: None,
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Not found"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_write_rejected_categorization() {
        let err = ClientError::StaticModeWriteRejected {
            method: "POST".into(),
            resource: "books".into(),
        };
        assert!(err.is_write_rejected());
        assert!(!err.is_config_error());
        assert_eq!(err.status(), None);
    }
}
