//! # Client Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ClientError                                     │
//! │                                                                         │
//! │  Local rejection (nothing was sent)                                    │
//! │  └── Core          - ValidationError / CoreError from milka-core       │
//! │                                                                         │
//! │  Network / server                                                      │
//! │  ├── Http          - connection, timeout, TLS                          │
//! │  ├── Server        - non-2xx with the API's own message                │
//! │  └── InvalidResponse - body does not match the expected schema         │
//! │                                                                         │
//! │  Local machine                                                         │
//! │  ├── Io / Storage  - local storage file, image upload                  │
//! │  └── Config        - config.toml and environment                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use milka_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Local Rejections
    // =========================================================================
    /// The submission failed a local check. No request was sent.
    #[error("{0}")]
    Core(#[from] CoreError),

    // =========================================================================
    // Network / Server
    // =========================================================================
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Server returned {status}{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server { status: u16, message: Option<String> },

    /// The response body did not have the expected shape.
    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    // =========================================================================
    // Local Machine
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The local storage file exists but cannot be read as a store.
    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidConfig(format!("invalid API URL: {err}"))
    }
}

impl ClientError {
    /// True when the error was raised before any request was sent.
    pub fn is_local_rejection(&self) -> bool {
        matches!(self, ClientError::Core(_))
    }

    /// The text shown to the operator.
    ///
    /// Local rejections show their own message and server errors show the
    /// API's message when it sent one. Everything else shows `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Core(CoreError::Validation(ValidationError::InvalidFormat {
                reason,
                ..
            })) => reason.clone(),
            ClientError::Core(err) => err.to_string(),
            ClientError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "Failed to record sale. Please try again.";

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ClientError::Server {
            status: 400,
            message: Some("Product out of stock".to_string()),
        };
        assert_eq!(err.user_message(FALLBACK), "Product out of stock");
        assert_eq!(err.to_string(), "Server returned 400: Product out of stock");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ClientError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(FALLBACK), FALLBACK);
        assert_eq!(err.to_string(), "Server returned 500");

        let err = ClientError::InvalidResponse {
            endpoint: "GET /sales".to_string(),
            reason: "expected a list".to_string(),
        };
        assert_eq!(err.user_message(FALLBACK), FALLBACK);
    }

    #[test]
    fn test_user_message_for_local_rejection() {
        let err: ClientError = CoreError::InsufficientStock {
            product: "Fanta".to_string(),
            available: 5,
            requested: 6,
        }
        .into();
        assert!(err.is_local_rejection());
        assert_eq!(err.user_message(FALLBACK), "Insufficient stock. Available: 5");

        let err: ClientError = ValidationError::InvalidFormat {
            field: "phone_number".to_string(),
            reason: "Please enter a valid M-Pesa phone number (e.g., +254712345678)".to_string(),
        }
        .into();
        assert_eq!(
            err.user_message(FALLBACK),
            "Please enter a valid M-Pesa phone number (e.g., +254712345678)"
        );
    }
}
