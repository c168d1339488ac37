//! # Console Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Command Function ── ConsoleResult<String>                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation Error? ── ValidationError ─────────┐                        │
//! │         │                                      │                        │
//! │         ▼                                      ▼                        │
//! │  Request Error? ───── ClientError ────────► ConsoleError ──► stderr     │
//! │         │                                      │          + exit code   │
//! │         ▼                                      │                        │
//! │  Success ──► stdout                            │                        │
//! │                                                                         │
//! │  code               exit                                                │
//! │  ────────────────   ────                                                │
//! │  Validation           2                                                 │
//! │  Unauthenticated      3                                                 │
//! │  Network / Server     4                                                 │
//! │  Config / Storage     5                                                 │
//! │  Internal             1                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use milka_client::ClientError;
use milka_core::{CoreError, ValidationError};
use serde::Serialize;

/// Result type for console commands.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Shown when a failure carries no message of its own.
pub const REQUEST_FAILED: &str = "Request failed. Please try again.";

/// Error returned from console commands.
///
/// With `--json` this is what is printed to stderr:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Insufficient stock. Available: 5"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Message for the operator
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Rejected locally, nothing was sent
    ValidationError,

    /// Guarded command without a valid session
    Unauthenticated,

    /// Request failed before a response arrived
    NetworkError,

    /// The API answered with an error or an unexpected body
    ServerError,

    /// config.toml or environment is invalid
    ConfigError,

    /// Local storage file could not be read or written
    StorageError,

    Internal,
}

impl ErrorCode {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::ValidationError => 2,
            ErrorCode::Unauthenticated => 3,
            ErrorCode::NetworkError | ErrorCode::ServerError => 4,
            ErrorCode::ConfigError | ErrorCode::StorageError => 5,
            ErrorCode::Internal => 1,
        }
    }
}

impl ConsoleError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ConsoleError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ConsoleError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ConsoleError::new(ErrorCode::Unauthenticated, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ConsoleError::new(ErrorCode::Internal, message)
    }

    /// Converts a client error, showing `fallback` when the failure has no
    /// message of its own (network errors, servers that send no body).
    pub fn from_client(err: ClientError, fallback: &str) -> Self {
        let code = match &err {
            ClientError::Core(_) => ErrorCode::ValidationError,
            ClientError::Http(_) => ErrorCode::NetworkError,
            ClientError::Server { .. } | ClientError::InvalidResponse { .. } => {
                ErrorCode::ServerError
            }
            ClientError::InvalidConfig(_) => ErrorCode::ConfigError,
            ClientError::Io(_) | ClientError::Storage(_) => ErrorCode::StorageError,
            ClientError::Serialization(_) => ErrorCode::Internal,
        };

        let message = match &err {
            ClientError::Core(_) | ClientError::Server { .. } => err.user_message(fallback),
            ClientError::Http(e) => {
                tracing::warn!("Request failed: {}", e);
                fallback.to_string()
            }
            ClientError::InvalidResponse { .. } => {
                tracing::error!("{}", err);
                fallback.to_string()
            }
            // local problems are shown in full, the operator has to fix them
            _ => err.to_string(),
        };

        ConsoleError::new(code, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

/// Converts client errors to console errors with the generic fallback.
impl From<ClientError> for ConsoleError {
    fn from(err: ClientError) -> Self {
        ConsoleError::from_client(err, REQUEST_FAILED)
    }
}

impl From<CoreError> for ConsoleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            other => ConsoleError::validation(other.to_string()),
        }
    }
}

impl From<ValidationError> for ConsoleError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidFormat { reason, .. } => ConsoleError::validation(reason),
            other => ConsoleError::validation(other.to_string()),
        }
    }
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ConsoleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ConsoleError::validation("x").exit_code(), 2);
        assert_eq!(ConsoleError::unauthenticated("x").exit_code(), 3);
        assert_eq!(ConsoleError::internal("x").exit_code(), 1);
        assert_eq!(ErrorCode::ServerError.exit_code(), 4);
        assert_eq!(ErrorCode::StorageError.exit_code(), 5);
    }

    #[test]
    fn test_core_errors_are_validation() {
        let err: ConsoleError = CoreError::InsufficientStock {
            product: "Salt".to_string(),
            available: 5,
            requested: 6,
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Insufficient stock. Available: 5");
    }

    #[test]
    fn test_invalid_format_shows_reason_only() {
        let err: ConsoleError = ValidationError::InvalidFormat {
            field: "login".to_string(),
            reason: "Invalid login details".to_string(),
        }
        .into();
        assert_eq!(err.message, "Invalid login details");
    }

    #[test]
    fn test_server_message_is_preferred() {
        let err = ConsoleError::from_client(
            ClientError::Server {
                status: 500,
                message: Some("Database connection failed".to_string()),
            },
            "Failed to record sale. Please try again.",
        );
        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.message, "Database connection failed");

        let bare = ConsoleError::from_client(
            ClientError::Server {
                status: 502,
                message: None,
            },
            "Failed to record sale. Please try again.",
        );
        assert_eq!(bare.message, "Failed to record sale. Please try again.");
    }

    #[test]
    fn test_storage_errors_keep_detail() {
        let err: ConsoleError = ClientError::Storage("payment log is unreadable".into()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(err.message.contains("payment log is unreadable"));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(ConsoleError::validation("name is required")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "name is required");
    }
}
