//! # Error Types
//!
//! Domain-specific error types for milka-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  milka-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  milka-client errors (separate crate)                                  │
//! │  └── ClientError      - Network, server and storage failures           │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── ConsoleError     - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → ConsoleError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything in this file is caught before a request leaves the machine.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations detected locally.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The selected product is not in the list the console last fetched.
    #[error("Selected product not found: {0}")]
    ProductNotFound(i64),

    /// Requested quantity exceeds the product's known stock.
    ///
    /// ## User Workflow
    /// ```text
    /// sales record --product 3 --quantity 6
    ///      │
    ///      ▼
    /// Check stock: available=5
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Fanta", available: 5, requested: 6 }
    ///      │
    ///      ▼
    /// Console shows: "Insufficient stock. Available: 5"  (no request sent)
    /// ```
    #[error("Insufficient stock. Available: {available}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A monetary value could not be represented.
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed phone number or amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
