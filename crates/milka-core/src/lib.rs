//! # milka-core: Pure Business Logic for Milka Shop
//!
//! This crate holds everything the shop console computes without touching
//! the network or the disk: domain types, money, validation rules, report
//! aggregation and the session guard.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Milka Shop Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    milka console (apps/console)                 │   │
//! │  │    dashboard ─ products ─ sales ─ payments ─ reports ─ settings │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    milka-client                                 │   │
//! │  │    ApiClient (REST) ─ LocalStore ─ submission flows             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ milka-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌─────────┐ │   │
//! │  │   │  types  │ │  money  │ │validation│ │ report  │ │ session │ │   │
//! │  │   │ Product │ │  Money  │ │  rules   │ │ totals  │ │  guard  │ │   │
//! │  │   │  Sale   │ │   KES   │ │  MSISDN  │ │ top-N   │ │         │ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └─────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use milka_core::money::{format_currency, Money};
//!
//! let price = Money::from_cents(123_450);
//! assert_eq!(price.to_string(), "KES 1,234.50");
//! assert_eq!(format_currency(None), "KES 0.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod report;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{format_currency, Money};
pub use session::{AdminCredentials, DenyReason, GuardState, Session, SessionGuard};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which a product is highlighted as running low.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Number of products shown in the "most sold" ranking.
pub const DEFAULT_TOP_N: usize = 5;

/// Number of days covered by the revenue/volume trend.
pub const DEFAULT_TREND_DAYS: u32 = 7;

/// Number of sales shown in the "recent sales" table.
pub const RECENT_SALES_LIMIT: usize = 10;

/// Label used for sales that carry no product name.
pub const UNKNOWN_PRODUCT: &str = "Unknown";
