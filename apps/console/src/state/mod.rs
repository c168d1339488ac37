//! # Console State
//!
//! Everything a command needs, built once per invocation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          AppContext                                     │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │ MilkaConfig  │ │  ApiClient   │ │  LocalStore  │ │ SessionGuard │   │
//! │  │              │ │              │ │              │ │              │   │
//! │  │ • API URL    │ │ • reqwest    │ │ • session    │ │ • TTL        │   │
//! │  │ • TTL, creds │ │ • timeout    │ │ • theme      │ │ • last state │   │
//! │  │ • reports    │ │              │ │ • payments   │ │              │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  Output: palette from the stored theme, text or JSON                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod context;

pub use context::{AppContext, OutputMode, LOGIN_REQUIRED};
