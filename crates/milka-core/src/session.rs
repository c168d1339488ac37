//! # Session Guard
//!
//! Decides whether the admin-only commands may run, based on the session blob
//! kept in local storage under the `admin` key.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                       ┌──────────────┐                                  │
//! │                       │   Unknown    │  (nothing read yet)              │
//! │                       └──────┬───────┘                                  │
//! │                  resolve(raw, now)                                      │
//! │              ┌───────────────┴────────────────┐                         │
//! │              ▼                                ▼                         │
//! │   ┌────────────────────┐         ┌──────────────────────────┐          │
//! │   │  Authenticated     │         │  Unauthenticated         │          │
//! │   │  (Session)         │         │  Missing / Malformed /   │          │
//! │   │                    │         │  LoggedOut / Expired     │          │
//! │   └────────────────────┘         └──────────────────────────┘          │
//! │                                                                         │
//! │   Authenticated requires `loggedIn` to be exactly JSON `true` and,     │
//! │   when a TTL is set and `loginTime` is present, a fresh login.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is a local gate and nothing more. There is no server verification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// Default lifetime of a login.
pub const DEFAULT_SESSION_TTL_HOURS: u64 = 12;

/// Shown when the login check fails.
pub const INVALID_LOGIN: &str = "Invalid login details";

// =============================================================================
// Session
// =============================================================================

/// The stored login, serialised as
/// `{"username", "role", "loggedIn", "loginTime"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub role: String,

    pub logged_in: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_time: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates the session written at login.
    pub fn start(username: impl Into<String>, role: impl Into<String>, now: DateTime<Utc>) -> Self {
        Session {
            username: username.into(),
            role: role.into(),
            logged_in: true,
            login_time: Some(now),
        }
    }

    /// Whether a login made at `login_time` is older than `ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Option<Duration>) -> bool {
        match (self.login_time, ttl) {
            (Some(at), Some(ttl)) => now - at > ttl,
            _ => false,
        }
    }
}

// =============================================================================
// Guard
// =============================================================================

/// Why a session was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Nothing stored under the key.
    Missing,
    /// Not a JSON object.
    Malformed,
    /// `loggedIn` is anything but `true`.
    LoggedOut,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Unknown,
    Authenticated(Session),
    Unauthenticated(DenyReason),
}

impl GuardState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, GuardState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            GuardState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Resolves a stored blob into a [`GuardState`].
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use milka_core::session::{DenyReason, GuardState, SessionGuard};
///
/// let mut guard = SessionGuard::new();
/// assert_eq!(guard.state(), &GuardState::Unknown);
///
/// guard.resolve(Some(r#"{"loggedIn": true}"#), Utc::now());
/// assert!(guard.state().is_authenticated());
///
/// guard.resolve(Some("not json"), Utc::now());
/// assert_eq!(guard.state(), &GuardState::Unauthenticated(DenyReason::Malformed));
/// ```
#[derive(Debug, Clone)]
pub struct SessionGuard {
    ttl: Option<Duration>,
    state: GuardState,
}

impl SessionGuard {
    /// A guard with the default 12 hour TTL.
    pub fn new() -> Self {
        Self::with_ttl_hours(DEFAULT_SESSION_TTL_HOURS)
    }

    /// `0` disables expiry.
    pub fn with_ttl_hours(hours: u64) -> Self {
        let ttl = match hours {
            0 => None,
            h => i64::try_from(h).ok().and_then(Duration::try_hours),
        };
        SessionGuard {
            ttl,
            state: GuardState::Unknown,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Reads the stored blob and moves out of `Unknown`.
    ///
    /// Parse failures never surface; they only deny access.
    pub fn resolve(&mut self, raw: Option<&str>, now: DateTime<Utc>) -> &GuardState {
        self.state = match raw {
            None => GuardState::Unauthenticated(DenyReason::Missing),
            Some(raw) => self.evaluate(raw, now),
        };
        &self.state
    }

    fn evaluate(&self, raw: &str, now: DateTime<Utc>) -> GuardState {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
            return GuardState::Unauthenticated(DenyReason::Malformed);
        };

        if map.get("loggedIn") != Some(&Value::Bool(true)) {
            return GuardState::Unauthenticated(DenyReason::LoggedOut);
        }

        let text = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let login_time = map
            .get("loginTime")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let session = Session {
            username: text("username"),
            role: text("role"),
            logged_in: true,
            login_time,
        };

        if session.is_expired(now, self.ttl) {
            return GuardState::Unauthenticated(DenyReason::Expired);
        }

        GuardState::Authenticated(session)
    }
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// The single admin login accepted by the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        AdminCredentials {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks a login attempt. The username is trimmed, the password is not.
    pub fn verify(&self, username: &str, password: &str) -> ValidationResult<()> {
        if username.trim() == self.username && password == self.password {
            Ok(())
        } else {
            Err(ValidationError::InvalidFormat {
                field: "login".to_string(),
                reason: INVALID_LOGIN.to_string(),
            })
        }
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        AdminCredentials::new("Milma", "1234")
    }
}
