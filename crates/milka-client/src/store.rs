//! # Local Storage
//!
//! A small JSON file of string keys to string values, the console's stand-in
//! for browser local storage.
//!
//! ## File Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  local_storage.json                                                     │
//! │  {                                                                      │
//! │    "admin":    "{\"username\":\"Milma\",\"loggedIn\":true,...}",        │
//! │    "payments": "[{\"phone\":\"0712345678\",...}]",                      │
//! │    "theme":    "dark"                                                   │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are stored as strings exactly like the browser API; the session
//! blob is only interpreted by the session guard. Every write replaces the
//! file atomically (temp file + rename).

use milka_core::session::Session;
use milka_core::types::{PaymentRecord, Theme};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

pub const SESSION_KEY: &str = "admin";
pub const THEME_KEY: &str = "theme";
pub const PAYMENTS_KEY: &str = "payments";

/// Number of payment prompts kept in the local log.
pub const MAX_PAYMENT_HISTORY: usize = 50;

#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|e| {
                    ClientError::Storage(format!("{} is not a valid store: {e}", path.display()))
                })?
            }
        } else {
            debug!(?path, "Local storage file not found, starting empty");
            BTreeMap::new()
        };
        Ok(LocalStore { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> ClientResult<()> {
        self.entries.insert(key.to_string(), value.into());
        self.persist()
    }

    pub fn remove(&mut self, key: &str) -> ClientResult<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = ?self.path, keys = self.entries.len(), "Local storage saved");
        Ok(())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// The stored session blob, uninterpreted.
    pub fn session_raw(&self) -> Option<&str> {
        self.get(SESSION_KEY)
    }

    pub fn save_session(&mut self, session: &Session) -> ClientResult<()> {
        let blob = serde_json::to_string(session)?;
        self.set(SESSION_KEY, blob)
    }

    pub fn clear_session(&mut self) -> ClientResult<()> {
        self.remove(SESSION_KEY)
    }

    // =========================================================================
    // Theme
    // =========================================================================

    /// The stored theme. An unreadable value falls back to light.
    pub fn theme(&self) -> Theme {
        match self.get(THEME_KEY) {
            None => Theme::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Unknown theme in local storage, using light");
                Theme::default()
            }),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> ClientResult<()> {
        self.set(THEME_KEY, theme.as_str())
    }

    // =========================================================================
    // Payment Log
    // =========================================================================

    /// Payment prompts sent from this console, newest first.
    pub fn payment_history(&self) -> ClientResult<Vec<PaymentRecord>> {
        match self.get(PAYMENTS_KEY) {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| ClientError::Storage(format!("payment log is unreadable: {e}"))),
        }
    }

    /// Adds a record at the front, keeping the newest [`MAX_PAYMENT_HISTORY`].
    pub fn push_payment(&mut self, record: PaymentRecord) -> ClientResult<()> {
        let mut history = self.payment_history()?;
        history.insert(0, record);
        history.truncate(MAX_PAYMENT_HISTORY);
        let raw = serde_json::to_string(&history)?;
        self.set(PAYMENTS_KEY, raw)
    }
}
