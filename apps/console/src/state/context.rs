//! Per-invocation context: config, API client, local storage and the
//! session guard.

use chrono::Utc;
use milka_client::{ApiClient, LocalStore, MilkaConfig};
use milka_core::session::{GuardState, Session, SessionGuard};
use serde::Serialize;
use tracing::debug;

use crate::error::{ConsoleError, ConsoleResult};
use crate::views::Palette;

/// Printed when a guarded command runs without a valid session.
pub const LOGIN_REQUIRED: &str = "Please log in to continue";

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Themed text. Colours are dropped when stdout is not a terminal or
    /// `NO_COLOR` is set.
    Color,
    /// Text without escape codes (`--no-color`).
    Plain,
    /// The underlying data as pretty JSON.
    Json,
}

pub struct AppContext {
    pub config: MilkaConfig,
    pub api: ApiClient,
    pub store: LocalStore,
    guard: SessionGuard,
    mode: OutputMode,
}

impl AppContext {
    pub fn new(config: MilkaConfig, mode: OutputMode) -> ConsoleResult<Self> {
        let api = ApiClient::new(&config.api)?;
        let store = LocalStore::open(config.store_path()?)?;
        let guard = SessionGuard::with_ttl_hours(config.session.ttl_hours);

        debug!(api = %api.base_url(), store = ?store.path(), ?mode, "Context ready");

        Ok(AppContext {
            config,
            api,
            store,
            guard,
            mode,
        })
    }

    /// Builds a context around an already opened store.
    pub fn with_store(
        config: MilkaConfig,
        store: LocalStore,
        mode: OutputMode,
    ) -> ConsoleResult<Self> {
        let api = ApiClient::new(&config.api)?;
        let guard = SessionGuard::with_ttl_hours(config.session.ttl_hours);
        Ok(AppContext {
            config,
            api,
            store,
            guard,
            mode,
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Re-reads the stored session blob.
    pub fn resolve_session(&mut self) -> &GuardState {
        self.guard.resolve(self.store.session_raw(), Utc::now())
    }

    /// The current session, or `Unauthenticated` for guarded commands.
    pub fn require_admin(&mut self) -> ConsoleResult<Session> {
        match self.resolve_session() {
            GuardState::Authenticated(session) => Ok(session.clone()),
            state => {
                debug!(?state, "Guarded command refused");
                Err(ConsoleError::unauthenticated(LOGIN_REQUIRED))
            }
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    pub fn palette(&self) -> Palette {
        match self.mode {
            OutputMode::Color => Palette::for_theme(self.store.theme()),
            OutputMode::Plain | OutputMode::Json => Palette::plain(),
        }
    }

    /// Renders `data` as JSON in JSON mode and with `render` otherwise.
    pub fn emit<T, F>(&self, data: &T, render: F) -> ConsoleResult<String>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&Palette) -> String,
    {
        match self.mode {
            OutputMode::Json => serde_json::to_string_pretty(data)
                .map_err(|e| ConsoleError::internal(format!("Failed to encode output: {e}"))),
            _ => Ok(render(&self.palette())),
        }
    }

    /// Confirmation text. JSON mode wraps it as `{"message": ...}`.
    pub fn message<F>(&self, text: &str, render: F) -> ConsoleResult<String>
    where
        F: FnOnce(&Palette) -> String,
    {
        self.emit(&serde_json::json!({ "message": text }), render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milka_core::types::Theme;

    fn context(dir: &tempfile::TempDir, mode: OutputMode) -> AppContext {
        let store = LocalStore::open(dir.path().join("local_storage.json")).unwrap();
        AppContext::with_store(MilkaConfig::default(), store, mode).unwrap()
    }

    #[test]
    fn test_guard_refuses_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, OutputMode::Plain);

        let err = ctx.require_admin().unwrap_err();
        assert_eq!(err.message, LOGIN_REQUIRED);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_guard_accepts_stored_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, OutputMode::Plain);
        ctx.store
            .save_session(&Session::start("Milma", "admin", Utc::now()))
            .unwrap();

        assert_eq!(ctx.require_admin().unwrap().username, "Milma");
    }

    #[test]
    fn test_forged_blob_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, OutputMode::Plain);
        ctx.store
            .set(milka_client::store::SESSION_KEY, r#"{"loggedIn": "true"}"#)
            .unwrap();

        assert!(ctx.require_admin().is_err());
    }

    #[test]
    fn test_palette_follows_mode_and_theme() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir, OutputMode::Color);
        ctx.store.set_theme(Theme::Dark).unwrap();
        assert_eq!(ctx.palette(), Palette::for_theme(Theme::Dark));

        let plain = context(&dir, OutputMode::Plain);
        assert_eq!(plain.palette(), Palette::plain());
    }

    #[test]
    fn test_json_mode_bypasses_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir, OutputMode::Json);
        let out = ctx.emit(&vec![1, 2], |_| "text".to_string()).unwrap();
        assert!(out.starts_with('['));

        let text = context(&dir, OutputMode::Plain);
        assert_eq!(text.emit(&vec![1, 2], |_| "text".to_string()).unwrap(), "text");
    }
}
