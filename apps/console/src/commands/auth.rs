//! Login, logout and session display.

use chrono::{Local, Utc};
use milka_core::session::Session;
use tracing::{info, warn};

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::AppContext;
use crate::views::pages::{render_session, render_welcome};

pub const ADMIN_ROLE: &str = "admin";

/// Checks the admin credentials and stores a new session.
pub fn login(ctx: &mut AppContext, username: &str, password: &str) -> ConsoleResult<String> {
    ctx.config
        .session
        .credentials()
        .verify(username, password)
        .map_err(|e| {
            warn!(username = %username.trim(), "Login rejected");
            ConsoleError::from(e)
        })?;

    let session = Session::start(username.trim(), ADMIN_ROLE, Utc::now());
    ctx.store.save_session(&session)?;
    info!(username = %session.username, "Logged in");

    ctx.emit(&session, |p| render_welcome(&session.username, p))
}

pub fn logout(ctx: &mut AppContext) -> ConsoleResult<String> {
    ctx.store.clear_session()?;
    info!("Logged out");
    ctx.message("Logged out", |p| p.muted("Logged out."))
}

pub fn whoami(ctx: &mut AppContext) -> ConsoleResult<String> {
    let state = ctx.resolve_session().clone();
    ctx.emit(&state.session(), |p| render_session(&state, &Local, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OutputMode;
    use milka_client::{LocalStore, MilkaConfig};

    fn context(dir: &tempfile::TempDir) -> AppContext {
        let store = LocalStore::open(dir.path().join("local_storage.json")).unwrap();
        AppContext::with_store(MilkaConfig::default(), store, OutputMode::Plain).unwrap()
    }

    #[test]
    fn test_login_stores_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);

        let out = login(&mut ctx, " Milma ", "1234").unwrap();
        assert_eq!(out, "Welcome, Milma!");
        assert_eq!(ctx.require_admin().unwrap().role, ADMIN_ROLE);
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);

        let err = login(&mut ctx, "Milma", "0000").unwrap_err();
        assert_eq!(err.message, milka_core::session::INVALID_LOGIN);
        assert_eq!(err.exit_code(), 2);
        assert!(ctx.store.session_raw().is_none());
    }

    #[test]
    fn test_logout_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(&dir);
        login(&mut ctx, "Milma", "1234").unwrap();

        logout(&mut ctx).unwrap();
        assert!(ctx.require_admin().is_err());
        assert!(whoami(&mut ctx).unwrap().contains("Not logged in"));
    }
}
