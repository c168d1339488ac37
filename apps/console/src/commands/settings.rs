//! Admin profile and theme.

use milka_client::flows::{self, SAVE_PROFILE_FAILED};
use milka_core::types::{AdminProfile, Theme};
use tracing::{info, warn};

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::AppContext;
use crate::views::pages::{render_profile, render_theme, SETTINGS_SAVED};

pub const PROFILE_UNAVAILABLE: &str = "Could not load the current settings, so nothing was saved. \
Try again, or pass all of --name, --email, --phone, --shop-name and --location to replace them.";

/// Fields given to `settings update`. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub shop_name: Option<String>,
    pub location: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.shop_name.is_none()
            && self.location.is_none()
    }

    /// Every field given, so the result does not depend on the stored profile.
    pub fn is_complete(&self) -> bool {
        self.name.is_some()
            && self.email.is_some()
            && self.phone.is_some()
            && self.shop_name.is_some()
            && self.location.is_some()
    }

    pub fn apply(&self, profile: &mut AdminProfile) {
        let fields = [
            (&self.name, &mut profile.name),
            (&self.email, &mut profile.email),
            (&self.phone, &mut profile.phone),
            (&self.shop_name, &mut profile.shop_name),
            (&self.location, &mut profile.location),
        ];
        for (update, field) in fields {
            if let Some(value) = update {
                *field = value.trim().to_string();
            }
        }
    }
}

/// `GET /admin`, or the default profile when the request fails.
async fn current_profile(ctx: &AppContext) -> AdminProfile {
    match ctx.api.get_admin().await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(error = %e, "Could not load admin profile, using defaults");
            AdminProfile::default()
        }
    }
}

pub async fn show(ctx: &AppContext) -> ConsoleResult<String> {
    let profile = current_profile(ctx).await;
    let theme = ctx.store.theme();
    ctx.emit(&profile, |p| render_profile(&profile, theme, p))
}

pub async fn update(ctx: &AppContext, update: &ProfileUpdate) -> ConsoleResult<String> {
    if update.is_empty() {
        return Err(ConsoleError::validation(
            "Nothing to update. Pass at least one of --name, --email, --phone, --shop-name, --location",
        ));
    }

    // only a full replacement may proceed without the stored profile
    let mut profile = match ctx.api.get_admin().await {
        Ok(profile) => profile,
        Err(e) if update.is_complete() => {
            warn!(error = %e, "Could not load admin profile, replacing it in full");
            AdminProfile::default()
        }
        Err(e) => {
            warn!(error = %e, "Could not load admin profile, update refused");
            let code = ConsoleError::from_client(e, PROFILE_UNAVAILABLE).code;
            return Err(ConsoleError::new(code, PROFILE_UNAVAILABLE));
        }
    };
    update.apply(&mut profile);

    flows::save_admin_profile(&ctx.api, &profile)
        .await
        .map_err(|e| ConsoleError::from_client(e, SAVE_PROFILE_FAILED))?;

    let theme = ctx.store.theme();
    ctx.emit(&profile, |p| {
        format!(
            "{}\n\n{}",
            p.success(SETTINGS_SAVED),
            render_profile(&profile, theme, p)
        )
    })
}

/// Shows the theme, or sets it to `light`, `dark` or the other one (`toggle`).
pub fn theme(ctx: &mut AppContext, choice: Option<&str>) -> ConsoleResult<String> {
    let current = ctx.store.theme();
    let next = match choice {
        None => current,
        Some("toggle") => current.toggled(),
        Some(name) => name.parse::<Theme>()?,
    };

    if next != current {
        ctx.store.set_theme(next)?;
        info!(theme = %next, "Theme changed");
    }

    ctx.emit(&next, |p| render_theme(next, p))
}
