//! # Console Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Load Order (later overrides earlier)                 │
//! │                                                                         │
//! │  1. Defaults            base_url = https://peter2valid.pythonanywhere.com│
//! │  2. config.toml         --config PATH, else the platform config dir    │
//! │  3. Environment         MILKA_API_URL, MILKA_TIMEOUT_SECS, ...         │
//! │  4. Command line        --api-url (applied by the console)             │
//! │  5. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://peter2valid.pythonanywhere.com"
//! timeout_secs = 30
//!
//! [session]
//! ttl_hours = 12          # 0 disables expiry
//! admin_username = "Milma"
//! admin_password = "1234"
//!
//! [storage]
//! path = "/home/shop/.local/share/milka/local_storage.json"
//!
//! [reports]
//! top_n = 5
//! trend_days = 7
//! ```

use milka_core::session::{AdminCredentials, DEFAULT_SESSION_TTL_HOURS};
use milka_core::{DEFAULT_TOP_N, DEFAULT_TREND_DAYS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// The hosted shop API.
pub const DEFAULT_API_URL: &str = "https://peter2valid.pythonanywhere.com";

/// Longest trend window the Reports view accepts.
pub const MAX_TREND_DAYS: u32 = 31;

const STORE_FILE_NAME: &str = "local_storage.json";

// =============================================================================
// API Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiSettings {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Session Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Hours a login stays valid. `0` keeps it until logout.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_ttl_hours() -> u64 {
    DEFAULT_SESSION_TTL_HOURS
}

fn default_admin_username() -> String {
    AdminCredentials::default().username
}

fn default_admin_password() -> String {
    AdminCredentials::default().password
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            ttl_hours: default_ttl_hours(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

impl SessionSettings {
    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials::new(&self.admin_username, &self.admin_password)
    }
}

// =============================================================================
// Storage & Report Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Local storage file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default = "default_trend_days")]
    pub trend_days: u32,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_trend_days() -> u32 {
    DEFAULT_TREND_DAYS
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            top_n: default_top_n(),
            trend_days: default_trend_days(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilkaConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub reports: ReportSettings,
}

impl MilkaConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` that does not exist is an error. A missing
    /// file at the default location is not.
    pub fn load(config_path: Option<&Path>) -> ClientResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ClientError::InvalidConfig(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ClientResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.reports.top_n == 0 {
            return Err(ClientError::InvalidConfig(
                "top_n must be greater than 0".into(),
            ));
        }

        if self.reports.trend_days > MAX_TREND_DAYS {
            return Err(ClientError::InvalidConfig(format!(
                "trend_days must be at most {MAX_TREND_DAYS}"
            )));
        }

        if self.session.admin_username.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "admin_username must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from a variable lookup.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MILKA_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(timeout) = lookup("MILKA_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid MILKA_TIMEOUT_SECS"),
            }
        }

        if let Some(ttl) = lookup("MILKA_SESSION_TTL_HOURS") {
            match ttl.parse::<u64>() {
                Ok(hours) => self.session.ttl_hours = hours,
                Err(_) => warn!(value = %ttl, "Ignoring invalid MILKA_SESSION_TTL_HOURS"),
            }
        }

        if let Some(username) = lookup("MILKA_ADMIN_USERNAME") {
            self.session.admin_username = username;
        }

        if let Some(password) = lookup("MILKA_ADMIN_PASSWORD") {
            self.session.admin_password = password;
        }

        if let Some(path) = lookup("MILKA_STORE_PATH") {
            debug!(path = %path, "Overriding storage path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("ke", "milka", "shop")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Where the local storage file lives.
    pub fn store_path(&self) -> ClientResult<PathBuf> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join(STORE_FILE_NAME))
            .ok_or_else(|| {
                ClientError::InvalidConfig(
                    "no home directory found; set MILKA_STORE_PATH or [storage] path".into(),
                )
            })
    }
}
