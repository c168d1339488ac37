//! # milka-client: I/O for the Milka Shop Console
//!
//! The REST client for the shop API, the local storage file and the
//! submission flows that tie validation, requests and re-fetching together.
//!
//! ## Modules
//! - [`config`]: `MilkaConfig` (defaults, config.toml, environment)
//! - [`http`]: `ApiClient`, one method per endpoint
//! - [`store`]: `LocalStore` (session blob, theme, payment log)
//! - [`flows`]: validate → send → re-fetch
//!
//! ## Example
//! ```rust,no_run
//! use milka_client::{ApiClient, MilkaConfig};
//!
//! # async fn run() -> milka_client::ClientResult<()> {
//! let config = MilkaConfig::load(None)?;
//! let api = ApiClient::new(&config.api)?;
//! let products = api.list_products().await?;
//! println!("{} products", products.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod flows;
pub mod http;
pub mod store;

pub use config::{ApiSettings, MilkaConfig};
pub use error::{ClientError, ClientResult};
pub use flows::{PaymentForm, PaymentOutcome, SaleOutcome};
pub use http::{ApiClient, ProductCreated};
pub use store::LocalStore;
