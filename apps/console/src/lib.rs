//! # Milka Console Library
//!
//! The `milka` command: one subcommand per page of the shop's admin UI.
//!
//! ## Module Organization
//! ```text
//! milka_console/
//! ├── lib.rs          ◄─── You are here (CLI definition, logging & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── context.rs  ◄─── AppContext: config, API, store, session guard
//! ├── commands/
//! │   ├── mod.rs      ◄─── Dispatch from parsed arguments
//! │   ├── auth.rs     ◄─── login / logout / whoami
//! │   ├── status.rs   ◄─── API health
//! │   ├── product.rs  ◄─── list, suggest, add, delete
//! │   ├── sale.rs     ◄─── record, recent
//! │   ├── payment.rs  ◄─── M-Pesa prompt, local payment log
//! │   ├── report.rs   ◄─── dashboard, reports
//! │   └── settings.rs ◄─── admin profile, theme
//! ├── views/          ◄─── Pure text renderers
//! └── error.rs        ◄─── ConsoleError and exit codes
//! ```
//!
//! ## Command Tree
//! ```text
//! milka [--config PATH] [--api-url URL] [--json] [--no-color] [-v]
//! ├── status
//! ├── login --username U --password P
//! ├── logout
//! ├── whoami
//! ├── dashboard
//! ├── products
//! │   ├── list [--search TEXT]
//! │   ├── suggest TEXT
//! │   ├── add --name --brand --category --quantity --price [--image]   (login)
//! │   └── delete ID                                                     (login)
//! ├── sales
//! │   ├── record --product ID --quantity N
//! │   └── recent [--limit N]
//! ├── payments
//! │   ├── prompt --phone MSISDN --product ID --amount KES
//! │   └── history
//! ├── reports [--top N] [--days N]
//! └── settings
//!     ├── show
//!     ├── update [--name] [--email] [--phone] [--shop-name] [--location]
//!     └── theme [light|dark|toggle]
//! ```

pub mod commands;
pub mod error;
pub mod state;
pub mod views;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use milka_client::MilkaConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use error::ConsoleResult;
use state::{AppContext, OutputMode};

/// Runs the console and returns the process exit code.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Parse Arguments ──────────────────────────────────────────────────► │
/// │     • clap builder, `--help` and `--version` exit here                  │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber on stderr                                      │
/// │     • Default: WARN, `-v` for DEBUG, MILKA_LOG / RUST_LOG override      │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → config.toml → MILKA_* → `--api-url`                    │
/// │                                                                         │
/// │  4. Build Context ────────────────────────────────────────────────────► │
/// │     • ApiClient, LocalStore, SessionGuard                               │
/// │                                                                         │
/// │  5. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • output on stdout, errors on stderr, exit code from ErrorCode      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let mode = output_mode(&matches);
    info!(version = env!("CARGO_PKG_VERSION"), "Starting milka console");

    match execute(&matches, mode).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!(code = ?err.code, "Command failed");
            match mode {
                OutputMode::Json => match serde_json::to_string_pretty(&err) {
                    Ok(json) => eprintln!("{json}"),
                    Err(_) => eprintln!("{}", err.message),
                },
                _ => eprintln!("Error: {}", err.message),
            }
            ExitCode::from(err.exit_code())
        }
    }
}

async fn execute(matches: &ArgMatches, mode: OutputMode) -> ConsoleResult<String> {
    let config = load_config(matches)?;
    let mut ctx = AppContext::new(config, mode)?;
    commands::dispatch(&mut ctx, matches).await
}

/// Loads the config and applies `--api-url` on top of it.
pub fn load_config(matches: &ArgMatches) -> ConsoleResult<MilkaConfig> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = MilkaConfig::load(path.map(PathBuf::as_path))?;

    if let Some(url) = matches.get_one::<String>("api-url") {
        config.api.base_url = url.clone();
        config.validate()?;
    }

    debug!(api = %config.api.base_url, "Configuration loaded");
    Ok(config)
}

fn output_mode(matches: &ArgMatches) -> OutputMode {
    if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("no-color") {
        OutputMode::Plain
    } else {
        OutputMode::Color
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `ERROR`: the API sent something the client cannot read
/// - `WARN`: fallbacks (default profile, unknown theme, failed requests)
/// - `INFO`: request completions, saved records
/// - `DEBUG`: request starts, config and store locations
///
/// Logs go to stderr so command output on stdout can be piped.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,milka_core=debug,milka_client=debug,milka_console=debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_env("MILKA_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

// =============================================================================
// CLI Definition
// =============================================================================

/// Builds the `milka` command line.
pub fn build_cli() -> Command {
    Command::new("milka")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Milka Shop admin console: inventory, sales, M-Pesa payments and reports")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Path to config.toml (default: platform config directory)"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .value_name("URL")
                .help("Base URL of the shop API (overrides config and MILKA_API_URL)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print data as JSON"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Disable coloured output"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(Command::new("status").about("Check that the shop API is reachable"))
        .subcommand(
            Command::new("login")
                .about("Log in as the shop admin")
                .arg(
                    Arg::new("username")
                        .long("username")
                        .short('u')
                        .help("Admin username"),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .short('p')
                        .help("Admin password"),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the stored session"))
        .subcommand(Command::new("whoami").about("Show the current session"))
        .subcommand(Command::new("dashboard").about("Today's sales and stock at a glance"))
        .subcommand(products_cli())
        .subcommand(sales_cli())
        .subcommand(payments_cli())
        .subcommand(
            Command::new("reports")
                .about("Totals, top products and the daily trend over all sales")
                .arg(
                    Arg::new("top")
                        .long("top")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Number of top products (default from config)"),
                )
                .arg(
                    Arg::new("days")
                        .long("days")
                        .value_name("N")
                        .value_parser(value_parser!(u32))
                        .help("Days in the trend (default from config, at most 31)"),
                ),
        )
        .subcommand(settings_cli())
}

fn products_cli() -> Command {
    Command::new("products")
        .about("Browse and manage the inventory")
        .subcommand_required(true)
        .subcommand(
            Command::new("list").about("List products").arg(
                Arg::new("search")
                    .long("search")
                    .short('s')
                    .value_name("TEXT")
                    .help("Filter by name or brand"),
            ),
        )
        .subcommand(
            Command::new("suggest")
                .about("Suggest product names for a new product")
                .arg(Arg::new("text").required(true).help("Start of the name")),
        )
        .subcommand(
            Command::new("add")
                .about("Add a product (requires login)")
                .arg(Arg::new("name").long("name").help("Product name"))
                .arg(Arg::new("brand").long("brand").help("Brand"))
                .arg(Arg::new("category").long("category").help("Category"))
                .arg(
                    Arg::new("quantity")
                        .long("quantity")
                        .short('q')
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .help("Units in stock"),
                )
                .arg(
                    Arg::new("price")
                        .long("price")
                        .value_name("KES")
                        .allow_negative_numbers(true)
                        .help("Price per unit, e.g. 1250.50"),
                )
                .arg(
                    Arg::new("image")
                        .long("image")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Product photo (png, jpg, jpeg, gif, webp)"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a product (requires login)")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .help("Product ID"),
                ),
        )
}

fn sales_cli() -> Command {
    Command::new("sales")
        .about("Record and review sales")
        .subcommand_required(true)
        .subcommand(
            Command::new("record")
                .about("Record a sale at the product's price")
                .arg(
                    Arg::new("product")
                        .long("product")
                        .value_name("ID")
                        .value_parser(value_parser!(i64))
                        .help("Product ID"),
                )
                .arg(
                    Arg::new("quantity")
                        .long("quantity")
                        .short('q')
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .help("Units sold"),
                ),
        )
        .subcommand(
            Command::new("recent").about("Show the latest sales").arg(
                Arg::new("limit")
                    .long("limit")
                    .short('n')
                    .value_parser(value_parser!(usize))
                    .default_value("10")
                    .help("Number of sales"),
            ),
        )
}

fn payments_cli() -> Command {
    Command::new("payments")
        .about("M-Pesa payment prompts")
        .subcommand_required(true)
        .subcommand(
            Command::new("prompt")
                .about("Send an STK push to the customer's phone")
                .arg(
                    Arg::new("phone")
                        .long("phone")
                        .value_name("MSISDN")
                        .help("Customer phone, e.g. +254712345678"),
                )
                .arg(
                    Arg::new("product")
                        .long("product")
                        .value_name("ID")
                        .value_parser(value_parser!(i64))
                        .help("Product ID"),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .value_name("KES")
                        .allow_negative_numbers(true)
                        .help("Amount to charge"),
                ),
        )
        .subcommand(Command::new("history").about("Prompts sent from this console"))
}

fn settings_cli() -> Command {
    Command::new("settings")
        .about("Shop profile and preferences")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("Show the admin profile"))
        .subcommand(
            Command::new("update")
                .about("Change admin profile fields")
                .arg(Arg::new("name").long("name").help("Admin name"))
                .arg(Arg::new("email").long("email").help("Contact email"))
                .arg(Arg::new("phone").long("phone").help("Contact phone"))
                .arg(Arg::new("shop-name").long("shop-name").help("Shop name"))
                .arg(Arg::new("location").long("location").help("Shop location")),
        )
        .subcommand(
            Command::new("theme").about("Show or change the colour theme").arg(
                Arg::new("choice")
                    .value_parser(["light", "dark", "toggle"])
                    .help("New theme"),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_sale_arguments() {
        let matches = build_cli()
            .try_get_matches_from(["milka", "sales", "record", "--product", "3", "-q", "-2"])
            .unwrap();
        let (_, sales) = matches.subcommand().unwrap();
        let (name, record) = sales.subcommand().unwrap();
        assert_eq!(name, "record");
        assert_eq!(record.get_one::<i64>("product"), Some(&3));
        assert_eq!(record.get_one::<i64>("quantity"), Some(&-2));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(["milka", "products", "list", "--json", "--api-url", "http://x"])
            .unwrap();
        assert!(matches.get_flag("json"));
        assert_eq!(
            matches.get_one::<String>("api-url").map(String::as_str),
            Some("http://x")
        );
        assert_eq!(output_mode(&matches), OutputMode::Json);
    }

    #[test]
    fn test_optional_form_fields_parse_empty() {
        let matches = build_cli()
            .try_get_matches_from(["milka", "products", "add", "--name", "Salt"])
            .unwrap();
        let (_, products) = matches.subcommand().unwrap();
        let (_, add) = products.subcommand().unwrap();
        assert!(add.get_one::<String>("brand").is_none());
        assert!(add.get_one::<i64>("quantity").is_none());
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        assert!(build_cli()
            .try_get_matches_from(["milka", "settings", "theme", "solarized"])
            .is_err());
    }
}
