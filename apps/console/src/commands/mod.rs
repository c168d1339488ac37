//! # Console Commands
//!
//! Each command returns the text to print; [`dispatch`] routes parsed
//! arguments to them.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── auth.rs      ─► login, logout, whoami
//! ├── status.rs    ─► status
//! ├── product.rs   ─► products list | suggest | add | delete
//! ├── sale.rs      ─► sales record | recent
//! ├── payment.rs   ─► payments prompt | history
//! ├── report.rs    ─► dashboard, reports
//! └── settings.rs  ─► settings show | update | theme
//! ```
//!
//! ## Guarded Commands
//! `products add` and `products delete` resolve the stored session first.
//! Without one they fail with "Please log in to continue" and exit code 3
//! before any form value is looked at.

pub mod auth;
pub mod payment;
pub mod product;
pub mod report;
pub mod sale;
pub mod settings;
pub mod status;

use clap::ArgMatches;
use std::path::PathBuf;

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::AppContext;

fn text(args: &ArgMatches, id: &str) -> Option<String> {
    args.get_one::<String>(id).cloned()
}

fn unknown(command: &str) -> ConsoleError {
    ConsoleError::internal(format!("unknown command: {command}"))
}

/// Runs the subcommand selected in `matches`.
pub async fn dispatch(ctx: &mut AppContext, matches: &ArgMatches) -> ConsoleResult<String> {
    match matches.subcommand() {
        Some(("status", _)) => status::status(ctx).await,
        Some(("login", args)) => auth::login(
            ctx,
            &text(args, "username").unwrap_or_default(),
            &text(args, "password").unwrap_or_default(),
        ),
        Some(("logout", _)) => auth::logout(ctx),
        Some(("whoami", _)) => auth::whoami(ctx),
        Some(("dashboard", _)) => report::dashboard(ctx).await,
        Some(("products", sub)) => match sub.subcommand() {
            Some(("list", args)) => {
                product::list(ctx, args.get_one::<String>("search").map(String::as_str)).await
            }
            Some(("suggest", args)) => {
                product::suggest(ctx, args.get_one::<String>("text").map_or("", String::as_str))
            }
            Some(("add", args)) => {
                let form = product::ProductArgs {
                    name: text(args, "name"),
                    brand: text(args, "brand"),
                    category: text(args, "category"),
                    quantity: args.get_one::<i64>("quantity").copied(),
                    price: text(args, "price"),
                    image: args.get_one::<PathBuf>("image").cloned(),
                };
                product::add(ctx, &form).await
            }
            Some(("delete", args)) => {
                let id = args.get_one::<i64>("id").copied().unwrap_or_default();
                product::delete(ctx, id).await
            }
            _ => Err(unknown("products")),
        },
        Some(("sales", sub)) => match sub.subcommand() {
            Some(("record", args)) => {
                sale::record(
                    ctx,
                    args.get_one::<i64>("product").copied(),
                    args.get_one::<i64>("quantity").copied(),
                )
                .await
            }
            Some(("recent", args)) => {
                let limit = args
                    .get_one::<usize>("limit")
                    .copied()
                    .unwrap_or(milka_core::RECENT_SALES_LIMIT);
                sale::recent(ctx, limit).await
            }
            _ => Err(unknown("sales")),
        },
        Some(("payments", sub)) => match sub.subcommand() {
            Some(("prompt", args)) => {
                payment::prompt(
                    ctx,
                    &text(args, "phone").unwrap_or_default(),
                    args.get_one::<i64>("product").copied(),
                    args.get_one::<String>("amount").map(String::as_str),
                )
                .await
            }
            Some(("history", _)) => payment::history(ctx),
            _ => Err(unknown("payments")),
        },
        Some(("reports", args)) => {
            report::overview(
                ctx,
                args.get_one::<usize>("top").copied(),
                args.get_one::<u32>("days").copied(),
            )
            .await
        }
        Some(("settings", sub)) => match sub.subcommand() {
            Some(("show", _)) => settings::show(ctx).await,
            Some(("update", args)) => {
                let update = settings::ProfileUpdate {
                    name: text(args, "name"),
                    email: text(args, "email"),
                    phone: text(args, "phone"),
                    shop_name: text(args, "shop-name"),
                    location: text(args, "location"),
                };
                settings::update(ctx, &update).await
            }
            Some(("theme", args)) => {
                settings::theme(ctx, args.get_one::<String>("choice").map(String::as_str))
            }
            _ => Err(unknown("settings")),
        },
        Some((other, _)) => Err(unknown(other)),
        None => Err(unknown("(none)")),
    }
}
