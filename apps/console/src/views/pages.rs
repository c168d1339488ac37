//! # Page Renderers
//!
//! One function per page of the admin UI. Timestamps are shown in the zone
//! passed in by the caller (local time in the binary, UTC in tests).

use chrono::{DateTime, TimeZone, Utc};
use milka_client::{PaymentOutcome, SaleOutcome};
use milka_core::money::Money;
use milka_core::report::{leader_shares, quantity_shares, DashboardStats, ReportOverview};
use milka_core::session::{DenyReason, GuardState};
use milka_core::types::{
    AdminProfile, DailyReport, PaymentRecord, PaymentStatus, Product, Sale, Theme,
};
use milka_core::UNKNOWN_PRODUCT;
use std::fmt::Display;

use super::{bar, stat_cards, Align, Palette, RowStyle, Table, BAR_WIDTH};

pub const PRODUCT_ADDED: &str = "Product added successfully!";
pub const PRODUCT_DELETED: &str = "Product deleted successfully!";
pub const PAYMENT_SENT: &str =
    "M-Pesa STK push sent! Please check your phone to complete the payment.";
pub const SETTINGS_SAVED: &str = "Settings saved successfully!";
/// Shown in place of a table when the re-fetch after a saved change failed.
pub const LIST_NOT_REFRESHED: &str = "The change was saved, but the latest data could not be loaded.";
pub const PAYMENT_NOT_LOGGED: &str =
    "The prompt was sent, but it could not be added to the local payment history.";

fn timestamp<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%b %d, %Y %I:%M %p").to_string()
}

// =============================================================================
// Status & Session
// =============================================================================

pub fn render_status(base_url: &str, message: &str, palette: &Palette) -> String {
    let message = if message.trim().is_empty() {
        "(no message)"
    } else {
        message
    };
    format!(
        "{} {}\n{}",
        palette.success("●"),
        palette.heading(base_url),
        message
    )
}

pub fn render_welcome(username: &str, palette: &Palette) -> String {
    palette.success(&format!("Welcome, {username}!"))
}

pub fn render_session<Tz: TimeZone>(state: &GuardState, tz: &Tz, palette: &Palette) -> String
where
    Tz::Offset: Display,
{
    match state {
        GuardState::Authenticated(session) => {
            let since = session
                .login_time
                .as_ref()
                .map(|at| timestamp(at, tz))
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{} {} ({})\nLogged in since {}",
                palette.success("●"),
                palette.heading(&session.username),
                session.role,
                since
            )
        }
        GuardState::Unauthenticated(reason) => {
            let detail = match reason {
                DenyReason::Missing | DenyReason::LoggedOut => "Not logged in",
                DenyReason::Malformed => "Not logged in (stored session is unreadable)",
                DenyReason::Expired => "Not logged in (session expired)",
            };
            format!("{} {}", palette.muted("○"), detail)
        }
        GuardState::Unknown => palette.muted("Loading..."),
    }
}

// =============================================================================
// Dashboard
// =============================================================================

pub fn render_dashboard(
    stats: &DashboardStats,
    report: Option<&DailyReport>,
    palette: &Palette,
) -> String {
    let mut out = vec![
        palette.heading("Dashboard"),
        stat_cards(
            &[
                ("Units Sold Today", stats.units_sold_today.to_string()),
                ("Revenue Today", stats.revenue_today.to_string()),
                ("Products In Stock", stats.products_in_stock.to_string()),
            ],
            palette,
        ),
    ];

    match report {
        None => out.push(palette.warning("Daily report unavailable.")),
        Some(report) if report.products.is_empty() => {
            out.push(palette.muted("No sales recorded today."));
        }
        Some(report) => {
            let title = match &report.date {
                Some(date) => format!("Today's Sales ({date})"),
                None => "Today's Sales".to_string(),
            };
            out.push(String::new());
            out.push(palette.heading(&title));

            let mut table = Table::new(&[
                ("Product", Align::Left),
                ("Units", Align::Right),
                ("Sales", Align::Right),
                ("Amount", Align::Right),
                ("Share", Align::Left),
            ]);
            for (line, (_, share)) in report.products.iter().zip(quantity_shares(report)) {
                table.row(vec![
                    line.product_name
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
                    line.total_quantity_sold.to_string(),
                    line.number_of_sales
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    line.total_sales_amount.to_string(),
                    palette.accent(&bar(share, BAR_WIDTH / 2)),
                ]);
            }
            out.push(table.render(palette));
        }
    }

    out.join("\n")
}

// =============================================================================
// Products
// =============================================================================

pub fn render_products(products: &[&Product], palette: &Palette) -> String {
    if products.is_empty() {
        return palette.muted("No products found.");
    }

    let mut table = Table::new(&[
        ("ID", Align::Right),
        ("Name", Align::Left),
        ("Brand", Align::Left),
        ("Category", Align::Left),
        ("Qty", Align::Right),
        ("Price", Align::Right),
        ("Stock Value", Align::Right),
    ]);

    let mut low = 0;
    for product in products {
        let cells = vec![
            product.id.to_string(),
            product.name.clone(),
            product.brand.clone(),
            product.category.clone(),
            product.quantity.to_string(),
            product.price_each.to_string(),
            product.stock_value().to_string(),
        ];
        if product.is_low_stock() {
            low += 1;
            table.styled_row(cells, RowStyle::Warning);
        } else {
            table.row(cells);
        }
    }

    let total: Money = products.iter().map(|p| p.stock_value()).sum();
    let mut out = vec![
        table.render(palette),
        String::new(),
        format!("{} products, stock value {}", products.len(), total),
    ];
    if low > 0 {
        out.push(palette.warning(&format!("{low} low on stock")));
    }
    out.join("\n")
}

pub fn render_suggestions(names: &[&str], palette: &Palette) -> String {
    if names.is_empty() {
        return palette.muted("No suggestions.");
    }
    names.join("\n")
}

// =============================================================================
// Sales
// =============================================================================

pub fn render_sales<Tz: TimeZone>(sales: &[Sale], tz: &Tz, palette: &Palette) -> String
where
    Tz::Offset: Display,
{
    if sales.is_empty() {
        return palette.muted("No sales recorded yet.");
    }

    let mut table = Table::new(&[
        ("Date", Align::Left),
        ("Product", Align::Left),
        ("Qty", Align::Right),
        ("Unit Price", Align::Right),
        ("Total", Align::Right),
    ]);
    for sale in sales {
        table.row(vec![
            sale.sale_date
                .as_ref()
                .map(|at| timestamp(at, tz))
                .unwrap_or_else(|| "-".to_string()),
            sale.product_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            sale.units().to_string(),
            sale.price_per_unit.unwrap_or_default().to_string(),
            sale.total().to_string(),
        ]);
    }
    table.render(palette)
}

pub fn render_sale_recorded<Tz: TimeZone>(
    outcome: &SaleOutcome,
    tz: &Tz,
    palette: &Palette,
) -> String
where
    Tz::Offset: Display,
{
    let headline = palette.success(&format!(
        "Sale recorded successfully! Total: {}",
        outcome.total
    ));
    match &outcome.recent {
        Some(recent) => format!(
            "{}\n\n{}\n{}",
            headline,
            palette.heading("Recent Sales"),
            render_sales(recent, tz, palette)
        ),
        None => format!("{}\n\n{}", headline, palette.warning(LIST_NOT_REFRESHED)),
    }
}

// =============================================================================
// Payments
// =============================================================================

pub fn render_payment_sent(outcome: &PaymentOutcome, palette: &Palette) -> String {
    let headline = if outcome.prompt.is_accepted() {
        palette.success(PAYMENT_SENT)
    } else {
        let reason = outcome
            .prompt
            .response_description
            .as_deref()
            .unwrap_or("no reason given");
        palette.warning(&format!("M-Pesa did not accept the request: {reason}"))
    };
    let mut out = vec![headline];
    if let Some(message) = &outcome.prompt.customer_message {
        out.push(message.clone());
    }
    if let Some(id) = &outcome.prompt.checkout_request_id {
        out.push(palette.muted(&format!("Checkout request: {id}")));
    }
    if !outcome.logged {
        out.push(palette.warning(PAYMENT_NOT_LOGGED));
    }
    out.join("\n")
}

pub fn render_payment_history<Tz: TimeZone>(
    records: &[PaymentRecord],
    tz: &Tz,
    palette: &Palette,
) -> String
where
    Tz::Offset: Display,
{
    if records.is_empty() {
        return palette.muted("No payments initiated from this console.");
    }

    let mut table = Table::new(&[
        ("Requested", Align::Left),
        ("Phone", Align::Left),
        ("Product", Align::Left),
        ("Amount", Align::Right),
        ("Status", Align::Left),
    ]);
    for record in records {
        let style = match record.status {
            PaymentStatus::Paid => RowStyle::Success,
            PaymentStatus::Pending => RowStyle::Normal,
            PaymentStatus::Failed => RowStyle::Danger,
        };
        table.styled_row(
            vec![
                timestamp(&record.requested_at, tz),
                record.phone.clone(),
                record.product.clone(),
                record.amount.to_string(),
                record.status.to_string(),
            ],
            style,
        );
    }
    table.render(palette)
}

// =============================================================================
// Reports
// =============================================================================

pub fn render_report(overview: &ReportOverview, palette: &Palette) -> String {
    let mut out = vec![
        palette.heading("Reports"),
        stat_cards(
            &[
                ("Total Revenue", overview.totals.revenue.to_string()),
                ("Units Sold", overview.totals.units.to_string()),
                ("Sales", overview.sale_count.to_string()),
            ],
            palette,
        ),
        String::new(),
        palette.heading("Top Products"),
    ];

    if overview.top_products.is_empty() {
        out.push(palette.muted("No sales recorded yet."));
    } else {
        let mut table = Table::new(&[
            ("#", Align::Right),
            ("Product", Align::Left),
            ("Units", Align::Right),
            ("", Align::Left),
        ]);
        let shares = leader_shares(&overview.top_products);
        for (i, (rank, share)) in overview.top_products.iter().zip(shares).enumerate() {
            table.row(vec![
                (i + 1).to_string(),
                rank.name.clone(),
                rank.quantity.to_string(),
                palette.accent(&bar(share, BAR_WIDTH)),
            ]);
        }
        out.push(table.render(palette));
    }

    if !overview.trend.is_empty() {
        out.push(String::new());
        out.push(palette.heading(&format!("Last {} Days", overview.trend.len())));

        let peak = overview
            .trend
            .iter()
            .map(|p| p.revenue.cents())
            .max()
            .unwrap_or(0);
        let mut table = Table::new(&[
            ("Day", Align::Left),
            ("Date", Align::Left),
            ("Sales", Align::Right),
            ("Units", Align::Right),
            ("Revenue", Align::Right),
            ("", Align::Left),
        ]);
        for point in &overview.trend {
            let share = if peak > 0 {
                point.revenue.cents().max(0) as f64 / peak as f64
            } else {
                0.0
            };
            table.row(vec![
                point.label.clone(),
                point.date.format("%d/%m").to_string(),
                point.sales_count.to_string(),
                point.units.to_string(),
                point.revenue.to_string(),
                palette.accent(&bar(share, BAR_WIDTH)),
            ]);
        }
        out.push(table.render(palette));
    }

    out.join("\n")
}

// =============================================================================
// Settings
// =============================================================================

pub fn render_profile(profile: &AdminProfile, theme: Theme, palette: &Palette) -> String {
    let mut table = Table::new(&[("Setting", Align::Left), ("Value", Align::Left)]);
    table
        .row(vec!["Name".into(), profile.name.clone()])
        .row(vec!["Email".into(), profile.email.clone()])
        .row(vec!["Phone".into(), profile.phone.clone()])
        .row(vec!["Shop Name".into(), profile.shop_name.clone()])
        .row(vec!["Location".into(), profile.location.clone()])
        .row(vec!["Theme".into(), theme.to_string()]);
    table.render(palette)
}

pub fn render_theme(theme: Theme, palette: &Palette) -> String {
    format!("Theme: {}", palette.accent(theme.as_str()))
}
