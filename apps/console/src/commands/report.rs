//! # Dashboard & Reports
//!
//! ```text
//! dashboard  ─► GET /products ┐
//!               GET /reports/daily ┴► DashboardStats + per-product lines
//!
//! reports    ─► GET /sales ─► ReportOverview (totals, top N, trend)
//! ```
//!
//! The two dashboard requests run concurrently. A failed daily report still
//! shows the stock count, with zeros for today's figures.

use chrono::Local;
use milka_client::config::MAX_TREND_DAYS;
use milka_core::report::{DashboardStats, ReportOverview};
use milka_core::ValidationError;
use serde_json::json;
use tracing::warn;

use crate::commands::product::LOAD_PRODUCTS_FAILED;
use crate::commands::sale::load_sales;
use crate::error::{ConsoleError, ConsoleResult};
use crate::state::AppContext;
use crate::views::pages::{render_dashboard, render_report};

pub async fn dashboard(ctx: &AppContext) -> ConsoleResult<String> {
    let (products, report) = tokio::join!(ctx.api.list_products(), ctx.api.daily_report());

    let products = products.map_err(|e| ConsoleError::from_client(e, LOAD_PRODUCTS_FAILED))?;
    let report = match report {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(error = %e, "Daily report unavailable");
            None
        }
    };

    let stats = DashboardStats::from_report(report.as_ref(), &products);
    ctx.emit(&json!({ "stats": stats, "report": report }), |p| {
        render_dashboard(&stats, report.as_ref(), p)
    })
}

/// Checks `--top` and `--days`, falling back to the configured defaults.
pub fn report_window(
    ctx: &AppContext,
    top: Option<usize>,
    days: Option<u32>,
) -> ConsoleResult<(usize, u32)> {
    let top = top.unwrap_or(ctx.config.reports.top_n);
    if top == 0 {
        return Err(ValidationError::MustBePositive {
            field: "top".to_string(),
        }
        .into());
    }

    let days = days.unwrap_or(ctx.config.reports.trend_days);
    if days > MAX_TREND_DAYS {
        return Err(ValidationError::OutOfRange {
            field: "days".to_string(),
            min: 0,
            max: i64::from(MAX_TREND_DAYS),
        }
        .into());
    }

    Ok((top, days))
}

pub async fn overview(
    ctx: &AppContext,
    top: Option<usize>,
    days: Option<u32>,
) -> ConsoleResult<String> {
    let (top, days) = report_window(ctx, top, days)?;
    let sales = load_sales(ctx).await?;

    let today = Local::now().date_naive();
    let overview = ReportOverview::build(&sales, &Local, today, top, days);
    ctx.emit(&overview, |p| render_report(&overview, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OutputMode;
    use milka_client::{LocalStore, MilkaConfig};

    #[test]
    fn test_report_window_defaults_and_limits() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local_storage.json")).unwrap();
        let ctx = AppContext::with_store(MilkaConfig::default(), store, OutputMode::Plain).unwrap();

        assert_eq!(report_window(&ctx, None, None).unwrap(), (5, 7));
        assert_eq!(report_window(&ctx, Some(3), Some(31)).unwrap(), (3, 31));

        let err = report_window(&ctx, Some(0), None).unwrap_err();
        assert_eq!(err.message, "top must be positive");

        let err = report_window(&ctx, None, Some(32)).unwrap_err();
        assert_eq!(err.message, "days must be between 0 and 31");
    }
}
