use chrono::Local;
use milka_client::flows::{self, RECORD_SALE_FAILED};
use milka_core::report::recent_sales;
use milka_core::types::Sale;
use serde_json::json;

use crate::commands::product::load_products;
use crate::error::{ConsoleError, ConsoleResult};
use crate::state::AppContext;
use crate::views::pages::{render_sale_recorded, render_sales};

pub const LOAD_SALES_FAILED: &str = "Failed to load sales data.";

pub async fn load_sales(ctx: &AppContext) -> ConsoleResult<Vec<Sale>> {
    ctx.api
        .list_sales()
        .await
        .map_err(|e| ConsoleError::from_client(e, LOAD_SALES_FAILED))
}

/// Records a sale at the product's listed price.
///
/// A missing quantity is treated as zero and rejected like any other
/// non-positive quantity.
pub async fn record(
    ctx: &AppContext,
    product_id: Option<i64>,
    quantity: Option<i64>,
) -> ConsoleResult<String> {
    let products = load_products(ctx).await?;

    let outcome = flows::record_sale(&ctx.api, &products, product_id, quantity.unwrap_or(0))
        .await
        .map_err(|e| ConsoleError::from_client(e, RECORD_SALE_FAILED))?;

    let data = json!({
        "total": outcome.total,
        "receipt": outcome.receipt,
        "recent": outcome.recent,
    });
    ctx.emit(&data, |p| render_sale_recorded(&outcome, &Local, p))
}

/// The newest `limit` sales.
pub async fn recent(ctx: &AppContext, limit: usize) -> ConsoleResult<String> {
    let sales = load_sales(ctx).await?;
    let recent = recent_sales(&sales, limit);
    ctx.emit(&recent, |p| render_sales(&recent, &Local, p))
}
