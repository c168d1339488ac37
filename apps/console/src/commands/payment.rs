//! M-Pesa STK push prompts and the local log of them.

use chrono::Local;
use milka_client::flows::{self, PaymentForm, PAYMENT_FAILED};
use milka_core::money::Money;
use milka_core::validation::validate_msisdn;

use crate::commands::product::load_products;
use crate::error::{ConsoleError, ConsoleResult};
use crate::state::AppContext;
use crate::views::pages::{render_payment_history, render_payment_sent};

pub const LOAD_PRODUCTS_FOR_PAYMENT_FAILED: &str =
    "Failed to fetch products. Please check your connection.";

pub async fn prompt(
    ctx: &mut AppContext,
    phone: &str,
    product_id: Option<i64>,
    amount: Option<&str>,
) -> ConsoleResult<String> {
    // every local check runs before the first request, phone first
    validate_msisdn(phone)?;
    let amount = amount.map(Money::parse_decimal).transpose()?;
    let form = PaymentForm {
        phone: phone.to_string(),
        product_id,
        amount,
    };
    form
        .validate()
        .map_err(|e| ConsoleError::from_client(e, PAYMENT_FAILED))?;

    let products = load_products(ctx)
        .await
        .map_err(|e| ConsoleError::new(e.code, LOAD_PRODUCTS_FOR_PAYMENT_FAILED))?;

    let outcome = flows::initiate_payment(&ctx.api, &mut ctx.store, &products, &form)
        .await
        .map_err(|e| ConsoleError::from_client(e, PAYMENT_FAILED))?;

    ctx.emit(&outcome.record, |p| render_payment_sent(&outcome, p))
}

pub fn history(ctx: &AppContext) -> ConsoleResult<String> {
    let records = ctx.store.payment_history()?;
    ctx.emit(&records, |p| render_payment_history(&records, &Local, p))
}
