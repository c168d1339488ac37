//! # Product Commands
//!
//! ## Add Product Workflow
//! ```text
//! products add --name "Sugar 2kg" --brand Kabras --category Food -q 40 --price 250
//!      │
//!      ▼
//! session valid? ──── no ───► "Please log in to continue" (exit 3)
//!      │
//!      ▼
//! ProductArgs::to_form()      required fields, price parses
//!      │
//!      ▼
//! flows::add_product()        validate → POST /products → GET /products
//!      │
//!      ▼
//! "Product added successfully!" + refreshed table
//! ```

use milka_client::flows::{self, ADD_PRODUCT_FAILED, DELETE_PRODUCT_FAILED};
use milka_core::catalog::{filter_products, suggest_names, SUGGESTION_LIMIT};
use milka_core::money::Money;
use milka_core::types::{NewProduct, Product};
use milka_core::validation::validate_required;
use milka_core::ValidationError;
use std::path::PathBuf;
use tracing::info;

use crate::error::{ConsoleError, ConsoleResult};
use crate::state::AppContext;
use crate::views::pages::{
    render_products, render_suggestions, LIST_NOT_REFRESHED, PRODUCT_ADDED, PRODUCT_DELETED,
};
use crate::views::Palette;

pub const LOAD_PRODUCTS_FAILED: &str = "Failed to load products. Please check your connection.";

/// The add-product form as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct ProductArgs {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<String>,
    pub image: Option<PathBuf>,
}

impl ProductArgs {
    /// Checks that every required field was given and the price parses.
    pub fn to_form(&self) -> ConsoleResult<NewProduct> {
        let name = self.name.clone().unwrap_or_default();
        let brand = self.brand.clone().unwrap_or_default();
        let category = self.category.clone().unwrap_or_default();
        validate_required("name", &name)?;
        validate_required("brand", &brand)?;
        validate_required("category", &category)?;

        let quantity = self.quantity.ok_or_else(|| ValidationError::Required {
            field: "quantity".to_string(),
        })?;
        let price = self.price.as_deref().ok_or_else(|| ValidationError::Required {
            field: "price_each".to_string(),
        })?;
        let price_each = Money::parse_decimal(price)?;

        Ok(NewProduct {
            name,
            brand,
            category,
            quantity,
            price_each,
            image_path: self.image.clone(),
        })
    }
}

/// Loads the product list, showing the connection hint on failure.
pub async fn load_products(ctx: &AppContext) -> ConsoleResult<Vec<Product>> {
    ctx.api
        .list_products()
        .await
        .map_err(|e| ConsoleError::from_client(e, LOAD_PRODUCTS_FAILED))
}

/// The success line plus the refreshed list, or a hint when the refresh failed.
fn confirmation(headline: &str, products: Option<&[Product]>, palette: &Palette) -> String {
    let body = match products {
        Some(products) => {
            let refs: Vec<&Product> = products.iter().collect();
            render_products(&refs, palette)
        }
        None => palette.warning(LIST_NOT_REFRESHED),
    };
    format!("{}\n\n{}", palette.success(headline), body)
}

pub async fn list(ctx: &AppContext, search: Option<&str>) -> ConsoleResult<String> {
    let products = load_products(ctx).await?;
    let shown: Vec<&Product> = match search {
        Some(term) => filter_products(&products, term),
        None => products.iter().collect(),
    };
    ctx.emit(&shown, |p| render_products(&shown, p))
}

pub fn suggest(ctx: &AppContext, text: &str) -> ConsoleResult<String> {
    let names = suggest_names(text, SUGGESTION_LIMIT);
    ctx.emit(&names, |p| render_suggestions(&names, p))
}

pub async fn add(ctx: &mut AppContext, args: &ProductArgs) -> ConsoleResult<String> {
    let session = ctx.require_admin()?;
    let form = args.to_form()?;

    let products = flows::add_product(&ctx.api, &form)
        .await
        .map_err(|e| ConsoleError::from_client(e, ADD_PRODUCT_FAILED))?;
    info!(by = %session.username, name = %form.name.trim(), "Product added from console");

    ctx.emit(&products, |p| confirmation(PRODUCT_ADDED, products.as_deref(), p))
}

pub async fn delete(ctx: &mut AppContext, id: i64) -> ConsoleResult<String> {
    let session = ctx.require_admin()?;

    let products = flows::delete_product(&ctx.api, id)
        .await
        .map_err(|e| ConsoleError::from_client(e, DELETE_PRODUCT_FAILED))?;
    info!(by = %session.username, product_id = id, "Product deleted from console");

    ctx.emit(&products, |p| confirmation(PRODUCT_DELETED, products.as_deref(), p))
}
