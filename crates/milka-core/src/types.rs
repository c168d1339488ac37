//! # Domain Types
//!
//! Entities exchanged with the shop API, plus the few values the console
//! keeps locally (payment log, admin profile, theme).
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Milka Shop Entities                             │
//! │                                                                         │
//! │  Server-owned (JSON, snake_case)         Console-owned                  │
//! │  ├── Product ◄── NewProduct (form)       ├── PaymentRecord (local log)  │
//! │  ├── Sale    ◄── NewSale    (form)       ├── Theme                      │
//! │  ├── SaleReceipt                         └── Session (see session.rs)   │
//! │  ├── DailyReport                                                        │
//! │  ├── PaymentRequest ──► PaymentPrompt                                   │
//! │  └── AdminProfile                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The server owns every entity. The console holds short-lived copies and
//! re-fetches after each mutation rather than patching them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Product
// =============================================================================

/// A product in the shop's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    /// Units in stock. The server keeps this at or above zero.
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub price_each: Money,

    /// Relative path of the uploaded image on the API host.
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Checks whether `quantity` units can be taken from current stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && quantity <= self.quantity
    }

    /// Value of everything on the shelf (`price_each × quantity`).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price_each.multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }
}

/// The add-product form.
///
/// `image_path` points at a local file that is uploaded with the multipart
/// body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub quantity: i64,
    pub price_each: Money,
    pub image_path: Option<PathBuf>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
///
/// Every field but `id` is optional: older records from the API miss some of
/// them and the reports treat a missing value as zero or `"Unknown"`.
/// Field aliases cover the backend's own column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,

    #[serde(default)]
    pub product_id: Option<i64>,

    #[serde(default)]
    pub product_name: Option<String>,

    #[serde(default, alias = "quantity")]
    pub quantity_sold: Option<i64>,

    #[serde(default, alias = "price_each")]
    pub price_per_unit: Option<Money>,

    #[serde(
        default,
        alias = "sold_at",
        alias = "timestamp",
        deserialize_with = "deserialize_sale_date"
    )]
    pub sale_date: Option<DateTime<Utc>>,
}

impl Sale {
    /// `quantity_sold × price_per_unit`, missing values counting as zero.
    pub fn total(&self) -> Money {
        self.price_per_unit
            .unwrap_or_default()
            .multiply_quantity(self.quantity_sold.unwrap_or(0))
    }

    #[inline]
    pub fn units(&self) -> i64 {
        self.quantity_sold.unwrap_or(0)
    }
}

/// Reads `null` as the field's default, the same as a missing key.
///
/// One sloppy record must not fail a whole list response.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses the timestamp formats the API has been seen to emit.
///
/// RFC 3339, RFC 2822 (the Flask default: `Tue, 14 Oct 2025 10:00:00 GMT`) and
/// `YYYY-MM-DD HH:MM:SS` taken as UTC.
pub fn parse_sale_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Unreadable dates, including non-string values, become `None`.
fn deserialize_sale_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(raw)) => parse_sale_date(&raw),
        _ => None,
    })
}

/// Body of `POST /sales`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub product_id: i64,
    pub quantity_sold: i64,
    pub price_per_unit: Money,
}

impl NewSale {
    #[inline]
    pub fn total(&self) -> Money {
        self.price_per_unit.multiply_quantity(self.quantity_sold)
    }
}

/// Response of `POST /sales`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaleReceipt {
    #[serde(default)]
    pub total_amount: Option<Money>,

    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Daily Report
// =============================================================================

/// `GET /reports/daily`: today's sales, pre-aggregated by the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyReport {
    /// `YYYY-MM-DD` in the server's local time.
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub summary: ReportSummary,

    #[serde(default)]
    pub products: Vec<ProductReportLine>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_quantity_sold: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_sales_amount: Money,

    #[serde(default)]
    pub products_count: Option<i64>,
}

/// One product's share of the day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductReportLine {
    #[serde(default)]
    pub product_id: Option<i64>,

    #[serde(default)]
    pub product_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_quantity_sold: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total_sales_amount: Money,

    #[serde(default)]
    pub number_of_sales: Option<i64>,
}

// =============================================================================
// Payments
// =============================================================================

/// Body of `POST /mpesa/prompt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub phone_number: String,
    pub amount: Money,
    pub product_id: i64,
}

/// The STK push acknowledgement returned by `POST /mpesa/prompt`.
///
/// Field names follow the M-Pesa API's PascalCase spelling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentPrompt {
    #[serde(rename = "ResponseCode", default)]
    pub response_code: Option<String>,

    #[serde(rename = "ResponseDescription", default)]
    pub response_description: Option<String>,

    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: Option<String>,

    #[serde(rename = "CheckoutRequestID", default)]
    pub checkout_request_id: Option<String>,

    #[serde(rename = "CustomerMessage", default)]
    pub customer_message: Option<String>,
}

impl PaymentPrompt {
    /// M-Pesa reports success with response code `"0"`. A missing code counts
    /// as accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self.response_code.as_deref(), Some("0") | None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// An entry in the console's local payment log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub phone: String,
    pub product: String,
    pub amount: Money,
    #[serde(default)]
    pub status: PaymentStatus,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_request_id: Option<String>,
}

// =============================================================================
// Admin Profile & Theme
// =============================================================================

/// The editable shop/admin profile behind `GET/PUT /admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shop_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
}

impl Default for AdminProfile {
    fn default() -> Self {
        Self {
            name: "Admin User".to_string(),
            email: "admin@milkashop.com".to_string(),
            phone: "+254712345678".to_string(),
            shop_name: "Milka Shop Juja".to_string(),
            location: "Juja, Kiambu".to_string(),
        }
    }
}

/// Colour theme persisted under the `theme` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(ValidationError::NotAllowed {
                field: "theme".to_string(),
                allowed: vec!["light".to_string(), "dark".to_string()],
            }),
        }
    }
}
