//! # Report Aggregation
//!
//! Turns the flat list of sales returned by `GET /sales` into the summaries
//! shown on the Reports and Dashboard views.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Report Aggregation                              │
//! │                                                                         │
//! │   [Sale] ──┬──► compute_totals ──► SalesTotals { units, revenue }       │
//! │            ├──► top_products   ──► [ProductRank] (top-N by quantity)    │
//! │            ├──► trend_series   ──► [TrendPoint]  (one per day)          │
//! │            └──► recent_sales   ──► newest N records                     │
//! │                                                                         │
//! │   DailyReport + [Product] ──► DashboardStats / quantity_shares          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function is pure and tolerant of partial records: a missing
//! quantity or price counts as zero and a missing name as `"Unknown"`.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Add;

use crate::money::Money;
use crate::types::{DailyReport, Product, Sale};
use crate::UNKNOWN_PRODUCT;

// =============================================================================
// Totals
// =============================================================================

/// Units sold and revenue over a set of sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SalesTotals {
    pub units: i64,
    pub revenue: Money,
}

impl Add for SalesTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        SalesTotals {
            units: self.units + other.units,
            revenue: self.revenue + other.revenue,
        }
    }
}

/// Sums units and `quantity × unit price` across all sales.
///
/// Additive over concatenation: `compute_totals(a ++ b)` equals
/// `compute_totals(a) + compute_totals(b)`.
pub fn compute_totals(sales: &[Sale]) -> SalesTotals {
    sales.iter().fold(SalesTotals::default(), |acc, sale| SalesTotals {
        units: acc.units + sale.units(),
        revenue: acc.revenue + sale.total(),
    })
}

// =============================================================================
// Ranking
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRank {
    pub name: String,
    pub quantity: i64,
}

/// The `n` most sold products by summed quantity.
///
/// Groups by exact `product_name`. Equal quantities keep the order in which
/// the names first appeared.
pub fn top_products(sales: &[Sale], n: usize) -> Vec<ProductRank> {
    let mut ranks: Vec<ProductRank> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sale in sales {
        let name = sale.product_name.as_deref().unwrap_or(UNKNOWN_PRODUCT);
        match index.get(name) {
            Some(&i) => ranks[i].quantity += sale.units(),
            None => {
                index.insert(name, ranks.len());
                ranks.push(ProductRank {
                    name: name.to_string(),
                    quantity: sale.units(),
                });
            }
        }
    }

    // sort_by is stable
    ranks.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranks.truncate(n);
    ranks
}

/// Each item's quantity as a fraction of the leader's, for bar lengths.
pub fn leader_shares(ranks: &[ProductRank]) -> Vec<f64> {
    let leader = ranks.iter().map(|r| r.quantity).max().unwrap_or(0);
    ranks
        .iter()
        .map(|r| {
            if leader > 0 {
                r.quantity.max(0) as f64 / leader as f64
            } else {
                0.0
            }
        })
        .collect()
}

// =============================================================================
// Trend
// =============================================================================

/// One calendar day of the trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Short weekday name (`Mon`, `Tue`, ...).
    pub label: String,
    pub revenue: Money,
    pub units: i64,
    pub sales_count: usize,
}

/// Per-day revenue and volume for the `days` days ending at `today`.
///
/// Sale dates are bucketed by their calendar day in `tz`. Sales with no date
/// or outside the window are skipped. `days == 0` yields an empty series.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveDate, Utc};
/// use milka_core::report::trend_series;
///
/// let today = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
/// let trend = trend_series(&[], &Utc, today, 7);
/// assert_eq!(trend.len(), 7);
/// assert_eq!(trend[6].date, today);
/// assert_eq!(trend[6].label, "Tue");
/// ```
pub fn trend_series<Tz: TimeZone>(
    sales: &[Sale],
    tz: &Tz,
    today: NaiveDate,
    days: u32,
) -> Vec<TrendPoint> {
    if days == 0 {
        return Vec::new();
    }

    let start = today - Duration::days(i64::from(days) - 1);
    let mut points: Vec<TrendPoint> = (0..days)
        .map(|offset| {
            let date = start + Duration::days(i64::from(offset));
            TrendPoint {
                date,
                label: date.format("%a").to_string(),
                revenue: Money::zero(),
                units: 0,
                sales_count: 0,
            }
        })
        .collect();

    for sale in sales {
        let Some(date) = sale.sale_date.map(|dt| local_day(dt, tz)) else {
            continue;
        };
        if date < start || date > today {
            continue;
        }
        let slot = (date - start).num_days() as usize;
        let point = &mut points[slot];
        point.revenue += sale.total();
        point.units += sale.units();
        point.sales_count += 1;
    }

    points
}

fn local_day<Tz: TimeZone>(dt: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    dt.with_timezone(tz).date_naive()
}

// =============================================================================
// Recent Sales
// =============================================================================

/// The last `n` records, newest first.
pub fn recent_sales(sales: &[Sale], n: usize) -> Vec<Sale> {
    let skip = sales.len().saturating_sub(n);
    sales[skip..].iter().rev().cloned().collect()
}

// =============================================================================
// Overview
// =============================================================================

/// Everything the Reports view shows, computed in one pass over the inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOverview {
    pub totals: SalesTotals,
    pub top_products: Vec<ProductRank>,
    pub trend: Vec<TrendPoint>,
    pub sale_count: usize,
}

impl ReportOverview {
    pub fn build<Tz: TimeZone>(
        sales: &[Sale],
        tz: &Tz,
        today: NaiveDate,
        top_n: usize,
        days: u32,
    ) -> Self {
        ReportOverview {
            totals: compute_totals(sales),
            top_products: top_products(sales, top_n),
            trend: trend_series(sales, tz, today, days),
            sale_count: sales.len(),
        }
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// The three stat cards at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub units_sold_today: i64,
    pub revenue_today: Money,
    pub products_in_stock: usize,
}

impl DashboardStats {
    /// A missing report (the request failed) shows zeros.
    pub fn from_report(report: Option<&DailyReport>, products: &[Product]) -> Self {
        DashboardStats {
            units_sold_today: report.map_or(0, |r| r.summary.total_quantity_sold),
            revenue_today: report.map_or(Money::zero(), |r| r.summary.total_sales_amount),
            products_in_stock: products.len(),
        }
    }
}

/// Each product's share of today's units, for the distribution chart.
///
/// Shares sum to 1.0 unless nothing was sold, in which case all are zero.
pub fn quantity_shares(report: &DailyReport) -> Vec<(String, f64)> {
    let total: i64 = report
        .products
        .iter()
        .map(|line| line.total_quantity_sold.max(0))
        .sum();

    report
        .products
        .iter()
        .map(|line| {
            let name = line
                .product_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
            let share = if total > 0 {
                line.total_quantity_sold.max(0) as f64 / total as f64
            } else {
                0.0
            };
            (name, share)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductReportLine, ReportSummary};
    use chrono::FixedOffset;

    fn sale(name: Option<&str>, qty: Option<i64>, price_cents: Option<i64>) -> Sale {
        Sale {
            id: 0,
            product_id: None,
            product_name: name.map(str::to_string),
            quantity_sold: qty,
            price_per_unit: price_cents.map(Money::from_cents),
            sale_date: None,
        }
    }

    fn dated(qty: i64, price_cents: i64, rfc3339: &str) -> Sale {
        Sale {
            sale_date: Some(
                DateTime::parse_from_rfc3339(rfc3339)
                    .unwrap()
                    .with_timezone(&Utc),
            ),
            ..sale(Some("Bread"), Some(qty), Some(price_cents))
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_totals_empty() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.units, 0);
        assert_eq!(totals.revenue, Money::zero());
    }

    #[test]
    fn test_totals_are_additive() {
        let a = vec![sale(Some("Milk"), Some(2), Some(6500)), sale(None, None, Some(100))];
        let b = vec![sale(Some("Bread"), Some(3), Some(5500))];
        let joined: Vec<Sale> = a.iter().chain(b.iter()).cloned().collect();

        assert_eq!(compute_totals(&joined), compute_totals(&a) + compute_totals(&b));
        assert_eq!(compute_totals(&joined).units, 5);
        assert_eq!(compute_totals(&joined).revenue.cents(), 2 * 6500 + 3 * 5500);
    }

    #[test]
    fn test_top_products_groups_and_sorts() {
        let sales = vec![
            sale(Some("Milk"), Some(2), None),
            sale(Some("Bread"), Some(5), None),
            sale(Some("milk"), Some(1), None),
            sale(None, Some(4), None),
            sale(Some("Milk"), Some(3), None),
        ];
        let top = top_products(&sales, 5);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        // Milk=5 and Bread=5 tie; Milk appeared first.
        assert_eq!(names, vec!["Milk", "Bread", "Unknown", "milk"]);
        assert!(top.windows(2).all(|w| w[0].quantity >= w[1].quantity));
    }

    #[test]
    fn test_top_products_truncates() {
        let sales: Vec<Sale> = (0..8)
            .map(|i| sale(Some(&format!("P{i}")), Some(i), None))
            .collect();
        let top = top_products(&sales, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].name, "P7");
        assert!(top_products(&sales, 0).is_empty());
        assert_eq!(top_products(&sales[..2], 5).len(), 2);
    }

    #[test]
    fn test_leader_shares() {
        let ranks = vec![
            ProductRank { name: "A".into(), quantity: 10 },
            ProductRank { name: "B".into(), quantity: 5 },
        ];
        assert_eq!(leader_shares(&ranks), vec![1.0, 0.5]);
        assert!(leader_shares(&[]).is_empty());
    }

    #[test]
    fn test_trend_buckets_by_local_day() {
        let today = day(2025, 10, 14);
        let sales = vec![
            dated(2, 1000, "2025-10-14T09:00:00Z"),
            dated(1, 500, "2025-10-13T12:00:00Z"),
            // 22:30 UTC on the 13th is the 14th in Nairobi (UTC+3)
            dated(3, 100, "2025-10-13T22:30:00Z"),
            // outside the window
            dated(9, 100, "2025-10-01T10:00:00Z"),
            sale(Some("Undated"), Some(4), Some(100)),
        ];
        let nairobi = FixedOffset::east_opt(3 * 3600).unwrap();
        let trend = trend_series(&sales, &nairobi, today, 7);

        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, day(2025, 10, 8));
        let last = &trend[6];
        assert_eq!(last.units, 5);
        assert_eq!(last.sales_count, 2);
        assert_eq!(last.revenue.cents(), 2000 + 300);
        assert_eq!(trend[5].units, 1);
        assert_eq!(trend.iter().map(|p| p.units).sum::<i64>(), 6);
    }

    #[test]
    fn test_trend_zero_days() {
        assert!(trend_series(&[], &Utc, day(2025, 1, 1), 0).is_empty());
    }

    #[test]
    fn test_recent_sales_newest_first() {
        let sales: Vec<Sale> = (1..=12)
            .map(|i| Sale { id: i, ..sale(None, None, None) })
            .collect();
        let recent = recent_sales(&sales, 10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].id, 12);
        assert_eq!(recent[9].id, 3);
        assert_eq!(recent_sales(&sales[..2], 10).len(), 2);
    }

    #[test]
    fn test_overview_build() {
        let sales = vec![dated(2, 1000, "2025-10-14T09:00:00Z")];
        let overview = ReportOverview::build(&sales, &Utc, day(2025, 10, 14), 5, 7);
        assert_eq!(overview.sale_count, 1);
        assert_eq!(overview.totals.units, 2);
        assert_eq!(overview.top_products[0].name, "Bread");
        assert_eq!(overview.trend.len(), 7);
    }

    #[test]
    fn test_dashboard_stats_and_shares() {
        let report = DailyReport {
            date: Some("2025-10-14".to_string()),
            summary: ReportSummary {
                total_quantity_sold: 4,
                total_sales_amount: Money::from_cents(40_000),
                products_count: Some(2),
            },
            products: vec![
                ProductReportLine {
                    product_name: Some("Milk".to_string()),
                    total_quantity_sold: 3,
                    ..Default::default()
                },
                ProductReportLine {
                    total_quantity_sold: 1,
                    ..Default::default()
                },
            ],
        };

        let stats = DashboardStats::from_report(Some(&report), &[]);
        assert_eq!(stats.units_sold_today, 4);
        assert_eq!(stats.revenue_today.cents(), 40_000);
        assert_eq!(stats.products_in_stock, 0);

        let shares = quantity_shares(&report);
        assert_eq!(shares[0], ("Milk".to_string(), 0.75));
        assert_eq!(shares[1], ("Unknown".to_string(), 0.25));

        assert_eq!(DashboardStats::from_report(None, &[]), DashboardStats::default());
    }
}
