//! # Money Module
//!
//! Provides the `Money` type for handling Kenyan shilling amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The shop API speaks JSON numbers (`"price_each": 55.5`). Summing       │
//! │  those as floats drifts: 0.1 + 0.2 = 0.30000000000000004.               │
//! │                                                                         │
//! │  Every amount is converted ONCE at the wire boundary into cents         │
//! │  (1/100 KES) and all arithmetic after that is exact integer math.       │
//! │                                                                         │
//! │   JSON 55.5 ──► Money(5550) ──► × qty ──► Σ ──► "KES 1,234.50"          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use milka_core::money::Money;
//!
//! let price = Money::from_cents(5550); // KES 55.50
//! let line = price * 3;                // KES 166.50
//! assert_eq!(line.to_string(), "KES 166.50");
//!
//! let typed = Money::parse_decimal("1,234.5").unwrap();
//! assert_eq!(typed.cents(), 123_450);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::{CoreError, CoreResult};

/// Currency label shown in front of every formatted amount.
pub const CURRENCY: &str = "KES";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (1/100 KES).
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price_each ──┬──► Sale.price_per_unit ──► Sale.total()         │
/// │                       │                                                 │
/// │                       └──► Product.stock_value()                        │
/// │                                                                         │
/// │  SalesTotals.revenue ──► Reports / Dashboard cards                      │
/// │  PaymentRequest.amount ──► M-Pesa prompt                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use milka_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // KES 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a wire value (a JSON number in shillings) to cents.
    ///
    /// Rounds half away from zero. NaN and infinities are rejected.
    ///
    /// ## Example
    /// ```rust
    /// use milka_core::money::Money;
    ///
    /// assert_eq!(Money::try_from_decimal(12.5).unwrap().cents(), 1250);
    /// assert!(Money::try_from_decimal(f64::NAN).is_err());
    /// ```
    pub fn try_from_decimal(value: f64) -> CoreResult<Self> {
        if !value.is_finite() {
            return Err(CoreError::InvalidAmount {
                reason: format!("{value} is not a finite number"),
            });
        }
        let cents = (value * 100.0).round();
        if cents > i64::MAX as f64 || cents < i64::MIN as f64 {
            return Err(CoreError::InvalidAmount {
                reason: format!("{value} is too large"),
            });
        }
        Ok(Money(cents as i64))
    }

    /// Parses an amount typed by the operator.
    ///
    /// Accepts `12`, `1234.5`, `1,234.50` and a leading `-`. At most two
    /// fraction digits.
    pub fn parse_decimal(input: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidAmount {
            reason: format!("'{}' {}", input.trim(), reason),
        };

        let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
        let (negative, body) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };

        let (whole, frac) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("is not a number"));
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must have at most two decimal places"));
        }
        if body.ends_with('.') {
            return Err(invalid("is not a number"));
        }

        let major: i64 = whole.parse().map_err(|_| invalid("is too large"))?;
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("is not a number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("is not a number"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-shilling portion.
    #[inline]
    pub const fn shillings(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount in shillings as a float, for the wire only.
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use milka_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(5000); // KES 50.00
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 15_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Plain decimal form without currency or separators: `1234.50`.
    ///
    /// Used for multipart form fields where the API expects a bare number.
    pub fn to_plain_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.shillings().abs(), self.cents_part())
    }
}

// =============================================================================
// Formatting
// =============================================================================

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats an optional wire amount for display.
///
/// ## Example
/// ```rust
/// use milka_core::money::format_currency;
///
/// assert_eq!(format_currency(Some(1234.5)), "KES 1,234.50");
/// assert_eq!(format_currency(None), "KES 0.00");
/// ```
pub fn format_currency(amount: Option<f64>) -> String {
    amount
        .and_then(|value| Money::try_from_decimal(value).ok())
        .unwrap_or_default()
        .to_string()
}

/// `KES 1,234.50`, with `-KES 5.50` for negatives.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{} {}.{:02}",
            sign,
            CURRENCY,
            group_thousands(self.shillings().abs()),
            self.cents_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates: wire amounts are server-controlled and a sum of
// absurd values must not panic.

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serialises as a JSON number in shillings (`12.5`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.cents_part() == 0 {
            serializer.serialize_i64(self.shillings())
        } else {
            serializer.serialize_f64(self.as_decimal())
        }
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount in shillings as a JSON number")
    }

    /// `null` reads as zero, like a missing field.
    fn visit_unit<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::zero())
    }

    fn visit_none<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::zero())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom("amount is too large"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money)
            .ok_or_else(|| E::custom("amount is too large"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::try_from_decimal(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
