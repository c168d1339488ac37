//! # Validation Module
//!
//! Form checks that run before any request is sent.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Validation Happens                           │
//! │                                                                         │
//! │  Console flags ──► milka-core validation ──► milka-client request       │
//! │                         │                                               │
//! │                         └── Err ──► message printed, ZERO requests sent │
//! │                                                                         │
//! │  The server validates again; these checks only keep obviously bad      │
//! │  submissions off the network.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use milka_core::validation::validate_msisdn;
//!
//! assert_eq!(validate_msisdn("+254 712 345 678").unwrap(), "+254712345678");
//! assert!(validate_msisdn("+254812345678").is_err());
//! ```

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{NewProduct, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Image extensions the API accepts for product uploads.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Shown when a phone number fails the MSISDN check.
pub const MSISDN_HINT: &str = "Please enter a valid M-Pesa phone number (e.g., +254712345678)";

/// `+254` or `0`, then a Safaricom/Airtel prefix digit (`7` or `1`), then 8 digits.
static MSISDN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+254|0)[17][0-9]{8}$").unwrap_or_else(|e| panic!("invalid MSISDN pattern: {e}"))
});

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a field is non-empty after trimming and returns the trimmed value.
///
/// ## Example
/// ```rust
/// use milka_core::validation::validate_required;
///
/// assert_eq!(validate_required("brand", "  Brookside ").unwrap(), "Brookside");
/// assert!(validate_required("brand", "   ").is_err());
/// ```
pub fn validate_required<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Validates an M-Pesa phone number and returns it with whitespace removed.
///
/// ## Rules
/// - `+254` or `0` prefix
/// - first subscriber digit `7` or `1`
/// - 9 trailing digits in total
pub fn validate_msisdn(phone: &str) -> ValidationResult<String> {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() {
        return Err(ValidationError::Required {
            field: "phone_number".to_string(),
        });
    }

    if !MSISDN_PATTERN.is_match(&compact) {
        return Err(ValidationError::InvalidFormat {
            field: "phone_number".to_string(),
            reason: MSISDN_HINT.to_string(),
        });
    }

    Ok(compact)
}

/// Checks the extension of an image chosen for upload.
pub fn validate_image_path(path: &Path) -> ValidationResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ValidationError::NotAllowed {
            field: "image".to_string(),
            allowed: ALLOWED_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// A payment amount must be strictly positive.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the add-product form.
///
/// Name, brand and category are required. Quantity and price may be zero but
/// not negative.
pub fn validate_new_product(form: &NewProduct) -> ValidationResult<()> {
    validate_required("name", &form.name)?;
    validate_required("brand", &form.brand)?;
    validate_required("category", &form.category)?;

    if form.quantity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    if form.price_each.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price_each".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    if let Some(path) = &form.image_path {
        validate_image_path(path)?;
    }

    Ok(())
}

/// Validates a sale against the product list the console last fetched.
///
/// ## User Workflow
/// ```text
/// sales record --product 3 --quantity 6
///      │
///      ▼
/// product selected?  ── no ──► Required { product }
///      │
///      ▼
/// product known?     ── no ──► ProductNotFound
///      │
///      ▼
/// quantity > 0?      ── no ──► MustBePositive { quantity }
///      │
///      ▼
/// quantity ≤ stock?  ── no ──► InsufficientStock
///      │
///      ▼
/// POST /sales
/// ```
pub fn validate_sale_request<'a>(
    products: &'a [Product],
    product_id: Option<i64>,
    quantity: i64,
) -> CoreResult<&'a Product> {
    let id = product_id.ok_or_else(|| ValidationError::Required {
        field: "product".to_string(),
    })?;

    let product = products
        .iter()
        .find(|p| p.id == id)
        .ok_or(CoreError::ProductNotFound(id))?;

    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    if quantity > product.quantity {
        return Err(CoreError::InsufficientStock {
            product: product.name.clone(),
            available: product.quantity,
            requested: quantity,
        });
    }

    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn stock(id: i64, quantity: i64) -> Product {
        Product {
            id,
            name: format!("Item {id}"),
            brand: "Brand".to_string(),
            category: "General".to_string(),
            quantity,
            price_each: Money::from_cents(1000),
            image: None,
        }
    }

    fn form() -> NewProduct {
        NewProduct {
            name: "Brookside Milk".to_string(),
            brand: "Brookside".to_string(),
            category: "Dairy".to_string(),
            quantity: 24,
            price_each: Money::from_cents(6500),
            image_path: None,
        }
    }

    #[test]
    fn test_msisdn_accepts_kenyan_numbers() {
        assert_eq!(validate_msisdn("+254712345678").unwrap(), "+254712345678");
        assert_eq!(validate_msisdn("0712345678").unwrap(), "0712345678");
        assert_eq!(validate_msisdn("0112345678").unwrap(), "0112345678");
        assert_eq!(validate_msisdn(" 0712 345 678 ").unwrap(), "0712345678");
    }

    #[test]
    fn test_msisdn_rejects_bad_numbers() {
        assert!(validate_msisdn("12345").is_err());
        assert!(validate_msisdn("+254812345678").is_err());
        assert!(validate_msisdn("07123456789").is_err());
        assert!(validate_msisdn("+2547123456").is_err());
        assert!(matches!(
            validate_msisdn("  "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_msisdn_error_carries_hint() {
        let err = validate_msisdn("12345").unwrap_err();
        assert!(err.to_string().contains(MSISDN_HINT));
    }

    #[test]
    fn test_new_product_required_fields() {
        assert!(validate_new_product(&form()).is_ok());

        let mut f = form();
        f.brand = "  ".to_string();
        assert_eq!(
            validate_new_product(&f),
            Err(ValidationError::Required {
                field: "brand".to_string()
            })
        );

        let mut f = form();
        f.quantity = -1;
        assert!(validate_new_product(&f).is_err());
    }

    #[test]
    fn test_new_product_image_extension() {
        let mut f = form();
        f.image_path = Some(PathBuf::from("photos/milk.JPG"));
        assert!(validate_new_product(&f).is_ok());

        f.image_path = Some(PathBuf::from("photos/milk.bmp"));
        assert!(matches!(
            validate_new_product(&f),
            Err(ValidationError::NotAllowed { .. })
        ));

        f.image_path = Some(PathBuf::from("photos/milk"));
        assert!(validate_new_product(&f).is_err());
    }

    #[test]
    fn test_sale_rejected_when_quantity_exceeds_stock() {
        let products = vec![stock(1, 5)];
        let err = validate_sale_request(&products, Some(1), 6).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Insufficient stock. Available: 5");

        assert_eq!(validate_sale_request(&products, Some(1), 5).unwrap().id, 1);
    }

    #[test]
    fn test_sale_requires_known_product_and_positive_quantity() {
        let products = vec![stock(1, 5)];
        assert!(matches!(
            validate_sale_request(&products, None, 1),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            validate_sale_request(&products, Some(2), 1),
            Err(CoreError::ProductNotFound(2))
        ));
        assert!(matches!(
            validate_sale_request(&products, Some(1), 0),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }

    #[test]
    fn test_payment_amount() {
        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_cents(-100)).is_err());
    }
}
