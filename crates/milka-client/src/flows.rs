//! # Submission Flows
//!
//! Every form submission runs the same sequence.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  &form ──► validate (milka-core) ──Err──► ClientError::Core             │
//! │                 │                         (zero requests sent)          │
//! │                 ▼                                                       │
//! │            send request ──Err──► ClientError::Server / Http             │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            re-fetch affected list(s) ──► fresh data for the view        │
//! │                 │                                                       │
//! │                 └──Err──► warn!, data = None (the change still stands)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Once the server has accepted a change the flow returns `Ok`. Anything that
//! fails after that point is logged and reported as missing data, never as a
//! failed submission, because resubmitting would repeat the change.
//!
//! Forms are borrowed, so the caller still holds every value after a failure
//! and can resubmit unchanged.

use chrono::Utc;
use milka_core::catalog::find_product;
use milka_core::money::Money;
use milka_core::report::recent_sales;
use milka_core::types::{
    AdminProfile, NewProduct, NewSale, PaymentPrompt, PaymentRecord, PaymentRequest,
    PaymentStatus, Product, Sale, SaleReceipt,
};
use milka_core::validation::{
    validate_msisdn, validate_new_product, validate_payment_amount, validate_required,
    validate_sale_request,
};
use milka_core::{CoreError, ValidationError, RECENT_SALES_LIMIT};
use tracing::{info, warn};

use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::store::LocalStore;

pub const ADD_PRODUCT_FAILED: &str = "Failed to add product. Please try again.";
pub const DELETE_PRODUCT_FAILED: &str = "Failed to delete product. Please try again.";
pub const RECORD_SALE_FAILED: &str = "Failed to record sale. Please try again.";
pub const PAYMENT_FAILED: &str = "Failed to initiate payment. Please try again.";
pub const SAVE_PROFILE_FAILED: &str = "Failed to save settings. Please try again.";

// =============================================================================
// Products
// =============================================================================

/// Re-fetches the product list after a committed change.
async fn refreshed_products(api: &ApiClient) -> Option<Vec<Product>> {
    match api.list_products().await {
        Ok(products) => Some(products),
        Err(e) => {
            warn!(error = %e, "Change saved but the product list could not be refreshed");
            None
        }
    }
}

/// Creates a product and returns the refreshed product list, `None` when
/// the refresh failed.
pub async fn add_product(
    api: &ApiClient,
    form: &NewProduct,
) -> ClientResult<Option<Vec<Product>>> {
    validate_new_product(form)?;

    let created = api.create_product(form).await?;
    info!(product_id = ?created.product_id, name = %form.name.trim(), "Product added");

    Ok(refreshed_products(api).await)
}

/// Deletes a product and returns the refreshed product list, `None` when
/// the refresh failed.
pub async fn delete_product(api: &ApiClient, id: i64) -> ClientResult<Option<Vec<Product>>> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "product id".to_string(),
        }
        .into());
    }

    api.delete_product(id).await?;
    info!(product_id = id, "Product deleted");

    Ok(refreshed_products(api).await)
}

// =============================================================================
// Sales
// =============================================================================

/// What the Sales view shows after a successful sale.
#[derive(Debug, Clone)]
pub struct SaleOutcome {
    /// The server's `total_amount`, or `quantity × price` when it sent none.
    pub total: Money,
    pub receipt: SaleReceipt,
    /// `None` when the refresh after the sale failed.
    pub products: Option<Vec<Product>>,
    /// Newest sales first. `None` when the refresh after the sale failed.
    pub recent: Option<Vec<Sale>>,
}

/// Records a sale of `quantity` units of `product_id`.
///
/// `products` is the list the operator chose from. A quantity above its
/// stock figure is rejected here without a request.
pub async fn record_sale(
    api: &ApiClient,
    products: &[Product],
    product_id: Option<i64>,
    quantity: i64,
) -> ClientResult<SaleOutcome> {
    let product = validate_sale_request(products, product_id, quantity)?;

    let sale = NewSale {
        product_id: product.id,
        quantity_sold: quantity,
        price_per_unit: product.price_each,
    };

    let receipt = api.record_sale(&sale).await?;
    let total = receipt.total_amount.unwrap_or_else(|| sale.total());
    info!(product_id = sale.product_id, quantity, total = %total, "Sale recorded");

    let (products, sales) = tokio::join!(api.list_products(), api.list_sales());
    let products = products
        .map_err(|e| warn!(error = %e, "Sale saved but products could not be refreshed"))
        .ok();
    let recent = sales
        .map_err(|e| warn!(error = %e, "Sale saved but sales could not be refreshed"))
        .ok()
        .map(|sales| recent_sales(&sales, RECENT_SALES_LIMIT));

    Ok(SaleOutcome {
        total,
        receipt,
        products,
        recent,
    })
}

// =============================================================================
// Payments
// =============================================================================

/// The payment form as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentForm {
    pub phone: String,
    pub product_id: Option<i64>,
    pub amount: Option<Money>,
}

impl PaymentForm {
    /// The checks that need no product list: phone, product choice, amount.
    ///
    /// Returns the normalised phone number, product id and amount.
    pub fn validate(&self) -> ClientResult<(String, i64, Money)> {
        let phone = validate_msisdn(&self.phone)?;

        let id = self.product_id.ok_or_else(|| ValidationError::Required {
            field: "product".to_string(),
        })?;

        let amount = self.amount.ok_or_else(|| ValidationError::Required {
            field: "amount".to_string(),
        })?;
        validate_payment_amount(amount)?;

        Ok((phone, id, amount))
    }
}

#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub prompt: PaymentPrompt,
    pub record: PaymentRecord,
    /// False when the prompt went out but the local log could not be written.
    pub logged: bool,
}

/// Sends an M-Pesa prompt and appends it to the local payment log.
///
/// `products` is only needed to resolve the chosen product, so callers can
/// run [`PaymentForm::validate`] before loading it.
pub async fn initiate_payment(
    api: &ApiClient,
    store: &mut LocalStore,
    products: &[Product],
    form: &PaymentForm,
) -> ClientResult<PaymentOutcome> {
    let (phone, id, amount) = form.validate()?;
    let product = find_product(products, id).ok_or(CoreError::ProductNotFound(id))?;

    let request = PaymentRequest {
        phone_number: phone.clone(),
        amount,
        product_id: product.id,
    };

    let prompt = api.mpesa_prompt(&request).await?;
    info!(
        product_id = product.id,
        amount = %amount,
        checkout_request_id = ?prompt.checkout_request_id,
        "Payment prompt sent"
    );

    let record = PaymentRecord {
        phone,
        product: product.name.clone(),
        amount,
        status: PaymentStatus::Pending,
        requested_at: Utc::now(),
        checkout_request_id: prompt.checkout_request_id.clone(),
    };
    let logged = match store.push_payment(record.clone()) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Payment prompt sent but the payment log could not be written");
            false
        }
    };

    Ok(PaymentOutcome {
        prompt,
        record,
        logged,
    })
}

// =============================================================================
// Settings
// =============================================================================

/// Saves the admin profile. Name and email are required.
pub async fn save_admin_profile(api: &ApiClient, profile: &AdminProfile) -> ClientResult<()> {
    validate_required("name", &profile.name)?;
    validate_required("email", &profile.email)?;

    api.update_admin(profile).await?;
    info!(shop = %profile.shop_name, "Admin profile saved");
    Ok(())
}
