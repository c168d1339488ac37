// apps/console/tests/console_commands.rs
// Console commands end to end against an in-process mock of the shop API.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use milka_client::{ApiSettings, LocalStore, MilkaConfig};
use milka_console::commands::{auth, payment, product, report, sale, settings};
use milka_console::error::ErrorCode;
use milka_console::state::{AppContext, OutputMode, LOGIN_REQUIRED};
use milka_core::validation::MSISDN_HINT;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// Mock API
// =============================================================================

#[derive(Default)]
struct Mock {
    hits: AtomicUsize,
    products: Mutex<Vec<Value>>,
    saved_admin: Mutex<Option<Value>>,
}

impl Mock {
    fn new() -> Arc<Self> {
        let mock = Mock::default();
        *mock.products.lock().unwrap() = vec![
            json!({"id": 1, "name": "Fanta", "brand": "Coca-Cola", "category": "Beverages",
                   "quantity": 5, "price_each": 50}),
            json!({"id": 2, "name": "Unga 2kg", "brand": "Jogoo", "category": "Flour",
                   "quantity": 30, "price_each": 210.5}),
        ];
        Arc::new(mock)
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

type Shared = State<Arc<Mock>>;

async fn list_products(State(m): Shared) -> Json<Value> {
    m.hit();
    Json(json!({ "products": m.products.lock().unwrap().clone() }))
}

async fn create_product(State(m): Shared, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    m.hit();
    let mut name = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let field_name = field.name().unwrap_or_default().to_string();
        let text = field.text().await.unwrap();
        if field_name == "name" {
            name = text;
        }
    }
    let mut products = m.products.lock().unwrap();
    let id = products.len() as i64 + 1;
    products.push(json!({"id": id, "name": name, "quantity": 1, "price_each": 10}));
    (StatusCode::CREATED, Json(json!({"product_id": id})))
}

async fn list_sales(State(m): Shared) -> Json<Value> {
    m.hit();
    Json(json!({"sales": [
        {"id": 1, "product_name": "Fanta", "quantity_sold": 2, "price_per_unit": 50,
         "sale_date": "2025-10-14 09:30:00"}
    ]}))
}

async fn record_sale(State(m): Shared, Json(body): Json<Value>) -> Json<Value> {
    m.hit();
    let qty = body["quantity_sold"].as_i64().unwrap_or(0);
    let price = body["price_per_unit"].as_f64().unwrap_or(0.0);
    Json(json!({"total_amount": qty as f64 * price}))
}

async fn daily_report(State(m): Shared) -> Response {
    m.hit();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Report generation failed"})),
    )
        .into_response()
}

async fn mpesa_prompt(State(m): Shared) -> Json<Value> {
    m.hit();
    Json(json!({
        "ResponseCode": "0",
        "CheckoutRequestID": "ws_CO_1",
        "CustomerMessage": "Success. Request accepted for processing"
    }))
}

async fn get_admin(State(m): Shared) -> Response {
    m.hit();
    (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response()
}

async fn put_admin(State(m): Shared, Json(body): Json<Value>) -> Json<Value> {
    m.hit();
    *m.saved_admin.lock().unwrap() = Some(body);
    Json(json!({"message": "Saved"}))
}

async fn spawn(mock: Arc<Mock>) -> String {
    let app = Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/sales", get(list_sales).post(record_sale))
        .route("/reports/daily", get(daily_report))
        .route("/mpesa/prompt", post(mpesa_prompt))
        .route("/admin", get(get_admin).put(put_admin))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn context(base_url: &str, dir: &tempfile::TempDir, mode: OutputMode) -> AppContext {
    let store = LocalStore::open(dir.path().join("local_storage.json")).unwrap();
    let config = MilkaConfig {
        api: ApiSettings::new(base_url),
        ..MilkaConfig::default()
    };
    AppContext::with_store(config, store, mode).unwrap()
}

// =============================================================================
// Dashboard & Settings Fallbacks
// =============================================================================

#[tokio::test]
async fn test_dashboard_survives_failed_report() {
    let mock = Mock::new();
    let url = spawn(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&url, &dir, OutputMode::Plain);

    let out = report::dashboard(&ctx).await.unwrap();
    assert!(out.contains("Products In Stock"));
    assert!(out.contains("Daily report unavailable."));
    assert_eq!(mock.hits(), 2);
}

#[tokio::test]
async fn test_settings_show_falls_back_to_defaults() {
    let url = spawn(Mock::new()).await;
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&url, &dir, OutputMode::Plain);

    let out = settings::show(&ctx).await.unwrap();
    assert!(out.contains("Milka Shop Juja"));
    assert!(out.contains("admin@milkashop.com"));
}

#[tokio::test]
async fn test_partial_settings_update_needs_stored_profile() {
    let mock = Mock::new();
    let url = spawn(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&url, &dir, OutputMode::Plain);

    let partial = settings::ProfileUpdate {
        location: Some("Thika".to_string()),
        ..Default::default()
    };
    let err = settings::update(&ctx, &partial).await.unwrap_err();
    assert_eq!(err.message, settings::PROFILE_UNAVAILABLE);
    assert_eq!(err.code, ErrorCode::ServerError);
    // GET /admin only, nothing was written
    assert_eq!(mock.hits(), 1);
    assert!(mock.saved_admin.lock().unwrap().is_none());

    let full = settings::ProfileUpdate {
        name: Some("Jane Wanjiru".to_string()),
        email: Some("jane@milkashop.com".to_string()),
        phone: Some("0712345678".to_string()),
        shop_name: Some("Milka Shop Thika".to_string()),
        location: Some("Thika".to_string()),
    };
    let out = settings::update(&ctx, &full).await.unwrap();
    assert!(out.starts_with("Settings saved successfully!"));
    let saved = mock.saved_admin.lock().unwrap().clone().unwrap();
    assert_eq!(saved["name"], "Jane Wanjiru");
    assert_eq!(saved["location"], "Thika");
}

// =============================================================================
// Sales
// =============================================================================

#[tokio::test]
async fn test_sale_over_stock_sends_nothing() {
    let mock = Mock::new();
    let url = spawn(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&url, &dir, OutputMode::Plain);

    let err = sale::record(&ctx, Some(1), Some(6)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(err.message, "Insufficient stock. Available: 5");
    // only the product list was loaded
    assert_eq!(mock.hits(), 1);
}

#[tokio::test]
async fn test_sale_prints_total_and_recent() {
    let url = spawn(Mock::new()).await;
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&url, &dir, OutputMode::Plain);

    let out = sale::record(&ctx, Some(1), Some(2)).await.unwrap();
    assert!(out.starts_with("Sale recorded successfully! Total: KES 100.00"));
    assert!(out.contains("Recent Sales"));
    assert!(out.contains("Fanta"));
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_add_product_after_login() {
    let mock = Mock::new();
    let url = spawn(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = context(&url, &dir, OutputMode::Plain);

    let args = product::ProductArgs {
        name: Some("Royco Mchuzi Mix".to_string()),
        brand: Some("Royco".to_string()),
        category: Some("Spices".to_string()),
        quantity: Some(12),
        price: Some("45".to_string()),
        image: None,
    };

    let err = product::add(&mut ctx, &args).await.unwrap_err();
    assert_eq!(err.message, LOGIN_REQUIRED);
    assert_eq!(mock.hits(), 0);

    auth::login(&mut ctx, "Milma", "1234").unwrap();
    let out = product::add(&mut ctx, &args).await.unwrap();
    assert!(out.starts_with("Product added successfully!"));
    assert!(out.contains("Royco Mchuzi Mix"));
}

#[tokio::test]
async fn test_product_list_as_json() {
    let url = spawn(Mock::new()).await;
    let dir = tempfile::tempdir().unwrap();
    let ctx = context(&url, &dir, OutputMode::Json);

    let out = product::list(&ctx, Some("unga")).await.unwrap();
    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["name"], "Unga 2kg");
}

// =============================================================================
// Payments
// =============================================================================

#[tokio::test]
async fn test_payment_prompt_and_history() {
    let mock = Mock::new();
    let url = spawn(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = context(&url, &dir, OutputMode::Plain);

    let err = payment::prompt(&mut ctx, "+254812345678", Some(1), Some("50"))
        .await
        .unwrap_err();
    assert_eq!(err.message, MSISDN_HINT);
    assert_eq!(mock.hits(), 0);

    let out = payment::prompt(&mut ctx, "0712345678", Some(1), Some("50"))
        .await
        .unwrap();
    assert!(out.contains("M-Pesa STK push sent!"));

    let history = payment::history(&ctx).unwrap();
    assert!(history.contains("0712345678"));
    assert!(history.contains("Pending"));
}

#[tokio::test]
async fn test_bad_phone_reported_while_api_is_down() {
    let dir = tempfile::tempdir().unwrap();
    // nothing listens on the discard port
    let mut ctx = context("http://127.0.0.1:9", &dir, OutputMode::Plain);

    let err = payment::prompt(&mut ctx, "12345", Some(1), Some("50"))
        .await
        .unwrap_err();
    assert_eq!(err.message, MSISDN_HINT);
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_bad_amount_is_rejected_before_any_request() {
    let mock = Mock::new();
    let url = spawn(mock.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = context(&url, &dir, OutputMode::Plain);

    let err = payment::prompt(&mut ctx, "0712345678", Some(1), Some("abc"))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert_eq!(mock.hits(), 0);
}
