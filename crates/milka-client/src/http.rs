//! # HTTP Client
//!
//! Typed access to the shop's REST API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /                  health()          {"message"}               │
//! │  GET    /products          list_products()   {"products":[…]} | […]    │
//! │  POST   /products          create_product()  multipart, optional image │
//! │  DELETE /products/{id}     delete_product()                            │
//! │  GET    /sales             list_sales()      {"sales":[…]} | […]       │
//! │  POST   /sales             record_sale()     → total_amount            │
//! │  GET    /reports/daily     daily_report()                              │
//! │  POST   /mpesa/prompt      mpesa_prompt()    → STK acknowledgement     │
//! │  GET    /admin             get_admin()                                 │
//! │  PUT    /admin             update_admin()                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries, no caching and no auth headers. Each call is a single
//! request and any failure is returned to the caller as-is.

use milka_core::types::{
    AdminProfile, DailyReport, NewProduct, NewSale, PaymentPrompt, PaymentRequest, Product, Sale,
    SaleReceipt,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Response Schemas
// =============================================================================

/// `GET /products` answers either shape; anything else is rejected.
///
/// Records stay raw here so that one unreadable product is skipped instead
/// of failing the whole list (see [`decode_records`]).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductList {
    Wrapped { products: Vec<Value> },
    Bare(Vec<Value>),
}

impl From<ProductList> for Vec<Value> {
    fn from(list: ProductList) -> Self {
        match list {
            ProductList::Wrapped { products } => products,
            ProductList::Bare(products) => products,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SaleList {
    Wrapped { sales: Vec<Value> },
    Bare(Vec<Value>),
}

impl From<SaleList> for Vec<Value> {
    fn from(list: SaleList) -> Self {
        match list {
            SaleList::Wrapped { sales } => sales,
            SaleList::Bare(sales) => sales,
        }
    }
}

/// Decodes each record on its own. Unreadable records are logged and dropped.
fn decode_records<T: DeserializeOwned>(endpoint: &str, records: Vec<Value>) -> Vec<T> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(endpoint, index, error = %e, "Skipping unreadable record");
                None
            }
        })
        .collect()
}

/// Response of `POST /products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCreated {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub product_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Error body the API sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// API Client
// =============================================================================

/// HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client with the configured timeout.
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        Url::parse(&settings.base_url)?;

        let client = Client::builder().timeout(settings.timeout()).build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Sends a request and returns the raw body of a 2xx response.
    async fn execute(&self, endpoint: &str, request: RequestBuilder) -> ClientResult<Vec<u8>> {
        let started = Instant::now();
        debug!(endpoint, "Sending request");

        let response = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        info!(
            endpoint,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        Ok(body)
    }

    fn parse<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> ClientResult<T> {
        serde_json::from_slice(body).map_err(|e| ClientError::InvalidResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let endpoint = format!("GET /{}", path.trim_start_matches('/'));
        let body = self.execute(&endpoint, self.request(Method::GET, path)).await?;
        Self::parse(&endpoint, &body)
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
    ) -> ClientResult<T> {
        let endpoint = format!("{} /{}", method, path.trim_start_matches('/'));
        let request = self.request(method, path).json(payload);
        let body = self.execute(&endpoint, request).await?;
        Self::parse(&endpoint, &body)
    }

    // ========== Health ==========

    /// `GET /`: the API's status message.
    pub async fn health(&self) -> ClientResult<String> {
        let health: HealthResponse = self.get("").await?;
        Ok(health.message.unwrap_or_default())
    }

    // ========== Products ==========

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let list: ProductList = self.get("products").await?;
        let products: Vec<Product> = decode_records("GET /products", list.into());
        debug!(count = products.len(), "Products loaded");
        Ok(products)
    }

    /// `POST /products` as multipart, attaching the image file when set.
    pub async fn create_product(&self, product: &NewProduct) -> ClientResult<ProductCreated> {
        let mut form = Form::new()
            .text("name", product.name.trim().to_string())
            .text("brand", product.brand.trim().to_string())
            .text("category", product.category.trim().to_string())
            .text("quantity", product.quantity.to_string())
            .text("price_each", product.price_each.to_plain_string());

        if let Some(path) = &product.image_path {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image")
                .to_string();
            debug!(file = %file_name, size = bytes.len(), "Attaching product image");
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(image_mime(path))?;
            form = form.part("image", part);
        }

        let endpoint = "POST /products";
        let request = self.request(Method::POST, "products").multipart(form);
        let body = self.execute(endpoint, request).await?;
        Self::parse(endpoint, &body)
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        let path = format!("products/{id}");
        let endpoint = format!("DELETE /{path}");
        self.execute(&endpoint, self.request(Method::DELETE, &path))
            .await?;
        Ok(())
    }

    // ========== Sales ==========

    pub async fn list_sales(&self) -> ClientResult<Vec<Sale>> {
        let list: SaleList = self.get("sales").await?;
        let sales: Vec<Sale> = decode_records("GET /sales", list.into());
        debug!(count = sales.len(), "Sales loaded");
        Ok(sales)
    }

    pub async fn record_sale(&self, sale: &NewSale) -> ClientResult<SaleReceipt> {
        self.send_json(Method::POST, "sales", sale).await
    }

    // ========== Reports ==========

    pub async fn daily_report(&self) -> ClientResult<DailyReport> {
        self.get("reports/daily").await
    }

    // ========== Payments ==========

    /// Asks the API to push an M-Pesa STK prompt to the customer's phone.
    pub async fn mpesa_prompt(&self, request: &PaymentRequest) -> ClientResult<PaymentPrompt> {
        self.send_json(Method::POST, "mpesa/prompt", request).await
    }

    // ========== Admin ==========

    pub async fn get_admin(&self) -> ClientResult<AdminProfile> {
        self.get("admin").await
    }

    pub async fn update_admin(&self, profile: &AdminProfile) -> ClientResult<()> {
        let endpoint = "PUT /admin";
        let request = self.request(Method::PUT, "admin").json(profile);
        self.execute(endpoint, request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(json: &str) -> Vec<Product> {
        let list: ProductList = serde_json::from_str(json).unwrap();
        decode_records("GET /products", list.into())
    }

    #[test]
    fn test_product_list_shapes() {
        assert_eq!(products(r#"{"products": [{"id": 1, "name": "Salt"}]}"#).len(), 1);
        assert_eq!(products(r#"[{"id": 1, "name": "Salt"}]"#)[0].name, "Salt");

        assert!(serde_json::from_str::<ProductList>(r#"{"items": []}"#).is_err());
        assert!(serde_json::from_str::<ProductList>("null").is_err());
    }

    #[test]
    fn test_unreadable_product_is_skipped() {
        let list = products(
            r#"[{"id": 1, "name": "Salt", "brand": null, "price_each": null},
                {"id": "two", "name": "Sugar"},
                {"id": 3, "name": "Rice", "quantity": "many"}]"#,
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].brand, "");
    }

    #[test]
    fn test_sale_list_shapes() {
        let wrapped: SaleList = serde_json::from_str(r#"{"sales": []}"#).unwrap();
        assert!(Vec::<Value>::from(wrapped).is_empty());
        assert!(serde_json::from_str::<SaleList>(r#"{"data": []}"#).is_err());

        let list: SaleList = serde_json::from_str(
            r#"[{"id": 1, "quantity_sold": 2, "sale_date": "2025-10-14 09:30:00"},
                {"id": 2, "quantity_sold": 1, "sale_date": "14/10/2025"}]"#,
        )
        .unwrap();
        let sales: Vec<Sale> = decode_records("GET /sales", list.into());
        assert_eq!(sales.len(), 2);
        assert!(sales[1].sale_date.is_none());
    }

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(br#"{"error": "Database connection failed"}"#).as_deref(),
            Some("Database connection failed")
        );
        assert_eq!(
            server_message(br#"{"message": "Not found"}"#).as_deref(),
            Some("Not found")
        );
        assert!(server_message(b"<html>502</html>").is_none());
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new(&ApiSettings::new("http://localhost:5000/")).unwrap();
        assert_eq!(client.url("products"), "http://localhost:5000/products");
        assert_eq!(client.url(""), "http://localhost:5000/");
        assert!(ApiClient::new(&ApiSettings::new("localhost")).is_err());
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime(Path::new("a/b.JPG")), "image/jpeg");
        assert_eq!(image_mime(Path::new("a/b.webp")), "image/webp");
    }
}
