//! API client for the marketplace REST backend.
//!
//! This module provides the `ApiClient` struct for logging in and for the
//! list/get/create/update/delete calls behind each console page.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::{header, multipart, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    Admin, AdminResponse, ApiResponse, CreateCustomerPayload, CreateDriverPayload,
    CreateProductPayload, Customer, Driver, ListRequest, ListResponse, Product, ProductImage,
    UpdateAdminPayload, UpdateCustomerPayload, UpdateDriverPayload, UpdateProductPayload,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum concurrent requests during bulk delete.
const MAX_CONCURRENT_DELETES: usize = 5;

#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// The four entity collections the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Admins,
    Customers,
    Drivers,
    Products,
}

impl EntityKind {
    pub fn collection_path(&self) -> &'static str {
        match self {
            EntityKind::Admins => "/api/admins",
            EntityKind::Customers => "/api/customers",
            EntityKind::Drivers => "/api/drivers",
            EntityKind::Products => "/api/products",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Admins => "admin",
            EntityKind::Customers => "customer",
            EntityKind::Drivers => "driver",
            EntityKind::Products => "product",
        }
    }
}

/// Outcome of one delete within a bulk delete.
#[derive(Debug)]
pub struct DeleteOutcome {
    pub id: String,
    pub result: Result<()>,
}

/// API client for the marketplace backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against `base_url` (no trailing slash needed)
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn item_url(&self, kind: EntityKind, id: &str) -> String {
        format!("{}{}/{}", self.base_url, kind.collection_path(), id)
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let url = self.url("/api/auth/login");
        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&LoginPayload { username, password })
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .context("Failed to parse login response")
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Send a request, backing off and rebuilding it on 429.
    ///
    /// `build` is called once per attempt because multipart bodies cannot be
    /// cloned.
    async fn send<F>(&self, method: Method, url: &str, build: F) -> Result<reqwest::Response>
    where
        F: Fn(RequestBuilder) -> Result<RequestBuilder>,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let request = self
                .client
                .request(method.clone(), url)
                .headers(self.auth_headers()?);
            let response = build(request)?
                .send()
                .await
                .with_context(|| format!("Failed to send {} request to {}", method, url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response, url: &str) -> Result<T> {
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(Method::GET, url, Ok).await?;
        Self::json(response, url).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        params: &ListRequest,
    ) -> Result<ListResponse<T>> {
        let url = self.url(kind.collection_path());
        let response = self
            .send(Method::GET, &url, |req| Ok(req.query(params)))
            .await?;
        let page: ListResponse<T> = Self::json(response, &url).await?;
        debug!(
            kind = kind.label(),
            page = page.page_number,
            total = page.total_records,
            "Fetched page"
        );
        Ok(page)
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(method, url, |req| Ok(req.json(body))).await?;
        Self::json(response, url).await
    }

    /// Delete one entity by id
    pub async fn delete(&self, kind: EntityKind, id: &str) -> Result<()> {
        let url = self.item_url(kind, id);
        self.send(Method::DELETE, &url, Ok).await?;
        debug!(kind = kind.label(), id = id, "Deleted");
        Ok(())
    }

    /// Delete several entities, a few at a time. Every id gets an outcome;
    /// one failure does not stop the others.
    pub async fn delete_many(&self, kind: EntityKind, ids: &[String]) -> Vec<DeleteOutcome> {
        stream::iter(ids.iter().cloned())
            .map(|id| async move {
                let result = self.delete(kind, &id).await;
                if let Err(ref e) = result {
                    warn!(kind = kind.label(), id = %id, error = %e, "Delete failed");
                }
                DeleteOutcome { id, result }
            })
            .buffer_unordered(MAX_CONCURRENT_DELETES)
            .collect()
            .await
    }

    // ===== Admins =====

    /// Fetch every admin (the endpoint is not paginated)
    pub async fn list_admins(&self) -> Result<Vec<Admin>> {
        let url = self.url(EntityKind::Admins.collection_path());
        let raw: Vec<AdminResponse> = self.get(&url).await?;
        Ok(raw.iter().map(|a| a.to_admin()).collect())
    }

    pub async fn get_admin(&self, id: &str) -> Result<Admin> {
        let raw: AdminResponse = self.get(&self.item_url(EntityKind::Admins, id)).await?;
        Ok(raw.to_admin())
    }

    pub async fn update_admin(&self, id: &str, payload: &UpdateAdminPayload) -> Result<Admin> {
        let url = self.item_url(EntityKind::Admins, id);
        let raw: AdminResponse = self.send_json(Method::PUT, &url, payload).await?;
        Ok(raw.to_admin())
    }

    // ===== Customers =====

    pub async fn list_customers(&self, params: &ListRequest) -> Result<ListResponse<Customer>> {
        self.get_page(EntityKind::Customers, params).await
    }

    pub async fn get_customer(&self, id: &str) -> Result<Customer> {
        self.get(&self.item_url(EntityKind::Customers, id)).await
    }

    pub async fn create_customer(&self, payload: &CreateCustomerPayload) -> Result<Customer> {
        let url = self.url(EntityKind::Customers.collection_path());
        self.send_json(Method::POST, &url, payload).await
    }

    pub async fn update_customer(
        &self,
        id: &str,
        payload: &UpdateCustomerPayload,
    ) -> Result<Customer> {
        let url = self.item_url(EntityKind::Customers, id);
        self.send_json(Method::PUT, &url, payload).await
    }

    // ===== Drivers =====

    pub async fn list_drivers(&self, params: &ListRequest) -> Result<ListResponse<Driver>> {
        self.get_page(EntityKind::Drivers, params).await
    }

    pub async fn get_driver(&self, id: &str) -> Result<Driver> {
        self.get(&self.item_url(EntityKind::Drivers, id)).await
    }

    pub async fn create_driver(&self, payload: &CreateDriverPayload) -> Result<Driver> {
        let url = self.url(EntityKind::Drivers.collection_path());
        self.send_json(Method::POST, &url, payload).await
    }

    pub async fn update_driver(&self, id: &str, payload: &UpdateDriverPayload) -> Result<Driver> {
        let url = self.item_url(EntityKind::Drivers, id);
        self.send_json(Method::PUT, &url, payload).await
    }

    // ===== Products =====

    pub async fn list_products(&self, params: &ListRequest) -> Result<ListResponse<Product>> {
        self.get_page(EntityKind::Products, params).await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.get(&self.item_url(EntityKind::Products, id)).await
    }

    /// Build the multipart body products are created/updated with.
    fn product_form(json: &str, image: Option<&ProductImage>) -> Result<multipart::Form> {
        let mut form = multipart::Form::new().text("ProductJson", json.to_string());
        if let Some(image) = image {
            let part = multipart::Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)
                .context("Invalid image MIME type")?;
            form = form.part("Image", part);
        }
        Ok(form)
    }

    async fn send_product(
        &self,
        method: Method,
        url: &str,
        json: String,
        image: Option<&ProductImage>,
    ) -> Result<Product> {
        let response = self
            .send(method, url, |req| {
                Ok(req.multipart(Self::product_form(&json, image)?))
            })
            .await?;
        let wrapped: ApiResponse<Product> = Self::json(response, url).await?;
        Ok(wrapped.data)
    }

    pub async fn create_product(&self, payload: &CreateProductPayload) -> Result<Product> {
        let url = self.url(EntityKind::Products.collection_path());
        let json = serde_json::to_string(&payload.json())?;
        self.send_product(Method::POST, &url, json, payload.image.as_ref())
            .await
    }

    pub async fn update_product(
        &self,
        id: &str,
        payload: &UpdateProductPayload,
    ) -> Result<Product> {
        let url = self.item_url(EntityKind::Products, id);
        let json = serde_json::to_string(&payload.json())?;
        self.send_product(Method::PUT, &url, json, payload.image.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:5000/").expect("client");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.item_url(EntityKind::Drivers, "d1"),
            "http://localhost:5000/api/drivers/d1"
        );
    }

    #[test]
    fn test_auth_headers() {
        let client = ApiClient::new("http://localhost").expect("client");
        assert!(client.auth_headers().expect("headers").is_empty());

        let authed = client.with_token("abc.def.ghi".to_string());
        let headers = authed.auth_headers().expect("headers");
        assert_eq!(
            headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer abc.def.ghi")
        );

        // The base client is untouched
        assert!(client.auth_headers().expect("headers").is_empty());
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let client = ApiClient::new("http://localhost")
            .expect("client")
            .with_token("bad\ntoken".to_string());
        assert!(client.auth_headers().is_err());
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(EntityKind::Admins.collection_path(), "/api/admins");
        assert_eq!(EntityKind::Customers.collection_path(), "/api/customers");
        assert_eq!(EntityKind::Drivers.collection_path(), "/api/drivers");
        assert_eq!(EntityKind::Products.collection_path(), "/api/products");
    }

    #[test]
    fn test_product_form_rejects_bad_mime() {
        let image = ProductImage {
            file_name: "x.png".to_string(),
            mime_type: "not a mime".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert!(ApiClient::product_form("{}", Some(&image)).is_err());
        assert!(ApiClient::product_form("{}", None).is_ok());
    }

    #[test]
    fn test_product_form_with_image() {
        let image = ProductImage {
            file_name: "cacamba.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        };
        let json = r#"{"name":"Caçamba 5m³","description":"Entulho","isActive":true}"#;
        let form = ApiClient::product_form(json, Some(&image)).expect("form");
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn test_parse_login_response() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"token":"a.b.c"}"#).expect("parse login");
        assert_eq!(resp.token, "a.b.c");
    }
}
