//! API client for the food-ordering REST API.
//!
//! This module provides the `ApiClient` struct for authenticating and for
//! the catalog, cart and order calls made on behalf of the logged-in user.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::ApiError;
use crate::auth::Authorizer;
use crate::models::{AddToCart, AuthResponse, Cart, Category, Credentials, Item, Order};

// ============================================================================
// Constants
// ============================================================================

/// Hosted backend used when nothing else is configured
pub const DEFAULT_API_URL: &str =
    "https://food-ordering-platform-backend-production.up.railway.app/api";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Everything the menu screen shows.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
}

/// API client for the ordering backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    authorizer: Authorizer,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, authorizer: Authorizer) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            authorizer,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %ApiError::truncate_body(&body), "Request failed");
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .authorizer
            .authorize(self.client.get(&url))
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, path).await
    }

    /// POST a JSON body and hand back the successful response.
    async fn post(&self, path: &str, body: Option<&serde_json::Value>) -> Result<Response, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let mut request = self.authorizer.authorize(self.client.post(&url));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::check_response(response).await
    }

    fn to_body<B: serde::Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
        serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode request: {}", e)))
    }

    // ===== Authentication =====

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = Self::to_body(&Credentials { email, password })?;
        let response = self.post("/auth/login", Some(&body)).await?;
        Self::parse_json(response, "login response").await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = Self::to_body(&Credentials { email, password })?;
        let response = self.post("/auth/register", Some(&body)).await?;
        Self::parse_json(response, "register response").await
    }

    // ===== Catalog =====

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/categories").await
    }

    pub async fn fetch_items(&self) -> Result<Vec<Item>, ApiError> {
        self.get("/items").await
    }

    /// Fetch categories and items concurrently.
    pub async fn fetch_menu(&self) -> Result<Menu, ApiError> {
        let (categories, items) =
            futures::try_join!(self.fetch_categories(), self.fetch_items())?;
        Ok(Menu { categories, items })
    }

    // ===== Cart =====

    pub async fn add_to_cart(&self, item_id: &str, quantity: u32) -> Result<(), ApiError> {
        let body = Self::to_body(&AddToCart { item_id, quantity })?;
        self.post("/cart", Some(&body)).await?;
        Ok(())
    }

    /// The user's cart. A user who never added anything may get `null`,
    /// which reads as an empty cart.
    pub async fn fetch_cart(&self) -> Result<Cart, ApiError> {
        let cart: Option<Cart> = self.get("/cart").await?;
        Ok(cart.unwrap_or_default())
    }

    // ===== Orders =====

    pub async fn checkout(&self) -> Result<(), ApiError> {
        self.post("/order/checkout", None).await?;
        Ok(())
    }

    pub async fn fetch_order_history(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/order/history").await
    }
}
