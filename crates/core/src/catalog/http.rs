use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::domain::product::Product;
use crate::errors::CatalogError;

use super::wire::parse_catalog_body;
use super::ProductSource;

/// Path of the product-listing endpoint, relative to the configured base URL.
pub const CATALOG_PRODUCTS_PATH: &str = "/api/products";

/// Catalog client performing one GET per fetch. No retry, no caching: every
/// invocation sees a fresh snapshot of the remote catalog.
pub struct HttpCatalogClient {
    http: reqwest::Client,
    products_url: String,
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| CatalogError::Transport(err.to_string()))?;

        Ok(Self { http, products_url: products_url(&config.base_url) })
    }

    pub fn products_url(&self) -> &str {
        &self.products_url
    }
}

fn products_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), CATALOG_PRODUCTS_PATH)
}

#[async_trait]
impl ProductSource for HttpCatalogClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        debug!(event_name = "catalog.fetch.start", url = %self.products_url, "fetching product catalog");

        let response = self
            .http
            .get(&self.products_url)
            .send()
            .await
            .map_err(|err| CatalogError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body =
            response.text().await.map_err(|err| CatalogError::Transport(err.to_string()))?;
        let products = parse_catalog_body(&body)?;

        debug!(
            event_name = "catalog.fetch.complete",
            products = products.len(),
            "product catalog fetched"
        );
        Ok(products)
    }
}
