mod filter;
mod http;
mod wire;

pub use filter::filter_products;
pub use http::{HttpCatalogClient, CATALOG_PRODUCTS_PATH};
pub use wire::parse_catalog_body;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::product::{PricedProduct, Product};
use crate::errors::CatalogError;
use crate::pricing;

/// Anything that can produce a fresh product snapshot. The HTTP client is
/// the production implementation; tests substitute static sources.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;
}

/// The per-invocation outcome of the query pipeline: matched products in
/// source order with display prices, plus the count of records skipped by
/// price validation. Discarded once the tool reply is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryResult {
    pub matched: Vec<PricedProduct>,
    pub query_term: Option<String>,
    pub dropped: usize,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

/// Filter a product snapshot by an optional keyword and convert each match
/// to its display form. Matches that fail price validation are skipped and
/// counted, keeping the rest of the result usable.
pub fn run_query(products: &[Product], term: Option<&str>) -> QueryResult {
    let query_term = term.map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned);

    let mut matched = Vec::new();
    let mut dropped = 0usize;
    for product in filter_products(products, term) {
        match pricing::price_product(&product) {
            Ok(priced) => matched.push(priced),
            Err(err) => {
                dropped += 1;
                warn!(
                    event_name = "catalog.query.record_skipped",
                    product_id = %product.id.0,
                    error = %err,
                    "skipping product with undisplayable price"
                );
            }
        }
    }

    QueryResult { matched, query_term, dropped }
}
