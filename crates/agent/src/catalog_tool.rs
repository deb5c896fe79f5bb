use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use shoply_core::catalog::{run_query, ProductSource};

use crate::tools::Tool;

pub const GET_PRODUCTS_TOOL_NAME: &str = "get_products_api";

/// Catalog lookup tool offered to the model. Catalog failures never
/// escape as errors; they come back as a structured `status: error`
/// payload the model can relay.
pub struct GetProductsTool {
    source: Arc<dyn ProductSource>,
}

impl GetProductsTool {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Tool for GetProductsTool {
    fn name(&self) -> &'static str {
        GET_PRODUCTS_TOOL_NAME
    }

    fn description(&self) -> &'static str {
        "Fetch a list of products from an online store, optionally filtered by a search query."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "A keyword or phrase to search for within product names, \
                                    descriptions, or categories (e.g., 'shoes', 'watch', \
                                    'electronics').",
                },
            },
            "required": [],
        })
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let query = input.get("query").and_then(Value::as_str).map(str::to_owned);

        let products = match self.source.fetch_products().await {
            Ok(products) => products,
            Err(error) => {
                warn!(
                    event_name = "agent.tool.catalog_unavailable",
                    error = %error,
                    "catalog fetch failed during tool call"
                );
                return Ok(json!({ "status": "error", "message": error.user_message() }));
            }
        };

        let result = run_query(&products, query.as_deref());
        info!(
            event_name = "agent.tool.get_products",
            query = query.as_deref().unwrap_or(""),
            matched = result.matched.len(),
            dropped = result.dropped,
            "catalog lookup completed"
        );

        if result.matched.is_empty() {
            let message = match &result.query_term {
                Some(term) => format!("No matches found for \"{term}\"."),
                None => "The catalog returned no products.".to_owned(),
            };
            return Ok(json!({ "status": "no_matches", "message": message }));
        }

        Ok(json!({
            "status": "ok",
            "count": result.matched.len(),
            "products": serde_json::to_value(&result.matched)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use shoply_core::catalog::ProductSource;
    use shoply_core::domain::product::{Product, ProductId};
    use shoply_core::errors::CatalogError;

    use super::GetProductsTool;
    use crate::tools::Tool;

    struct StaticSource {
        products: Vec<Product>,
    }

    #[async_trait]
    impl ProductSource for StaticSource {
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
            Ok(self.products.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ProductSource for FailingSource {
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
            Err(CatalogError::Status(500))
        }
    }

    fn product(id: &str, name: &str, category: &str, price_cents: i64) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: name.to_string(),
            category: category.to_string(),
            description: format!("{name} from the demo catalog"),
            price_cents,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Air Zoom Sneaker", "Shoes", 12_999),
            product("2", "Canvas Slip-On", "Shoes", 4_500),
            product("3", "Chrono Watch", "Accessories", 25_000),
        ]
    }

    #[tokio::test]
    async fn matching_query_returns_ok_with_dollar_prices() {
        let tool = GetProductsTool::new(Arc::new(StaticSource { products: catalog() }));

        let output = tool
            .execute(json!({ "query": "shoes" }))
            .await
            .expect("tool execution should succeed");

        assert_eq!(output["status"], "ok");
        assert_eq!(output["count"], 2);
        assert_eq!(output["products"][0]["name"], "Air Zoom Sneaker");
        assert_eq!(output["products"][0]["price"], "129.99");
        assert_eq!(output["products"][1]["price"], "45.00");
    }

    #[tokio::test]
    async fn missing_query_returns_the_whole_catalog() {
        let tool = GetProductsTool::new(Arc::new(StaticSource { products: catalog() }));

        let output = tool.execute(json!({})).await.expect("tool execution should succeed");

        assert_eq!(output["status"], "ok");
        assert_eq!(output["count"], 3);
    }

    #[tokio::test]
    async fn unmatched_query_reports_no_matches_with_the_term() {
        let tool = GetProductsTool::new(Arc::new(StaticSource { products: catalog() }));

        let output = tool
            .execute(json!({ "query": "submarine" }))
            .await
            .expect("tool execution should succeed");

        assert_eq!(output["status"], "no_matches");
        assert_eq!(output["message"], "No matches found for \"submarine\".");
    }

    #[tokio::test]
    async fn catalog_failures_become_error_payloads() {
        let tool = GetProductsTool::new(Arc::new(FailingSource));

        let output = tool
            .execute(json!({ "query": "shoes" }))
            .await
            .expect("catalog failure should not escape as an error");

        assert_eq!(output["status"], "error");
        assert_eq!(output["message"], CatalogError::Status(500).user_message());
    }

    #[tokio::test]
    async fn negative_priced_records_are_excluded_from_results() {
        let mut products = catalog();
        products.push(product("4", "Refund Voucher", "Shoes", -500));
        let tool = GetProductsTool::new(Arc::new(StaticSource { products }));

        let output = tool
            .execute(json!({ "query": "shoes" }))
            .await
            .expect("tool execution should succeed");

        assert_eq!(output["status"], "ok");
        assert_eq!(output["count"], 2);
    }
}
