//! Wire-format decoding for the remote catalog API.
//!
//! The API wraps its product list in a `{"data": [...]}` envelope and names
//! fields after the upstream store (`productName`, `price` in minor units).
//! Individual records missing id, name, or an integer price are dropped;
//! only a broken envelope fails the whole fetch.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::product::{Product, ProductId};
use crate::errors::CatalogError;

#[derive(Debug, Deserialize)]
struct CatalogEnvelope {
    data: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProductRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "productName", alias = "name")]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    price: Option<Value>,
}

impl RawProductRecord {
    fn into_product(self) -> Option<Product> {
        let id = match self.id? {
            Value::String(raw) if !raw.trim().is_empty() => raw,
            Value::Number(raw) => raw.to_string(),
            _ => return None,
        };
        let name = self.name.filter(|name| !name.trim().is_empty())?;
        let price_cents = self.price?.as_i64()?;

        Some(Product {
            id: ProductId(id),
            name,
            category: self.category.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price_cents,
        })
    }
}

/// Decode a catalog response body into products, preserving source order.
pub fn parse_catalog_body(body: &str) -> Result<Vec<Product>, CatalogError> {
    let envelope: CatalogEnvelope =
        serde_json::from_str(body).map_err(|err| CatalogError::Malformed(err.to_string()))?;

    let total = envelope.data.len();
    let products: Vec<Product> = envelope
        .data
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawProductRecord>(value).ok())
        .filter_map(RawProductRecord::into_product)
        .collect();

    let dropped = total - products.len();
    if dropped > 0 {
        warn!(
            event_name = "catalog.fetch.records_dropped",
            dropped,
            kept = products.len(),
            "dropped malformed product records from catalog response"
        );
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::parse_catalog_body;
    use crate::errors::CatalogError;

    fn body(records: serde_json::Value) -> String {
        json!({ "data": records }).to_string()
    }

    #[test]
    fn decodes_upstream_field_names_in_source_order() {
        let body = body(json!([
            {"id": 1, "productName": "Blue Mug", "category": "Kitchen", "description": "Ceramic", "price": 1299},
            {"id": "p-2", "productName": "Red Mug", "category": "Kitchen", "description": "", "price": 999},
        ]));

        let products = parse_catalog_body(&body).expect("valid body should decode");
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id.0, "1");
        assert_eq!(products[0].name, "Blue Mug");
        assert_eq!(products[0].price_cents, 1299);
        assert_eq!(products[1].id.0, "p-2");
    }

    #[test]
    fn accepts_name_as_alias_for_product_name() {
        let body = body(json!([
            {"id": 7, "name": "Trail Shoe", "category": "Footwear", "description": "Grippy", "price": 8999},
        ]));

        let products = parse_catalog_body(&body).expect("valid body should decode");
        assert_eq!(products[0].name, "Trail Shoe");
    }

    #[test]
    fn drops_records_missing_id_name_or_price() {
        let body = body(json!([
            {"productName": "No Id", "price": 100},
            {"id": 2, "price": 200},
            {"id": 3, "productName": "No Price"},
            {"id": 4, "productName": "Kept", "price": 400},
        ]));

        let products = parse_catalog_body(&body).expect("valid body should decode");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Kept");
    }

    #[test]
    fn drops_records_with_non_integer_prices() {
        let body = body(json!([
            {"id": 1, "productName": "Float", "price": 12.99},
            {"id": 2, "productName": "Text", "price": "1299"},
            {"id": 3, "productName": "Integer", "price": 1299},
        ]));

        let products = parse_catalog_body(&body).expect("valid body should decode");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Integer");
    }

    #[test]
    fn drops_non_object_entries_without_failing() {
        let body = body(json!([42, "stray", {"id": 1, "productName": "Kept", "price": 100}]));

        let products = parse_catalog_body(&body).expect("valid body should decode");
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn missing_data_key_is_a_malformed_body() {
        let error = parse_catalog_body(r#"{"items": []}"#).expect_err("envelope should be rejected");
        assert!(matches!(error, CatalogError::Malformed(_)));
    }

    #[test]
    fn non_array_data_is_a_malformed_body() {
        let error =
            parse_catalog_body(r#"{"data": "nope"}"#).expect_err("envelope should be rejected");
        assert!(matches!(error, CatalogError::Malformed(_)));
    }

    #[test]
    fn unparsable_body_is_a_malformed_body() {
        let error = parse_catalog_body("<html>oops</html>").expect_err("body should be rejected");
        assert!(matches!(error, CatalogError::Malformed(_)));
    }

    #[test]
    fn negative_integer_prices_survive_parsing() {
        // Negative prices are well-formed integers on the wire; they are
        // rejected later, at display conversion.
        let body = body(json!([{"id": 1, "productName": "Odd", "price": -5}]));

        let products = parse_catalog_body(&body).expect("valid body should decode");
        assert_eq!(products[0].price_cents, -5);
    }
}
