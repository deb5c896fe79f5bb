use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// A catalog record as fetched from the remote product API. Prices stay in
/// integer minor units until display conversion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price_cents: i64,
}

/// A product projected for display, price converted from minor units to an
/// exact two-decimal major-unit value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedProduct {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
}
