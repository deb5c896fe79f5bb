//! Minor-unit to display-price conversion.
//!
//! Prices arrive as integer cents and convert exactly: `display = cents /
//! 100` with a fixed scale of two. Where later arithmetic needs rounding,
//! the crate-wide rule is banker's rounding (`MidpointNearestEven`), the
//! same strategy `Decimal::round_dp` applies.

use rust_decimal::Decimal;

use crate::domain::product::{PricedProduct, Product};
use crate::errors::PriceError;

/// Convert a minor-unit price to its display value. Exact for every
/// non-negative integer input; negative prices are rejected so a bad record
/// can be skipped rather than shown.
pub fn display_price(price_cents: i64) -> Result<Decimal, PriceError> {
    if price_cents < 0 {
        return Err(PriceError::Negative(price_cents));
    }
    Ok(Decimal::new(price_cents, 2))
}

/// Project a catalog record into its display form.
pub fn price_product(product: &Product) -> Result<PricedProduct, PriceError> {
    Ok(PricedProduct {
        id: product.id.clone(),
        name: product.name.clone(),
        category: product.category.clone(),
        description: product.description.clone(),
        price: display_price(product.price_cents)?,
    })
}

/// Render a display price as dollars, always with two decimal places.
pub fn format_usd(price: Decimal) -> String {
    let mut rounded = price.round_dp(2);
    rounded.rescale(2);
    format!("${rounded}")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::product::{Product, ProductId};
    use crate::errors::PriceError;

    use super::{display_price, format_usd, price_product};

    #[test]
    fn cents_convert_to_exact_two_decimal_dollars() {
        assert_eq!(display_price(1299).expect("valid price"), Decimal::new(1299, 2));
        assert_eq!(display_price(0).expect("valid price"), Decimal::new(0, 2));
        assert_eq!(display_price(10_000).expect("valid price").to_string(), "100.00");
    }

    #[test]
    fn conversion_is_deterministic() {
        let first = display_price(4242).expect("valid price");
        let second = display_price(4242).expect("valid price");
        assert_eq!(first, second);
    }

    #[test]
    fn round_trip_recovers_the_minor_units() {
        for cents in [0_i64, 1, 99, 100, 1299, 10_000, 123_456_789] {
            let display = display_price(cents).expect("valid price");
            assert_eq!(display * Decimal::from(100), Decimal::from(cents));
        }
    }

    #[test]
    fn negative_cents_are_rejected() {
        assert_eq!(display_price(-5), Err(PriceError::Negative(-5)));
    }

    #[test]
    fn priced_product_keeps_the_text_fields() {
        let product = Product {
            id: ProductId("1".to_owned()),
            name: "Blue Mug".to_owned(),
            category: "Kitchen".to_owned(),
            description: "Ceramic".to_owned(),
            price_cents: 1299,
        };

        let priced = price_product(&product).expect("valid price");
        assert_eq!(priced.name, "Blue Mug");
        assert_eq!(priced.price.to_string(), "12.99");
    }

    #[test]
    fn usd_formatting_always_shows_two_places() {
        assert_eq!(format_usd(Decimal::new(1299, 2)), "$12.99");
        assert_eq!(format_usd(Decimal::new(10_000, 2)), "$100.00");
        assert_eq!(format_usd(Decimal::from(13)), "$13.00");
    }

    #[test]
    fn usd_formatting_applies_bankers_rounding_to_odd_scales() {
        assert_eq!(format_usd(Decimal::new(12_985, 3)), "$12.98");
        assert_eq!(format_usd(Decimal::new(12_975, 3)), "$12.98");
    }
}
