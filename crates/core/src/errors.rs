use thiserror::Error;

/// Failures while fetching or decoding the remote product catalog. Every
/// variant is recovered at the tool boundary into the same user-facing
/// "service unavailable" text; the variants exist for logs and tests.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog responded with status {0}")]
    Status(u16),
    #[error("catalog response was malformed: {0}")]
    Malformed(String),
}

impl CatalogError {
    pub fn user_message(&self) -> &'static str {
        "The product catalog is temporarily unavailable. Please try again in a moment."
    }
}

/// A product record carried a price that cannot be displayed. Records that
/// fail price conversion are skipped, never fatal to the request.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("price in minor units must not be negative, got {0}")]
    Negative(i64),
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, PriceError};

    #[test]
    fn every_catalog_failure_maps_to_the_same_user_message() {
        let variants = [
            CatalogError::Transport("connection refused".to_owned()),
            CatalogError::Status(500),
            CatalogError::Malformed("missing data array".to_owned()),
        ];

        for variant in variants {
            assert_eq!(
                variant.user_message(),
                "The product catalog is temporarily unavailable. Please try again in a moment."
            );
        }
    }

    #[test]
    fn price_error_names_the_offending_value() {
        let error = PriceError::Negative(-5);
        assert_eq!(error.to_string(), "price in minor units must not be negative, got -5");
    }
}
