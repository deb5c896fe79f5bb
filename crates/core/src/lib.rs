pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;

pub use catalog::{
    filter_products, parse_catalog_body, run_query, HttpCatalogClient, ProductSource, QueryResult,
    CATALOG_PRODUCTS_PATH,
};
pub use config::{
    AppConfig, CatalogConfig, ConfigError, ConfigOverrides, LlmConfig, LoadOptions, LogFormat,
    LoggingConfig,
};
pub use domain::product::{PricedProduct, Product, ProductId};
pub use errors::{CatalogError, PriceError};
pub use pricing::{display_price, format_usd, price_product};
