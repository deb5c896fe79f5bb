use crate::domain::product::Product;

/// Stable keyword filter over the product list.
///
/// An absent or blank term is the identity: every product comes back in
/// source order. Otherwise a product matches when the lowercased term is a
/// substring of its lowercased name, category, or description. An empty
/// result is a normal outcome, not an error.
pub fn filter_products(products: &[Product], term: Option<&str>) -> Vec<Product> {
    let Some(needle) = normalize_term(term) else {
        return products.to_vec();
    };

    products.iter().filter(|product| matches_term(product, &needle)).cloned().collect()
}

fn normalize_term(term: Option<&str>) -> Option<String> {
    let trimmed = term?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

fn matches_term(product: &Product, needle: &str) -> bool {
    [&product.name, &product.category, &product.description]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}
