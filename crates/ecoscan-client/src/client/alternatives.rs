use ecoscan_core::Product;
use futures::future::join_all;

use super::CatalogClient;

/// Upper bound on alternatives resolved for one product.
pub const MAX_ALTERNATIVES: usize = 5;

impl CatalogClient {
    /// Resolves the first [`MAX_ALTERNATIVES`] alternative identities of
    /// `product` into full products, concurrently and in listed order.
    ///
    /// Resolution is one level deep: the returned products carry their own
    /// alternative identities but those are not followed. Alternatives that
    /// fail to resolve are dropped with a warning.
    pub async fn fetch_alternatives(&self, product: &Product) -> Vec<Product> {
        let ids: Vec<&str> = product
            .alternatives
            .iter()
            .map(String::as_str)
            .filter(|id| *id != product.id)
            .take(MAX_ALTERNATIVES)
            .collect();
        if ids.is_empty() {
            return Vec::new();
        }

        let results = join_all(ids.iter().map(|id| self.fetch_product_by_id(id))).await;

        ids.iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(alt) => Some(alt),
                Err(e) => {
                    tracing::warn!(
                        product_id = %product.id,
                        alternative_id = %id,
                        error = %e,
                        "failed to resolve alternative"
                    );
                    None
                }
            })
            .collect()
    }
}
