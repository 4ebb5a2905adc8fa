//! Product lookups: a catalog record plus its impact and nutrition records,
//! normalized into a single [`Product`].

use ecoscan_core::Product;
use ecoscan_engine::{
    alternative_ids, observations_from_payload, record_identity, unwrap_envelope,
    RawNutrientObservation,
};
use serde::Serialize;
use serde_json::Value;

use super::CatalogClient;
use crate::error::ClientError;

#[derive(Debug, Serialize)]
struct ScanRequest<'a> {
    email: &'a str,
    barcode: &'a str,
}

impl CatalogClient {
    /// Looks up a product by barcode and normalizes it.
    ///
    /// Impact and nutrition records are fetched concurrently. Either one
    /// failing degrades to its default (no impact record, no observations)
    /// instead of failing the lookup.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the catalog has no such barcode or the
    ///   returned record carries no identity.
    /// - Any transport error from the product request itself.
    pub async fn fetch_product_by_barcode(&self, barcode: &str) -> Result<Product, ClientError> {
        let url = self.endpoint_url(&["products", "barcode", barcode], &[]);
        let payload = self.get_json(&url, &format!("product barcode {barcode}")).await?;
        let record = first_record(payload, url.as_str())?;
        self.assemble(&record).await
    }

    /// Looks up a product by catalog identity and normalizes it.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_product_by_barcode`].
    pub async fn fetch_product_by_id(&self, id: &str) -> Result<Product, ClientError> {
        let url = self.endpoint_url(&["products", id], &[]);
        let payload = self.get_json(&url, &format!("product {id}")).await?;
        let record = first_record(payload, url.as_str())?;
        self.assemble(&record).await
    }

    /// Fetches one page of the catalog listing and normalizes every record.
    ///
    /// Listing records are scored without impact or nutrition lookups.
    /// Records without an identity are skipped.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the listing request fails after retries.
    pub async fn list_products(&self, page: u32, size: u32) -> Result<Vec<Product>, ClientError> {
        let page = page.to_string();
        let size = size.to_string();
        let url = self.endpoint_url(&["products"], &[("page", &page), ("size", &size)]);
        let payload = self.get_json(&url, &format!("product page {page}")).await?;

        let records = unwrap_envelope(payload).into_records();
        let total = records.len();
        let products: Vec<Product> = records
            .iter()
            .filter_map(|record| match self.normalizer.normalize(record, None, &[]) {
                Ok(product) => Some(product.with_alternatives(alternative_ids(record))),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping catalog listing record");
                    None
                }
            })
            .collect();

        tracing::debug!(page = %page, total, kept = products.len(), "catalog page normalized");
        Ok(products)
    }

    /// Reports a scan to the catalog. Sent once, without retries.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedStatus`] (or another status error)
    /// for a non-2xx response, or [`ClientError::Http`] on network failure.
    pub async fn record_scan(&self, email: &str, barcode: &str) -> Result<(), ClientError> {
        let url = self.endpoint_url(&["scan"], &[]);
        let response = self
            .authorize(self.client.post(url))
            .json(&ScanRequest { email, barcode })
            .send()
            .await?;
        super::check_status(response)?;
        tracing::info!(barcode, "scan recorded");
        Ok(())
    }

    async fn fetch_impact(&self, id: &str) -> Result<Option<Value>, ClientError> {
        let url = self.endpoint_url(&["impact", id], &[]);
        let payload = self.get_json(&url, &format!("impact {id}")).await?;
        Ok(unwrap_envelope(payload)
            .into_record()
            .filter(Value::is_object))
    }

    async fn fetch_nutrition(&self, id: &str) -> Result<Vec<RawNutrientObservation>, ClientError> {
        let url = self.endpoint_url(&["nutrition", id], &[]);
        let payload = self.get_json(&url, &format!("nutrition {id}")).await?;
        Ok(observations_from_payload(payload))
    }

    /// Joins a product record with its impact and nutrition records.
    async fn assemble(&self, record: &Value) -> Result<Product, ClientError> {
        let id = record_identity(record).ok_or_else(|| ClientError::NotFound {
            resource: "catalog record has no id".to_owned(),
        })?;

        let (impact, nutrients) = tokio::join!(self.fetch_impact(&id), self.fetch_nutrition(&id));

        let impact = impact.unwrap_or_else(|e| {
            degraded(&id, "impact", &e);
            None
        });
        let nutrients = nutrients.unwrap_or_else(|e| {
            degraded(&id, "nutrition", &e);
            Vec::new()
        });

        let product = self
            .normalizer
            .normalize(record, impact.as_ref(), &nutrients)?
            .with_alternatives(alternative_ids(record));

        tracing::debug!(
            product_id = %product.id,
            health_score = product.health_score,
            sustainability_score = product.sustainability_score,
            "product normalized"
        );
        Ok(product)
    }
}

fn first_record(payload: Value, url: &str) -> Result<Value, ClientError> {
    unwrap_envelope(payload)
        .into_record()
        .ok_or_else(|| ClientError::NotFound {
            resource: url.to_owned(),
        })
}

fn degraded(product_id: &str, lookup: &str, err: &ClientError) {
    if matches!(err, ClientError::NotFound { .. }) {
        tracing::debug!(product_id, lookup, "no record, using defaults");
    } else {
        tracing::warn!(product_id, lookup, error = %err, "lookup failed, using defaults");
    }
}
