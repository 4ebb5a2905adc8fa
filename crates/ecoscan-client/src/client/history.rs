//! Remote scan history for a user.

use chrono::{DateTime, NaiveDateTime, Utc};
use ecoscan_core::ScanHistoryEntry;
use ecoscan_engine::{strip_links, unwrap_envelope};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::CatalogClient;
use crate::error::ClientError;

impl CatalogClient {
    /// Fetches the scans the catalog has recorded for `email`, as returned
    /// by the API (newest first on the server side).
    ///
    /// A 404 means the user has no history and yields an empty list. Items
    /// with neither a product nor a product id are skipped.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails after retries.
    pub async fn scan_history(&self, email: &str) -> Result<Vec<ScanHistoryEntry>, ClientError> {
        let url = self.endpoint_url(&["scan", "history"], &[("email", email)]);
        let payload = match self.get_json(&url, "scan history").await {
            Ok(payload) => payload,
            Err(ClientError::NotFound { .. }) => {
                tracing::debug!("no remote scan history");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let records = unwrap_envelope(payload).into_records();
        let total = records.len();
        let entries: Vec<ScanHistoryEntry> = records
            .into_iter()
            .filter_map(|record| match strip_links(record) {
                Value::Object(item) => self.history_entry(item),
                _ => None,
            })
            .collect();

        tracing::debug!(total, kept = entries.len(), "remote scan history fetched");
        Ok(entries)
    }

    fn history_entry(&self, mut item: Map<String, Value>) -> Option<ScanHistoryEntry> {
        let product_id = item.get("productId").and_then(id_text);

        let mut raw_product = match item.remove("product") {
            Some(Value::Object(product)) => product,
            _ => Map::new(),
        };
        if !raw_product.contains_key("id") {
            if let Some(id) = &product_id {
                raw_product.insert("id".to_owned(), Value::String(id.clone()));
            }
        }

        let product = match self.normalizer.normalize(&Value::Object(raw_product), None, &[]) {
            Ok(product) => product,
            Err(e) => {
                tracing::warn!(error = %e, "skipping scan history item");
                return None;
            }
        };

        Some(ScanHistoryEntry {
            id: item
                .get("id")
                .and_then(Value::as_str)
                .and_then(|id| Uuid::parse_str(id).ok())
                .unwrap_or_else(Uuid::new_v4),
            product_id: product_id.unwrap_or_else(|| product.id.clone()),
            scanned_at: item
                .get("scannedAt")
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now),
            product,
        })
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// RFC 3339, or a zone-less ISO timestamp read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|ts| ts.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamps_with_and_without_zone() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T09:30:00-03:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn product_ids_accept_numbers_and_trim_strings() {
        assert_eq!(id_text(&Value::from(42)), Some("42".to_owned()));
        assert_eq!(id_text(&Value::from(" 7 ")), Some("7".to_owned()));
        assert_eq!(id_text(&Value::from("  ")), None);
        assert_eq!(id_text(&Value::Null), None);
    }
}
