use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::products::Product;

/// One scan recorded in local history.
///
/// Holds the full [`Product`] snapshot rather than just its identity so the
/// entry stays displayable after the catalog record changes or disappears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanHistoryEntry {
    pub id: Uuid,
    pub product_id: String,
    pub scanned_at: DateTime<Utc>,
    pub product: Product,
}

impl ScanHistoryEntry {
    /// Creates an entry for `product` stamped with the current time.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self::at(product, Utc::now())
    }

    /// Creates an entry for `product` stamped with `scanned_at`.
    #[must_use]
    pub fn at(product: Product, scanned_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: product.id.clone(),
            scanned_at,
            product,
        }
    }
}
