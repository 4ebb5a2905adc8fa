//! Normalization from raw catalog records to [`ecoscan_core::Product`].
//!
//! Nutrient folding lives in [`crate::nutrients`] and scoring in
//! [`crate::score`]; this module reads the raw records and assembles the
//! result.

use ecoscan_core::{EnvironmentalImpact, Product};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use crate::envelope::strip_links;
use crate::error::EngineError;
use crate::nutrients::NutrientKeywords;
use crate::raw::{nonzero_number_field, text_field, RawNutrientObservation};
use crate::score::{classify_packaging, health_score, sustainability_score};

const PLACEHOLDER_IMAGE_BASE: &str = "https://via.placeholder.com/400?text=";
const PLACEHOLDER_IMAGE_LABEL: &str = "Produto";

/// Characters left unescaped in URI components (RFC 3986 unreserved plus `!*'()`).
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Turns raw catalog records into [`Product`]s.
///
/// Holds only the immutable nutrient keyword table, so one instance can be
/// shared freely or built per call.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    keywords: NutrientKeywords,
}

impl Normalizer {
    #[must_use]
    pub fn new(keywords: NutrientKeywords) -> Self {
        Self { keywords }
    }

    /// Normalizes a catalog record plus its optional impact record and
    /// nutrient observations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if `raw_product` is not an object or
    /// carries no identity. Every other gap in the input falls back to a
    /// default.
    pub fn normalize(
        &self,
        raw_product: &Value,
        raw_impact: Option<&Value>,
        raw_nutrients: &[RawNutrientObservation],
    ) -> Result<Product, EngineError> {
        let Value::Object(product) = strip_links(raw_product.clone()) else {
            return Err(EngineError::NotFound {
                reason: "catalog record is not an object".into(),
            });
        };

        let id = identity(&product).ok_or_else(|| EngineError::NotFound {
            reason: "catalog record has no id".into(),
        })?;

        let impact = raw_impact.and_then(Value::as_object);

        let fallback_calories = nonzero_number_field(&product, "kcal100g").unwrap_or(0.0);
        let nutritional_info = self
            .keywords
            .build_profile(raw_nutrients, fallback_calories);

        // Impact-record carbon wins; the catalog record's own figure is the fallback.
        let carbon_footprint = impact
            .and_then(|i| nonzero_number_field(i, "co2PerUnit"))
            .or_else(|| nonzero_number_field(&product, "co2PerUnit"))
            .unwrap_or(0.0);
        let water_usage = impact
            .and_then(|i| nonzero_number_field(i, "waterL"))
            .unwrap_or(0.0);
        let origin = impact
            .and_then(|i| text_field(i, "origin"))
            .unwrap_or_default();

        let sustainability = sustainability_score(carbon_footprint, water_usage, &origin);
        let environmental_impact = EnvironmentalImpact {
            carbon_footprint,
            water_usage,
            packaging_type: classify_packaging(&origin),
            sustainability_score: sustainability,
        };

        let name = text_field(&product, "name").unwrap_or_default();
        let image = text_field(&product, "image")
            .or_else(|| text_field(&product, "imageUrl"))
            .unwrap_or_else(|| placeholder_image(&name));

        Ok(Product {
            id,
            brand: text_field(&product, "category").unwrap_or_default(),
            barcode: text_field(&product, "barcode").unwrap_or_default(),
            image,
            health_score: health_score(&nutritional_info),
            sustainability_score: sustainability,
            nutritional_info,
            environmental_impact,
            alternatives: Vec::new(),
            name,
        })
    }
}

/// Normalizes with the built-in nutrient keyword table.
///
/// # Errors
///
/// Returns [`EngineError::NotFound`] if `raw_product` carries no identity.
pub fn normalize_product(
    raw_product: &Value,
    raw_impact: Option<&Value>,
    raw_nutrients: &[RawNutrientObservation],
) -> Result<Product, EngineError> {
    Normalizer::default().normalize(raw_product, raw_impact, raw_nutrients)
}

/// Alternative product identities listed on a raw catalog record.
///
/// Reads the optional `alternatives` array (strings or numbers), dropping
/// blanks, duplicates and the record's own identity. Resolving these into
/// products is the caller's job.
#[must_use]
pub fn alternative_ids(raw_product: &Value) -> Vec<String> {
    let own_id = raw_product.as_object().and_then(identity);
    let Some(Value::Array(items)) = raw_product.get("alternatives") else {
        return Vec::new();
    };

    let mut ids: Vec<String> = Vec::new();
    for item in items {
        let id = match item {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        if id.is_empty() || own_id.as_deref() == Some(id.as_str()) || ids.contains(&id) {
            continue;
        }
        ids.push(id);
    }
    ids
}

/// Upstream identity of a raw catalog record, if it carries one.
///
/// Lets callers key follow-up lookups before normalizing.
#[must_use]
pub fn record_identity(raw_product: &Value) -> Option<String> {
    raw_product.as_object().and_then(identity)
}

/// Missing, null, blank, zero or non-scalar ids count as absent.
fn identity(record: &Map<String, Value>) -> Option<String> {
    match record.get("id")? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn placeholder_image(name: &str) -> String {
    let label = if name.is_empty() {
        PLACEHOLDER_IMAGE_LABEL
    } else {
        name
    };
    format!(
        "{PLACEHOLDER_IMAGE_BASE}{}",
        utf8_percent_encode(label, URI_COMPONENT)
    )
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
