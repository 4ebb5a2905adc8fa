use std::path::Path;

use anyhow::Context;
use ecoscan_core::{AppConfig, Product};
use ecoscan_engine::{alternative_ids, observations_from_payload, unwrap_envelope, Normalizer};
use serde_json::Value;

use super::build_normalizer;

/// Normalizes catalog payloads read from local files and prints the product.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, or if the product
/// payload holds no record with an identity.
pub(crate) fn run_normalize(
    config: &AppConfig,
    product_path: &Path,
    impact_path: Option<&Path>,
    nutrition_path: Option<&Path>,
) -> anyhow::Result<()> {
    let normalizer = build_normalizer(config)?;

    let raw_product = read_json(product_path)?;
    let raw_impact = impact_path.map(read_json).transpose()?;
    let raw_nutrition = nutrition_path.map(read_json).transpose()?;

    let product = normalize_payloads(&normalizer, raw_product, raw_impact, raw_nutrition)
        .with_context(|| format!("failed to normalize {}", product_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&product)?);
    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Unwraps each payload and normalizes the first product record.
fn normalize_payloads(
    normalizer: &Normalizer,
    raw_product: Value,
    raw_impact: Option<Value>,
    raw_nutrition: Option<Value>,
) -> anyhow::Result<Product> {
    let record = unwrap_envelope(raw_product)
        .into_record()
        .context("product payload holds no record")?;
    let impact = raw_impact.and_then(|payload| unwrap_envelope(payload).into_record());
    let nutrients = raw_nutrition.map(observations_from_payload).unwrap_or_default();

    let product = normalizer.normalize(&record, impact.as_ref(), &nutrients)?;
    Ok(product.with_alternatives(alternative_ids(&record)))
}
