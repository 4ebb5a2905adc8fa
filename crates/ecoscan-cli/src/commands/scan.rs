use std::process::ExitCode;

use anyhow::Context;
use ecoscan_client::ClientError;
use ecoscan_core::{AppConfig, Product};
use ecoscan_history::HistoryStore;
use serde::Serialize;

use super::build_client;

#[derive(Debug, Serialize)]
struct ScanWithAlternatives<'a> {
    product: &'a Product,
    alternatives: &'a [Product],
}

/// Looks up `barcode`, prints the product, and records the scan.
///
/// The scan is written to local history first; reporting it to the catalog
/// is best effort and only attempted when a user email is configured.
///
/// # Errors
///
/// Returns an error if the lookup fails for any reason other than the
/// product not existing, or if the history file cannot be written.
pub(crate) async fn run_scan(
    config: &AppConfig,
    barcode: &str,
    with_alternatives: bool,
) -> anyhow::Result<ExitCode> {
    let client = build_client(config)?;

    let product = match client.fetch_product_by_barcode(barcode).await {
        Ok(product) => product,
        Err(ClientError::NotFound { resource }) => {
            tracing::debug!(barcode, resource = %resource, "barcode lookup found nothing");
            eprintln!("product not found");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).with_context(|| format!("failed to look up barcode {barcode}")),
    };

    let output = if with_alternatives {
        let alternatives = client.fetch_alternatives(&product).await;
        serde_json::to_string_pretty(&ScanWithAlternatives {
            product: &product,
            alternatives: &alternatives,
        })?
    } else {
        serde_json::to_string_pretty(&product)?
    };
    println!("{output}");

    let store = HistoryStore::open(&config.history_path);
    let reported_barcode = if product.barcode.is_empty() {
        barcode.to_owned()
    } else {
        product.barcode.clone()
    };
    store
        .record(product)
        .with_context(|| format!("failed to record scan in {}", store.path().display()))?;

    if let Some(email) = &config.user_email {
        if let Err(e) = client.record_scan(email, &reported_barcode).await {
            tracing::warn!(error = %e, barcode = %reported_barcode, "could not report scan to catalog; kept locally");
        }
    }

    Ok(ExitCode::SUCCESS)
}
