use anyhow::Context;
use ecoscan_core::AppConfig;

use super::{build_client, fmt_score, fmt_truncated};

/// Prints one page of catalog products with their scores.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub(crate) async fn run_list(config: &AppConfig, page: u32, size: u32) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let products = client
        .list_products(page, size)
        .await
        .with_context(|| format!("failed to list products (page {page}, size {size})"))?;

    if products.is_empty() {
        println!("no products on page {page}");
        return Ok(());
    }

    println!(
        "{:<10}{:<16}{:<34}{:<18}SUSTAINABILITY",
        "ID", "BARCODE", "NAME", "HEALTH"
    );
    for product in &products {
        println!(
            "{:<10}{:<16}{:<34}{:<18}{}",
            fmt_truncated(&product.id, 9),
            fmt_truncated(&product.barcode, 15),
            fmt_truncated(&product.name, 33),
            fmt_score(product.health_score),
            fmt_score(product.sustainability_score),
        );
    }

    Ok(())
}
