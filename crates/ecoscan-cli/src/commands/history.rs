use anyhow::Context;
use ecoscan_client::ClientError;
use ecoscan_core::{AppConfig, ScanHistoryEntry};
use ecoscan_history::HistoryStore;

use super::{build_client, fmt_score, fmt_truncated};

/// Prints scan history, newest first, or clears the local copy.
///
/// With `ECOSCAN_USER_EMAIL` set, the catalog's history for that user is
/// shown when it has any entries; otherwise the local history is used.
/// Clearing only affects the local file.
///
/// # Errors
///
/// Returns an error if the history file cannot be read, parsed or removed.
pub(crate) async fn run_history(config: &AppConfig, clear: bool) -> anyhow::Result<()> {
    let store = HistoryStore::open(&config.history_path);

    if clear {
        store
            .clear()
            .with_context(|| format!("failed to clear {}", store.path().display()))?;
        println!("history cleared");
        return Ok(());
    }

    let remote = match &config.user_email {
        Some(email) => fetch_remote(config, email).await,
        None => None,
    };

    let entries = match remote {
        Some(entries) => entries,
        None => store
            .entries()
            .with_context(|| format!("failed to read {}", store.path().display()))?,
    };

    if entries.is_empty() {
        println!("no scans recorded yet; run `scan <barcode>` first");
        return Ok(());
    }

    println!(
        "{:<18}{:<16}{:<34}{:<18}SUSTAINABILITY",
        "SCANNED", "BARCODE", "NAME", "HEALTH"
    );
    for entry in &entries {
        let product = &entry.product;
        println!(
            "{:<18}{:<16}{:<34}{:<18}{}",
            entry.scanned_at.format("%Y-%m-%d %H:%M"),
            fmt_truncated(&product.barcode, 15),
            fmt_truncated(&product.name, 33),
            fmt_score(product.health_score),
            fmt_score(product.sustainability_score),
        );
    }

    Ok(())
}

async fn fetch_remote(config: &AppConfig, email: &str) -> Option<Vec<ScanHistoryEntry>> {
    let client = match build_client(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "remote history unavailable, using local history");
            return None;
        }
    };
    prefer_remote(client.scan_history(email).await)
}

/// Remote entries win only when the request succeeded and returned some.
fn prefer_remote(
    remote: Result<Vec<ScanHistoryEntry>, ClientError>,
) -> Option<Vec<ScanHistoryEntry>> {
    match remote {
        Ok(entries) if !entries.is_empty() => {
            tracing::debug!(count = entries.len(), "showing remote scan history");
            Some(entries)
        }
        Ok(_) => {
            tracing::debug!("remote scan history empty, using local history");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load remote history, using local history");
            None
        }
    }
}
