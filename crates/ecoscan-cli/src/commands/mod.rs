//! Command handlers for the CLI.
//!
//! Called from `main` after configuration and logging are set up. `scan`
//! and `list` talk to the catalog API; `normalize` is local; `history`
//! reads the catalog's copy when a user email is configured.

mod history;
mod list;
mod normalize;
mod scan;

use anyhow::Context;
use ecoscan_client::{CatalogClient, ClientSettings};
use ecoscan_core::{AppConfig, ScoreRating};
use ecoscan_engine::{Normalizer, NutrientKeywords};

pub(crate) use history::run_history;
pub(crate) use list::run_list;
pub(crate) use normalize::run_normalize;
pub(crate) use scan::run_scan;

/// Builds the normalizer, extending the built-in keywords when a keyword
/// file is configured.
fn build_normalizer(config: &AppConfig) -> anyhow::Result<Normalizer> {
    let Some(path) = &config.keywords_path else {
        return Ok(Normalizer::default());
    };
    let file = ecoscan_core::load_keywords(path)
        .with_context(|| format!("failed to load keyword file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "nutrient keyword extensions loaded");
    Ok(Normalizer::new(NutrientKeywords::with_extensions(&file)))
}

fn build_client(config: &AppConfig) -> anyhow::Result<CatalogClient> {
    let client = CatalogClient::new(ClientSettings::from_config(config))
        .context("failed to build catalog client")?;
    Ok(client.with_normalizer(build_normalizer(config)?))
}

/// Formats a score with its rating band, e.g. `"72 (good)"`.
fn fmt_score(score: u8) -> String {
    format!("{score} ({})", ScoreRating::from_score(score))
}

/// Truncates `s` to at most `max` characters for table display.
fn fmt_truncated(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}\u{2026}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_score_includes_rating() {
        assert_eq!(fmt_score(85), "85 (excellent)");
        assert_eq!(fmt_score(60), "60 (good)");
        assert_eq!(fmt_score(40), "40 (fair)");
        assert_eq!(fmt_score(0), "0 (poor)");
    }

    #[test]
    fn fmt_truncated_keeps_short_names() {
        assert_eq!(fmt_truncated("Açaí", 10), "Açaí");
    }

    #[test]
    fn fmt_truncated_counts_characters_not_bytes() {
        assert_eq!(fmt_truncated("Açúcar mascavo orgânico", 8), "Açúcar \u{2026}");
    }
}
