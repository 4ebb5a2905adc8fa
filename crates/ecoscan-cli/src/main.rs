mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ecoscan-cli")]
#[command(about = "Product health and sustainability scoring from the catalog API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up a product by barcode, print it and record the scan
    Scan {
        /// Product barcode (e.g., 7891234567890)
        barcode: String,
        /// Also resolve suggested alternative products
        #[arg(long)]
        alternatives: bool,
    },
    /// Normalize catalog payloads from local JSON files without calling the API
    Normalize {
        /// Product record (single resource, embedded page, or bare list)
        #[arg(long)]
        product: PathBuf,
        /// Impact record for the product
        #[arg(long)]
        impact: Option<PathBuf>,
        /// Nutrient observation list for the product
        #[arg(long)]
        nutrition: Option<PathBuf>,
    },
    /// List catalog products with their scores
    List {
        /// Zero-based page number
        #[arg(long, default_value = "0")]
        page: u32,
        /// Products per page
        #[arg(long, default_value = "20")]
        size: u32,
    },
    /// Show scan history (remote when a user email is set) or clear the local copy
    History {
        /// Delete all recorded scans
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = ecoscan_core::load_app_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, base_url = %config.api_base_url, "configuration loaded");

    match cli.command {
        Commands::Scan {
            barcode,
            alternatives,
        } => commands::run_scan(&config, &barcode, alternatives).await,
        Commands::Normalize {
            product,
            impact,
            nutrition,
        } => commands::run_normalize(&config, &product, impact.as_deref(), nutrition.as_deref())
            .map(|()| ExitCode::SUCCESS),
        Commands::List { page, size } => commands::run_list(&config, page, size)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::History { clear } => commands::run_history(&config, clear)
            .await
            .map(|()| ExitCode::SUCCESS),
    }
}

#[cfg(test)]
mod tests;
