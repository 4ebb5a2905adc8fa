//! HTTP client for the product catalog API.
//!
//! Owns transport concerns the engine deliberately avoids: timeouts, retries,
//! status interpretation and fan-out to the impact and nutrition endpoints.
//! Every response body is handed to [`ecoscan_engine`] for unwrapping and
//! normalization.

pub mod client;
pub mod error;

mod retry;

pub use client::{CatalogClient, ClientSettings, MAX_ALTERNATIVES};
pub use error::ClientError;
