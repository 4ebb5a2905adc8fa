//! Local scan history persisted as a JSON file, newest entry first.

pub mod error;
pub mod store;

pub use error::HistoryError;
pub use store::HistoryStore;
