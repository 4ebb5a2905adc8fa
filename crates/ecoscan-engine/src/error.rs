use thiserror::Error;

/// The only failure the engine reports; every other gap in the input is
/// absorbed by default substitution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("product not found: {reason}")]
    NotFound { reason: String },
}
