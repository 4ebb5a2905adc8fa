//! Product normalization and scoring engine.
//!
//! Pure, synchronous transformations over catalog payloads that were already
//! fetched: envelope unwrapping, the nutrient fold, the two score models, and
//! the normalizer that composes them into an [`ecoscan_core::Product`].
//! Nothing in this crate performs I/O or holds process-wide state.

pub mod envelope;
pub mod error;
pub mod normalize;
pub mod nutrients;
pub mod raw;
pub mod score;

pub use envelope::{strip_links, unwrap_envelope, Unwrapped};
pub use error::EngineError;
pub use normalize::{alternative_ids, normalize_product, record_identity, Normalizer};
pub use nutrients::{build_profile, NutrientKeywords};
pub use raw::{observations_from_payload, RawNutrientObservation};
pub use score::{classify_packaging, health_score, sustainability_score};
