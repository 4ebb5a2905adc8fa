//! Raw catalog shapes and lenient field readers.
//!
//! Catalog records are read as untyped JSON because the upstream shape
//! drifts. Numeric signals may arrive as JSON numbers or as text such as
//! `"12.5"` or `"12.5 g"`; both are accepted.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::envelope::{strip_links, unwrap_envelope, Unwrapped};

/// One entry of a product's nutrient list, e.g. `{"nutriKey": "Sódio", "nutriValue": "120"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNutrientObservation {
    /// Free-text nutrient name in any casing or language.
    #[serde(rename = "nutriKey", default, deserialize_with = "text_or_number")]
    pub key: String,
    /// Numeric value encoded as text.
    #[serde(rename = "nutriValue", default, deserialize_with = "text_or_number")]
    pub value: String,
}

impl RawNutrientObservation {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The observation's value as a number, `0.0` when it does not parse.
    #[must_use]
    pub fn numeric_value(&self) -> f64 {
        parse_leading_number(&self.value).unwrap_or(0.0)
    }
}

/// Accepts a string, a number, or null (as the empty string).
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Extracts nutrient observations from a nutrition endpoint payload.
///
/// Envelopes are unwrapped first. Anything that is not a list yields no
/// observations, and list items that are not objects are skipped.
#[must_use]
pub fn observations_from_payload(payload: Value) -> Vec<RawNutrientObservation> {
    let Unwrapped::Many(items) = unwrap_envelope(payload) else {
        tracing::debug!("nutrition payload is not a list; using no observations");
        return Vec::new();
    };

    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| match serde_json::from_value(strip_links(item)) {
            Ok(observation) => Some(observation),
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed nutrient observation");
                None
            }
        })
        .collect()
}

/// Parses the longest numeric prefix of `s`, ignoring leading whitespace.
///
/// `"12.5 g"` → `12.5`, `"-3"` → `-3.0`, `"1e3kcal"` → `1000.0`,
/// `"abc"` → `None`. Non-finite results are rejected.
#[must_use]
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;

    if i < len && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < len && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads `key` as a number from a JSON number or numeric text.
pub(crate) fn number_field(record: &Map<String, Value>, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_number(s),
        _ => None,
    }
}

/// Like [`number_field`], but a zero reading counts as absent so the caller
/// can fall through to the next source.
pub(crate) fn nonzero_number_field(record: &Map<String, Value>, key: &str) -> Option<f64> {
    number_field(record, key).filter(|v| *v != 0.0)
}

/// Reads `key` as trimmed, non-empty text. Numbers are rendered as text.
pub(crate) fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
