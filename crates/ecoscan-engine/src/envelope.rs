//! Unwrapping of catalog response envelopes.
//!
//! The catalog answers in three shapes:
//!
//! ```text
//! {"_embedded": {"productList": [ ... ]}, "_links": {...}}   embedded collection
//! {"content": [ ... ], "page": {...}}                          paginated page
//! {"id": "42", ..., "_links": {...}}                           single resource
//! ```
//!
//! Resolution is first-match-wins in that order. When `_embedded` holds more
//! than one collection, the **first key in document order** is taken;
//! `serde_json` is built with `preserve_order` so that order survives
//! decoding. Shapes that match none of the rules pass through untouched.

use serde_json::Value;

const EMBEDDED_KEY: &str = "_embedded";
const CONTENT_KEY: &str = "content";
const LINKS_KEY: &str = "_links";

/// Result of [`unwrap_envelope`]: a single record or a list of records.
#[derive(Debug, Clone, PartialEq)]
pub enum Unwrapped {
    One(Value),
    Many(Vec<Value>),
}

impl Unwrapped {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Unwrapped::Many(items),
            other => Unwrapped::One(other),
        }
    }

    /// Flattens into a list; a single record becomes a one-element list.
    #[must_use]
    pub fn into_records(self) -> Vec<Value> {
        match self {
            Unwrapped::One(value) => vec![value],
            Unwrapped::Many(values) => values,
        }
    }

    /// Returns the single record, or the first element of a list.
    #[must_use]
    pub fn into_record(self) -> Option<Value> {
        match self {
            Unwrapped::One(value) => Some(value),
            Unwrapped::Many(values) => values.into_iter().next(),
        }
    }
}

/// Strips transport wrapping from a decoded catalog payload.
///
/// The embedded collection's value is used as-is: it is not unwrapped
/// again, and `_links` inside its items is left for the caller.
#[must_use]
pub fn unwrap_envelope(payload: Value) -> Unwrapped {
    let mut map = match payload {
        Value::Object(map) => map,
        other => return Unwrapped::from_value(other),
    };

    if let Some(Value::Object(embedded)) = map.get_mut(EMBEDDED_KEY) {
        if let Some(name) = embedded.keys().next().cloned() {
            if let Some(first) = embedded.remove(&name) {
                tracing::debug!(collection = %name, "unwrapped embedded collection");
                return Unwrapped::from_value(first);
            }
        }
    }

    if matches!(map.get(CONTENT_KEY), Some(Value::Array(_))) {
        if let Some(Value::Array(items)) = map.remove(CONTENT_KEY) {
            tracing::debug!(count = items.len(), "unwrapped paginated content");
            return Unwrapped::Many(items);
        }
    }

    map.remove(LINKS_KEY);
    Unwrapped::One(Value::Object(map))
}

/// Removes `_links` from an object; any other value is returned unchanged.
#[must_use]
pub fn strip_links(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            map.remove(LINKS_KEY);
            Value::Object(map)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn embedded_collection_list_is_returned() {
        let payload = json!({
            "_embedded": {"productList": [{"id": "A"}, {"id": "B"}]},
            "_links": {"self": {"href": "/api/products"}}
        });
        assert_eq!(
            unwrap_envelope(payload),
            Unwrapped::Many(vec![json!({"id": "A"}), json!({"id": "B"})])
        );
    }

    #[test]
    fn embedded_takes_first_collection_in_document_order() {
        let payload = json!({
            "_embedded": {
                "zebraList": [{"id": "Z"}],
                "appleList": [{"id": "A"}]
            }
        });
        assert_eq!(
            unwrap_envelope(payload),
            Unwrapped::Many(vec![json!({"id": "Z"})])
        );
    }

    #[test]
    fn embedded_single_record_is_used_as_is() {
        let payload = json!({
            "_embedded": {"product": {"id": "A", "_links": {"self": {}}}}
        });
        assert_eq!(
            unwrap_envelope(payload),
            Unwrapped::One(json!({"id": "A", "_links": {"self": {}}}))
        );
    }

    #[test]
    fn embedded_wins_over_content() {
        let payload = json!({
            "_embedded": {"productList": [{"id": "E"}]},
            "content": [{"id": "C"}]
        });
        assert_eq!(
            unwrap_envelope(payload),
            Unwrapped::Many(vec![json!({"id": "E"})])
        );
    }

    #[test]
    fn empty_embedded_falls_through_to_content() {
        let payload = json!({"_embedded": {}, "content": [{"id": "C"}]});
        assert_eq!(
            unwrap_envelope(payload),
            Unwrapped::Many(vec![json!({"id": "C"})])
        );
    }

    #[test]
    fn paginated_content_is_returned() {
        let payload = json!({
            "content": [{"id": "A"}],
            "page": {"size": 20, "number": 0, "totalElements": 1}
        });
        assert_eq!(
            unwrap_envelope(payload),
            Unwrapped::Many(vec![json!({"id": "A"})])
        );
    }

    #[test]
    fn non_list_content_is_treated_as_a_plain_field() {
        let payload = json!({"id": "A", "content": "500g pouch", "_links": {}});
        assert_eq!(
            unwrap_envelope(payload),
            Unwrapped::One(json!({"id": "A", "content": "500g pouch"}))
        );
    }

    #[test]
    fn flat_record_has_links_stripped() {
        let payload = json!({"id": "A", "name": "Granola", "_links": {"self": {"href": "/x"}}});
        assert_eq!(
            unwrap_envelope(payload),
            Unwrapped::One(json!({"id": "A", "name": "Granola"}))
        );
    }

    #[test]
    fn bare_array_passes_through_as_list() {
        let payload = json!([{"id": "A"}]);
        assert_eq!(
            unwrap_envelope(payload),
            Unwrapped::Many(vec![json!({"id": "A"})])
        );
    }

    #[test]
    fn scalar_passes_through_unchanged() {
        assert_eq!(
            unwrap_envelope(json!("ok")),
            Unwrapped::One(json!("ok"))
        );
    }

    #[test]
    fn into_record_takes_first_list_element() {
        let unwrapped = Unwrapped::Many(vec![json!({"id": "A"}), json!({"id": "B"})]);
        assert_eq!(unwrapped.into_record(), Some(json!({"id": "A"})));
        assert_eq!(Unwrapped::Many(Vec::new()).into_record(), None);
    }

    #[test]
    fn into_records_wraps_single_record() {
        let unwrapped = Unwrapped::One(json!({"id": "A"}));
        assert_eq!(unwrapped.into_records(), vec![json!({"id": "A"})]);
    }

    #[test]
    fn strip_links_ignores_non_objects() {
        assert_eq!(strip_links(json!([1, 2])), json!([1, 2]));
        assert_eq!(
            strip_links(json!({"id": 1, "_links": {}})),
            json!({"id": 1})
        );
    }
}
