//! Opaque pagination cursors.
//!
//! A cursor wraps the store's continuation key together with the scope of the
//! query that produced it, so a cursor replayed under a different filter set
//! is detected instead of silently resuming the wrong traversal.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{EntitySchema, Filters, PlanError};
use crate::storage::Item;

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
    #[serde(rename = "s")]
    scope: String,
    #[serde(rename = "k")]
    key: Item,
}

/// Identifies one query shape: the entity plus its exact filter set.
pub fn scope_of(schema: &EntitySchema, filters: &Filters) -> String {
    let mut hasher = Sha256::new();
    hasher.update(schema.name.as_bytes());
    hasher.update([0]);
    hasher.update(filters.canonical().as_bytes());
    let digest = hasher.finalize();
    URL_SAFE_NO_PAD.encode(&digest[..12])
}

/// Encodes a continuation key under `scope`.
pub fn encode(scope: &str, key: &Item) -> String {
    let payload = CursorPayload {
        scope: scope.to_string(),
        key: key.clone(),
    };
    // Serializing a map of JSON values cannot fail.
    let json = serde_json::to_vec(&payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decodes a cursor, rejecting one produced under another scope.
pub fn decode(cursor: &str, scope: &str) -> Result<Item, PlanError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(cursor.trim())
        .map_err(|_| PlanError::MalformedCursor)?;
    let payload: CursorPayload =
        serde_json::from_slice(&bytes).map_err(|_| PlanError::MalformedCursor)?;

    if payload.scope != scope {
        return Err(PlanError::StaleCursor);
    }
    Ok(payload.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterField, FilterKind};
    use crate::storage::Order;
    use serde_json::json;

    const PRODUCTS: EntitySchema = EntitySchema {
        name: "products",
        partition_key: "collection",
        sort_key: Some("name"),
        index: None,
        order: Order::Ascending,
        filters: &[FilterField::new("maxPrice", "price", FilterKind::AtMost)],
    };

    fn last_key() -> Item {
        json!({"collection": "home-living", "name": "Woven Basket"})
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_decode_returns_key_under_same_scope() {
        let scope = scope_of(&PRODUCTS, &Filters::new().with("maxPrice", 50_i64));
        let cursor = encode(&scope, &last_key());

        assert_eq!(decode(&cursor, &scope), Ok(last_key()));
    }

    #[test]
    fn test_decode_rejects_other_filter_set() {
        let scope = scope_of(&PRODUCTS, &Filters::new().with("maxPrice", 50_i64));
        let other = scope_of(&PRODUCTS, &Filters::new().with("maxPrice", 80_i64));
        let cursor = encode(&scope, &last_key());

        assert_eq!(decode(&cursor, &other), Err(PlanError::StaleCursor));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(
            decode("not a cursor!", "scope"),
            Err(PlanError::MalformedCursor)
        );
        let not_json = URL_SAFE_NO_PAD.encode(b"plain text");
        assert_eq!(decode(&not_json, "scope"), Err(PlanError::MalformedCursor));
    }

    #[test]
    fn test_cursor_is_url_safe() {
        let cursor = encode("scope", &last_key());
        assert!(cursor
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
