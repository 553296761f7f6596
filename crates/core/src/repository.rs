//! Persistence slot for the cart.
//!
//! The cart is stored as one JSON document in a single key-value slot
//! (key [`CART_STORAGE_KEY`]). [`CartRepository`] abstracts where that slot
//! lives: the storefront writes it to a file, tests use
//! [`InMemoryCartRepository`].
//!
//! # Stored schema
//!
//! ```json
//! [
//!   { "id": "p2", "title": "VFD 2.2kW (3ph)", "price": 24500, "quantity": 3,
//!     "kind": "product", "sku": "VFD-2K2", "stock": 7 }
//! ]
//! ```
//!
//! Only `id` and `quantity` (alias `qty`) are required to read a line back;
//! the remaining fields are a copy of the catalog item at add time and are
//! informational. Decoding is per line: a line that does not match the schema
//! is dropped without discarding its neighbours.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLine;
use crate::catalog::ItemKind;
use crate::types::{Inr, ItemId};

/// Fixed key of the cart slot.
pub const CART_STORAGE_KEY: &str = "fixev_cart";

/// Errors reading or writing the slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The slot contents could not be encoded.
    #[error("storage encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A durable slot holding the serialized cart.
///
/// Implementations must give read-your-writes consistency: a `load` after a
/// successful `save` returns what was saved.
pub trait CartRepository: Send + Sync {
    /// Read the raw slot contents. `Ok(None)` means the slot was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the slot contents.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn save(&self, payload: &str) -> Result<(), StorageError>;
}

impl<R: CartRepository + ?Sized> CartRepository for Arc<R> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        (**self).save(payload)
    }
}

/// In-memory slot, shared between clones.
///
/// Two engines built from clones of the same repository see each other's
/// writes, which is how tests model a page reload.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartRepository {
    slot: Arc<Mutex<Option<String>>>,
}

impl InMemoryCartRepository {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with `payload`.
    #[must_use]
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    /// Current raw contents.
    #[must_use]
    pub fn payload(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartRepository for InMemoryCartRepository {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.payload())
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.to_owned());
        Ok(())
    }
}

/// One cart line as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLine {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Inr,
    #[serde(alias = "qty")]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<StoredKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Item kind tag as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredKind {
    Product,
    Course,
}

impl From<&CartLine> for StoredLine {
    fn from(line: &CartLine) -> Self {
        let item = line.item();
        let (kind, sku, length) = match &item.kind {
            ItemKind::Product { sku } => (StoredKind::Product, Some(sku.clone()), None),
            ItemKind::Course { length } => (StoredKind::Course, None, Some(length.clone())),
        };
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            price: item.price,
            quantity: i64::from(line.quantity()),
            kind: Some(kind),
            sku,
            length,
            stock: item.stock,
        }
    }
}

/// Serialize lines for the slot.
///
/// # Errors
///
/// Returns `StorageError::Encode` if serialization fails.
pub fn encode_lines(lines: &[CartLine]) -> Result<String, StorageError> {
    let stored: Vec<StoredLine> = lines.iter().map(StoredLine::from).collect();
    Ok(serde_json::to_string(&stored)?)
}

/// Outcome of decoding a slot payload.
#[derive(Debug, Default)]
pub struct DecodedSlot {
    /// Lines that matched the schema, in stored order.
    pub lines: Vec<StoredLine>,
    /// Number of array entries that did not match the schema.
    pub rejected: usize,
}

/// Decode a slot payload.
///
/// # Errors
///
/// Returns the JSON error when the payload is not a JSON array at all; the
/// caller treats that as an empty cart.
pub fn decode_lines(payload: &str) -> Result<DecodedSlot, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(payload)?;
    let mut decoded = DecodedSlot::default();
    for entry in entries {
        match serde_json::from_value::<StoredLine>(entry) {
            Ok(line) => decoded.lines.push(line),
            Err(_) => decoded.rejected += 1,
        }
    }
    Ok(decoded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_read_your_writes() {
        let repo = InMemoryCartRepository::new();
        assert!(repo.load().unwrap().is_none());

        repo.save("[]").unwrap();
        assert_eq!(repo.load().unwrap().as_deref(), Some("[]"));

        let clone = repo.clone();
        clone.save("[1]").unwrap();
        assert_eq!(repo.payload().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_decode_accepts_legacy_qty_field() {
        let payload = r#"[{"id":"p1","title":"Refurbished ECM","price":6500,"sku":"ECM-RF-01","stock":4,"qty":2}]"#;
        let decoded = decode_lines(payload).unwrap();
        assert_eq!(decoded.rejected, 0);
        assert_eq!(decoded.lines[0].id, ItemId::new("p1"));
        assert_eq!(decoded.lines[0].quantity, 2);
    }

    #[test]
    fn test_decode_drops_lines_not_matching_schema() {
        let payload = r#"[{"id":"p1","quantity":1},{"title":"no id"},42,{"id":"p2","quantity":"three"}]"#;
        let decoded = decode_lines(payload).unwrap();
        assert_eq!(decoded.lines.len(), 1);
        assert_eq!(decoded.rejected, 3);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        assert!(decode_lines("{\"id\":\"p1\"}").is_err());
        assert!(decode_lines("not json").is_err());
    }
}
