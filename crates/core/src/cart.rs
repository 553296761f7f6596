//! Cart engine.
//!
//! [`CartEngine`] owns the ordered list of cart lines and is the only way to
//! change it. Every mutation that changes the cart:
//!
//! 1. bumps [`CartEngine::revision`],
//! 2. writes the full line list through the [`CartRepository`],
//! 3. notifies every registered [`CartObserver`].
//!
//! # Invariants
//!
//! - At most one line per item id; lines keep insertion order.
//! - Every line quantity is at least 1. Setting a quantity of zero or less
//!   removes the line.
//! - [`CartEngine::subtotal`] is recomputed from the lines on every call.
//!
//! Persistence failures are logged and swallowed: the in-memory cart stays
//! authoritative for the running instance.

use crate::catalog::{Catalog, CatalogItem};
use crate::repository::{CartRepository, decode_lines, encode_lines};
use crate::types::{Inr, ItemId};

/// One line in the cart: a snapshot of the catalog item and a quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    item: CatalogItem,
    quantity: u32,
}

impl CartLine {
    /// The catalog item as it was when added (or as re-read from the catalog
    /// on rehydration).
    #[must_use]
    pub const fn item(&self) -> &CatalogItem {
        &self.item
    }

    #[must_use]
    pub const fn id(&self) -> &ItemId {
        &self.item.id
    }

    /// Quantity, always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Inr {
        self.item.price.times(self.quantity)
    }
}

/// Result of [`CartEngine::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now holds this quantity.
    Updated(u32),
    /// The requested quantity was zero or negative, so the line was removed.
    Removed,
    /// No line with that id; nothing changed.
    NotInCart,
}

/// Receives the cart state after every change.
pub trait CartObserver: Send + Sync {
    fn cart_changed(&self, lines: &[CartLine], subtotal: Inr);
}

impl<F> CartObserver for F
where
    F: Fn(&[CartLine], Inr) + Send + Sync,
{
    fn cart_changed(&self, lines: &[CartLine], subtotal: Inr) {
        self(lines, subtotal);
    }
}

/// The cart state container.
pub struct CartEngine<R> {
    repository: R,
    lines: Vec<CartLine>,
    observers: Vec<Box<dyn CartObserver>>,
    revision: u64,
}

impl<R: CartRepository> CartEngine<R> {
    /// Create an empty cart without reading the slot.
    #[must_use]
    pub const fn new(repository: R) -> Self {
        Self {
            repository,
            lines: Vec::new(),
            observers: Vec::new(),
            revision: 0,
        }
    }

    /// Create a cart from whatever the slot holds.
    ///
    /// A missing, unreadable or malformed slot yields an empty cart. Stored
    /// lines are validated against `catalog`: unknown ids and quantities below
    /// 1 are dropped, duplicate ids are merged, and title/price come from the
    /// catalog rather than the stored copy.
    #[must_use]
    pub fn rehydrate(repository: R, catalog: &Catalog) -> Self {
        let payload = match repository.load() {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!("No stored cart, starting empty");
                return Self::new(repository);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
                return Self::new(repository);
            }
        };

        let decoded = match decode_lines(&payload) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(error = %e, "Stored cart is malformed, starting empty");
                return Self::new(repository);
            }
        };

        let mut engine = Self::new(repository);
        let mut discarded = decoded.rejected;

        for stored in decoded.lines {
            let Some(item) = catalog.item(stored.id.as_str()) else {
                discarded += 1;
                continue;
            };
            let quantity = match u32::try_from(stored.quantity) {
                Ok(q) if q > 0 => q,
                _ => {
                    discarded += 1;
                    continue;
                }
            };
            engine.merge_line(item, quantity);
        }

        if discarded > 0 {
            tracing::warn!(discarded, "Discarded invalid lines from stored cart");
        }
        tracing::debug!(
            lines = engine.lines.len(),
            item_count = engine.item_count(),
            "Cart rehydrated"
        );

        engine
    }

    /// Register an observer notified after every change.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Add `quantity` of `item`, merging with an existing line.
    ///
    /// Adding zero is a no-op. Stock is not checked.
    pub fn add(&mut self, item: &CatalogItem, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.merge_line(item, quantity);
        self.changed();
    }

    /// Remove the line for `id`. Returns `false` (and changes nothing) if there
    /// is no such line.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.item.id != *id);
        if self.lines.len() == before {
            return false;
        }
        self.changed();
        true
    }

    /// Replace the quantity of an existing line. Zero or negative removes it.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> QuantityUpdate {
        let Some(pos) = self.lines.iter().position(|line| line.item.id == *id) else {
            return QuantityUpdate::NotInCart;
        };

        let outcome = if quantity <= 0 {
            self.lines.remove(pos);
            QuantityUpdate::Removed
        } else {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            if let Some(line) = self.lines.get_mut(pos) {
                line.quantity = quantity;
            }
            QuantityUpdate::Updated(quantity)
        };

        self.changed();
        outcome
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.changed();
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Inr {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item.id == *id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Incremented on every change.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    fn merge_line(&mut self, item: &CatalogItem, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.item.id == item.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                item: item.clone(),
                quantity,
            });
        }
    }

    fn changed(&mut self) {
        self.revision += 1;

        if let Err(e) = encode_lines(&self.lines).and_then(|payload| self.repository.save(&payload))
        {
            tracing::warn!(error = %e, revision = self.revision, "Failed to persist cart");
        }

        let subtotal = self.subtotal();
        for observer in &self.observers {
            observer.cart_changed(&self.lines, subtotal);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::repository::{InMemoryCartRepository, StorageError};

    fn engine() -> (CartEngine<InMemoryCartRepository>, Catalog) {
        (CartEngine::new(InMemoryCartRepository::new()), Catalog::builtin())
    }

    fn assert_subtotal_consistent<R: CartRepository>(engine: &CartEngine<R>) {
        let expected: u64 = engine
            .lines()
            .iter()
            .map(|l| l.item().price.rupees() * u64::from(l.quantity()))
            .sum();
        assert_eq!(engine.subtotal(), Inr::new(expected));
    }

    #[test]
    fn test_repeated_add_merges_into_one_line() {
        let (mut cart, catalog) = engine();
        let vfd = catalog.product("p2").unwrap();

        cart.add(vfd, 1);
        cart.add(vfd, 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line("p2").unwrap().quantity(), 3);
        assert_eq!(cart.subtotal(), Inr::new(73500));
    }

    #[test]
    fn test_add_sequence_quantity_is_sum() {
        let (mut cart, catalog) = engine();
        let kit = catalog.product("p4").unwrap();
        let quantities = [1, 5, 2, 9, 1];

        for q in quantities {
            cart.add(kit, q);
            assert_subtotal_consistent(&cart);
        }

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), quantities.iter().sum::<u32>());
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let (mut cart, catalog) = engine();
        cart.add(catalog.product("p3").unwrap(), 1);
        cart.add(catalog.product("p1").unwrap(), 1);
        cart.add(catalog.course("t1").unwrap(), 1);
        cart.add(catalog.product("p3").unwrap(), 1);

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, ["p3", "p1", "t1"]);
    }

    #[test]
    fn test_two_products_then_clear() {
        let (mut cart, catalog) = engine();
        cart.add(catalog.product("p1").unwrap(), 1);
        cart.add(catalog.product("p3").unwrap(), 1);
        assert_eq!(cart.subtotal(), Inr::new(19300));

        cart.clear();
        assert_eq!(cart.subtotal(), Inr::ZERO);
        assert!(cart.is_empty());
        assert_eq!(cart.repository().payload().as_deref(), Some("[]"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut cart, catalog) = engine();
        cart.add(catalog.product("p1").unwrap(), 2);
        cart.add(catalog.product("p2").unwrap(), 1);

        assert!(cart.remove("p1"));
        let after_first = cart.lines().to_vec();
        let revision = cart.revision();

        assert!(!cart.remove("p1"));
        assert_eq!(cart.lines(), after_first.as_slice());
        assert_eq!(cart.revision(), revision);
        assert_subtotal_consistent(&cart);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let (mut cart, catalog) = engine();
        cart.add(catalog.product("p1").unwrap(), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.revision(), 0);
        assert!(cart.repository().payload().is_none());
    }

    #[test]
    fn test_set_quantity_policy() {
        let (mut cart, catalog) = engine();
        cart.add(catalog.product("p1").unwrap(), 1);
        cart.add(catalog.product("p2").unwrap(), 1);

        assert_eq!(cart.set_quantity("p1", 4), QuantityUpdate::Updated(4));
        assert_eq!(cart.line("p1").unwrap().quantity(), 4);
        assert_subtotal_consistent(&cart);

        assert_eq!(cart.set_quantity("p1", 0), QuantityUpdate::Removed);
        assert!(cart.line("p1").is_none());

        assert_eq!(cart.set_quantity("p2", -3), QuantityUpdate::Removed);
        assert!(cart.is_empty());

        assert_eq!(cart.set_quantity("p9", 2), QuantityUpdate::NotInCart);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_to_u32() {
        let (mut cart, catalog) = engine();
        cart.add(catalog.product("p4").unwrap(), 1);
        assert_eq!(
            cart.set_quantity("p4", i64::MAX),
            QuantityUpdate::Updated(u32::MAX)
        );
    }

    #[test]
    fn test_persist_then_rehydrate_round_trip() {
        let catalog = Catalog::builtin();
        let repo = InMemoryCartRepository::new();

        let mut first = CartEngine::new(repo.clone());
        first.add(catalog.product("p2").unwrap(), 3);
        first.add(catalog.course("t2").unwrap(), 1);
        first.add(catalog.product("p4").unwrap(), 2);

        let second = CartEngine::rehydrate(repo, &catalog);
        assert_eq!(second.lines(), first.lines());
        assert_eq!(second.subtotal(), first.subtotal());
    }

    #[test]
    fn test_rehydrate_missing_or_malformed_is_empty() {
        let catalog = Catalog::builtin();

        let cart = CartEngine::rehydrate(InMemoryCartRepository::new(), &catalog);
        assert!(cart.is_empty());

        for payload in ["", "not json", "{\"id\":\"p1\"}", "null", "[[]"] {
            let cart = CartEngine::rehydrate(InMemoryCartRepository::with_payload(payload), &catalog);
            assert!(cart.is_empty(), "payload {payload:?} should give an empty cart");
        }
    }

    #[test]
    fn test_rehydrate_validates_stored_lines() {
        let catalog = Catalog::builtin();
        let payload = r#"[
            {"id":"p1","title":"Tampered","price":1,"qty":2},
            {"id":"ghost","title":"Unknown","price":10,"quantity":1},
            {"id":"p2","quantity":0},
            {"id":"p3","quantity":-4},
            {"id":"p1","quantity":1},
            {"id":"t1","quantity":1}
        ]"#;

        let cart = CartEngine::rehydrate(InMemoryCartRepository::with_payload(payload), &catalog);

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, ["p1", "t1"]);
        let ecm = cart.line("p1").unwrap();
        assert_eq!(ecm.quantity(), 3);
        assert_eq!(ecm.item().title, "Refurbished ECM");
        assert_eq!(cart.subtotal(), Inr::new(6500 * 3 + 6000));
    }

    #[test]
    fn test_observers_see_every_change() {
        let (mut cart, catalog) = engine();
        let seen: Arc<Mutex<Vec<(usize, Inr)>>> = Arc::default();
        let sink = Arc::clone(&seen);
        cart.subscribe(move |lines: &[CartLine], subtotal: Inr| {
            sink.lock().unwrap().push((lines.len(), subtotal));
        });

        cart.add(catalog.product("p1").unwrap(), 1);
        cart.add(catalog.product("p3").unwrap(), 1);
        cart.remove("missing");
        cart.set_quantity("p1", 2);
        cart.clear();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (1, Inr::new(6500)),
                (2, Inr::new(19300)),
                (2, Inr::new(25800)),
                (0, Inr::ZERO),
            ]
        );
    }

    struct FailingRepository;

    impl CartRepository for FailingRepository {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("offline".to_string()))
        }

        fn save(&self, _payload: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("offline".to_string()))
        }
    }

    #[test]
    fn test_storage_failures_do_not_break_the_cart() {
        let catalog = Catalog::builtin();
        let mut cart = CartEngine::rehydrate(FailingRepository, &catalog);
        assert!(cart.is_empty());

        cart.add(catalog.product("p2").unwrap(), 1);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal(), Inr::new(24500));
    }
}
