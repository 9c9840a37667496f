//! Cart Engine
//!
//! Owns the session's [`Cart`]. Every mutation is persisted through the
//! [`CartRepository`] first and only then announced to the [`CartListener`].

use std::{fmt, sync::Arc};

use mockall::automock;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::{Span, debug, warn};

use crate::{
    cart::{Cart, LineId, LineOptions},
    persistence::CartRepository,
};

/// Receives a notification after every cart mutation, once it is persisted.
#[automock]
pub trait CartListener: Send + Sync {
    /// Called with the cart as it is after the mutation.
    fn cart_changed(&self, cart: &Cart);
}

/// Listener that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl CartListener for NoopListener {
    fn cart_changed(&self, _cart: &Cart) {}
}

/// Cart Engine
pub struct CartEngine {
    cart: Cart,
    repository: CartRepository,
    listener: Arc<dyn CartListener>,
}

impl fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartEngine")
            .field("cart", &self.cart)
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl CartEngine {
    /// Create an engine around an existing cart.
    pub fn new(cart: Cart, repository: CartRepository, listener: Arc<dyn CartListener>) -> Self {
        Self {
            cart,
            repository,
            listener,
        }
    }

    /// Create an engine from whatever cart was persisted, or an empty one if
    /// nothing readable was stored.
    pub fn restore(
        repository: CartRepository,
        currency: &'static Currency,
        listener: Arc<dyn CartListener>,
    ) -> Self {
        let cart = Cart::with_lines(repository.load_or_default(), currency);

        debug!(lines = cart.len(), "restored cart");

        Self::new(cart, repository, listener)
    }

    /// Add `quantity` units of `(name, unit_price, options)`, merging with an
    /// identical line when there is one.
    #[tracing::instrument(
        name = "cart.add",
        skip(self, options),
        fields(line_id = tracing::field::Empty)
    )]
    pub fn add(
        &mut self,
        name: &str,
        unit_price: Decimal,
        options: LineOptions,
        quantity: u32,
    ) -> Option<LineId> {
        let id = self.cart.add(name, unit_price, options, quantity)?;

        Span::current().record("line_id", tracing::field::display(id));

        self.changed();

        Some(id)
    }

    /// Remove a line by id. Unknown ids are a silent no-op.
    #[tracing::instrument(name = "cart.remove", skip(self))]
    pub fn remove(&mut self, id: LineId) -> bool {
        let removed = self.cart.remove(id);

        if removed {
            self.changed();
        } else {
            debug!("no line to remove");
        }

        removed
    }

    /// Empty the cart, persisting the empty cart.
    #[tracing::instrument(name = "cart.clear", skip(self))]
    pub fn clear(&mut self) {
        self.cart.clear();
        self.changed();
    }

    /// Empty the cart and drop its persisted copy, as after a confirmed order.
    #[tracing::instrument(name = "cart.discard", skip(self))]
    pub fn discard(&mut self) {
        self.cart.clear();

        if let Err(err) = self.repository.remove() {
            warn!(error = %err, "failed to remove persisted cart");
        }

        self.listener.cart_changed(&self.cart);
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Sum of unit price times quantity over all lines.
    pub fn total(&self) -> Money<'static, Currency> {
        self.cart.total()
    }

    /// Total formatted for display.
    pub fn formatted_total(&self) -> String {
        self.cart.formatted_total()
    }

    fn changed(&self) {
        if let Err(err) = self.repository.save(self.cart.lines()) {
            warn!(error = %err, "failed to persist cart");
        }

        self.listener.cart_changed(&self.cart);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rusty_money::iso::EUR;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        cart::CartLine,
        persistence::{MemoryStorage, MockStorage, PersistenceError, Storage},
    };

    use super::*;

    fn engine_with(storage: Arc<dyn Storage>, listener: Arc<dyn CartListener>) -> CartEngine {
        CartEngine::restore(CartRepository::new(storage), EUR, listener)
    }

    /// Records what was persisted at the moment each notification arrived.
    struct SnapshotListener {
        repository: CartRepository,
        seen: Mutex<Vec<usize>>,
    }

    impl CartListener for SnapshotListener {
        fn cart_changed(&self, cart: &Cart) {
            let persisted = self.repository.load_or_default();

            assert_eq!(persisted.as_slice(), cart.lines(), "notified before persisting");

            if let Ok(mut seen) = self.seen.lock() {
                seen.push(cart.len());
            }
        }
    }

    #[test]
    fn add_persists_before_notifying() -> TestResult {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let listener = Arc::new(SnapshotListener {
            repository: CartRepository::new(Arc::clone(&storage)),
            seen: Mutex::new(Vec::new()),
        });

        let mut engine = engine_with(Arc::clone(&storage), listener.clone());

        engine.add("Burger", Decimal::new(5, 0), smallvec![], 1);
        engine.add("Frites", Decimal::new(3, 0), smallvec![], 1);

        let seen = listener.seen.lock().map_err(|_poisoned| "poisoned")?;

        assert_eq!(*seen, vec![1, 2]);

        Ok(())
    }

    #[test]
    fn restore_picks_up_persisted_lines() -> TestResult {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let repository = CartRepository::new(Arc::clone(&storage));

        repository.save(&[CartLine::new("Sundae", Decimal::new(3, 0), smallvec![], 2)])?;

        let engine = engine_with(storage, Arc::new(NoopListener));

        assert_eq!(engine.cart().len(), 1);
        assert_eq!(engine.formatted_total(), "6,00 €");

        Ok(())
    }

    #[test]
    fn restore_folds_duplicate_persisted_lines() -> TestResult {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let repository = CartRepository::new(Arc::clone(&storage));

        repository.save(&[
            CartLine::new("Burger", Decimal::new(5, 0), smallvec![], 1),
            CartLine::new("Burger", Decimal::new(5, 0), smallvec![], 1),
        ])?;

        let engine = engine_with(storage, Arc::new(NoopListener));

        assert_eq!(engine.cart().len(), 1);
        assert_eq!(engine.formatted_total(), "10,00 €");

        Ok(())
    }

    #[test]
    fn listener_is_notified_once_per_mutation() -> TestResult {
        let mut listener = MockCartListener::new();

        listener.expect_cart_changed().times(3).return_const(());

        let mut engine = engine_with(Arc::new(MemoryStorage::new()), Arc::new(listener));

        let id = engine
            .add("Burger", Decimal::new(5, 0), smallvec![], 1)
            .ok_or("expected id")?;

        engine.remove(id);
        engine.remove(id);
        engine.clear();

        Ok(())
    }

    #[test]
    fn failed_save_does_not_fail_add() {
        let mut storage = MockStorage::new();

        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .times(1)
            .returning(|_, _| Err(PersistenceError::Poisoned));

        let mut engine = engine_with(Arc::new(storage), Arc::new(NoopListener));

        assert!(engine.add("Burger", Decimal::ONE, smallvec![], 1).is_some());
        assert_eq!(engine.cart().len(), 1);
    }

    #[test]
    fn discard_removes_persisted_cart() -> TestResult {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut engine = engine_with(Arc::clone(&storage), Arc::new(NoopListener));

        engine.add("Burger", Decimal::new(5, 0), smallvec![], 1);
        engine.discard();

        assert!(engine.cart().is_empty());
        assert_eq!(storage.get(crate::persistence::cart::CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn clear_persists_empty_cart() -> TestResult {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut engine = engine_with(Arc::clone(&storage), Arc::new(NoopListener));

        engine.add("Burger", Decimal::new(5, 0), smallvec![], 1);
        engine.clear();

        assert_eq!(
            storage.get(crate::persistence::cart::CART_KEY)?.as_deref(),
            Some("[]")
        );

        Ok(())
    }
}
