//! Cart Repository

use std::{fmt, sync::Arc};

use tracing::warn;

use crate::cart::CartLine;

use super::{PersistenceError, Storage};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "panier";

/// Reads and writes the cart as a JSON array of lines under a single key.
#[derive(Clone)]
pub struct CartRepository {
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for CartRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartRepository").finish_non_exhaustive()
    }
}

impl CartRepository {
    /// Create a repository over the given storage.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Load the persisted lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage can't be read or the stored value is malformed.
    pub fn load(&self) -> Result<Vec<CartLine>, PersistenceError> {
        match self.storage.get(CART_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Load the persisted lines, falling back to an empty cart when the
    /// stored value is missing or unreadable.
    pub fn load_or_default(&self) -> Vec<CartLine> {
        self.load().unwrap_or_else(|err| {
            warn!(error = %err, "discarding unreadable persisted cart");

            Vec::new()
        })
    }

    /// Replace the persisted cart with `lines`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn save(&self, lines: &[CartLine]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(lines)?;

        self.storage.set(CART_KEY, &json)
    }

    /// Remove the persisted cart entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn remove(&self) -> Result<(), PersistenceError> {
        self.storage.remove(CART_KEY)
    }
}
