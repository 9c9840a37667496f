//! Session Repository

use std::{fmt, sync::Arc};

use tracing::warn;

use crate::orders::DiningMode;

use super::{PersistenceError, Storage};

/// Storage key holding the dine-in/takeaway label chosen on the welcome screen.
pub const DINING_MODE_KEY: &str = "SPouAEstorage";

/// Reads the session flags shared with the rest of the kiosk.
#[derive(Clone)]
pub struct SessionRepository {
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for SessionRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRepository").finish_non_exhaustive()
    }
}

impl SessionRepository {
    /// Create a repository over the given storage.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The raw dine-in/takeaway label, if one was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage can't be read.
    pub fn dining_label(&self) -> Result<Option<String>, PersistenceError> {
        self.storage.get(DINING_MODE_KEY)
    }

    /// The session's dining mode; dine-in unless a takeaway label is stored.
    pub fn dining_mode(&self) -> DiningMode {
        match self.dining_label() {
            Ok(Some(label)) => DiningMode::from_label(&label),
            Ok(None) => DiningMode::default(),
            Err(err) => {
                warn!(error = %err, "failed to read dining mode, assuming dine-in");

                DiningMode::default()
            }
        }
    }

    /// Store the dining mode label.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn set_dining_mode(&self, mode: DiningMode) -> Result<(), PersistenceError> {
        self.storage.set(DINING_MODE_KEY, mode.label())
    }
}
