//! Persistence
//!
//! Durable key/value storage standing in for the kiosk's local storage, and
//! the repositories that read and write the cart and session flag through it.

use std::io;

use thiserror::Error;

pub mod cart;
pub mod session;
pub mod storage;

pub use cart::CartRepository;
pub use session::SessionRepository;
pub use storage::{FileStorage, MemoryStorage, MockStorage, Storage};

/// Errors raised while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading or writing the backing file failed.
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// The stored value could not be (de)serialized.
    #[error("malformed stored value: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A previous writer panicked while holding the in-memory store.
    #[error("storage lock poisoned")]
    Poisoned,
}
