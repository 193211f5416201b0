//! Profile persistence.
//!
//! The engine only sees the [`ProfileStore`] trait. [`MemoryStore`] backs
//! tests and throwaway servers; [`JsonFileStore`] keeps the whole table in
//! one JSON document that is rewritten atomically on every upsert.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use std::fmt;
use std::io;

use crate::profile::{Address, PlayerProfile};

/// Store failure.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io(io::Error),
    /// The backing file does not decode.
    Corrupt(String),
    /// A lock was poisoned by a panicking writer.
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Corrupt(message) => write!(f, "corrupt store: {message}"),
            Self::Poisoned => write!(f, "store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Keyed profile storage.
///
/// Implementations need not serialise writers for the same address; the
/// engine holds a per-player lock around every read-modify-write.
pub trait ProfileStore: Send + Sync {
    /// Load a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn get(&self, address: &Address) -> Result<Option<PlayerProfile>, StoreError>;

    /// Insert or replace a profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn upsert(&self, profile: &PlayerProfile) -> Result<(), StoreError>;

    /// Every stored address.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage fails.
    fn addresses(&self) -> Result<Vec<Address>, StoreError>;
}
