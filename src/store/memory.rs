//! In-memory profile table.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::profile::{Address, PlayerProfile};
use crate::store::{ProfileStore, StoreError};

/// Profiles held in a map; lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<Address, PlayerProfile>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.read().map_or(0, |p| p.len())
    }

    /// Whether no profiles are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileStore for MemoryStore {
    fn get(&self, address: &Address) -> Result<Option<PlayerProfile>, StoreError> {
        let profiles = self.profiles.read().map_err(|_| StoreError::Poisoned)?;
        Ok(profiles.get(address).cloned())
    }

    fn upsert(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().map_err(|_| StoreError::Poisoned)?;
        profiles.insert(profile.address.clone(), profile.clone());
        Ok(())
    }

    fn addresses(&self) -> Result<Vec<Address>, StoreError> {
        let profiles = self.profiles.read().map_err(|_| StoreError::Poisoned)?;
        let mut addresses: Vec<Address> = profiles.keys().cloned().collect();
        addresses.sort();
        Ok(addresses)
    }
}
