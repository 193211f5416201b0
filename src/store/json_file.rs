//! Durable profile table in a single JSON file.
//!
//! The file is loaded once at open. Each upsert rewrites it through a
//! sibling temp file and a rename, so a crash leaves either the old or
//! the new table on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::profile::{Address, PlayerProfile};
use crate::store::{ProfileStore, StoreError};

/// Current on-disk format version.
const VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Table {
    version: u32,
    profiles: BTreeMap<Address, PlayerProfile>,
}

/// Write-through JSON store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    table: Mutex<Table>,
}

impl JsonFileStore {
    /// Open a store, creating an empty table if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = if path.exists() {
            let text = fs::read_to_string(&path)?;
            let table: Table =
                serde_json::from_str(&text).map_err(|e| StoreError::Corrupt(e.to_string()))?;
            if table.version != VERSION {
                return Err(StoreError::Corrupt(format!(
                    "unsupported version {}",
                    table.version
                )));
            }
            table
        } else {
            Table {
                version: VERSION,
                profiles: BTreeMap::new(),
            }
        };

        info!(
            path = %path.display(),
            profiles = table.profiles.len(),
            "opened profile store"
        );

        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, table: &Table) -> Result<(), StoreError> {
        let encoded =
            serde_json::to_vec_pretty(table).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut file = fs::File::create(&tmp)?;
        file.write_all(&encoded)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ProfileStore for JsonFileStore {
    fn get(&self, address: &Address) -> Result<Option<PlayerProfile>, StoreError> {
        let table = self.table.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(table.profiles.get(address).cloned())
    }

    fn upsert(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        let mut table = self.table.lock().map_err(|_| StoreError::Poisoned)?;
        let previous = table
            .profiles
            .insert(profile.address.clone(), profile.clone());
        if let Err(e) = self.persist(&table) {
            // Keep memory in step with disk.
            match previous {
                Some(old) => table.profiles.insert(profile.address.clone(), old),
                None => table.profiles.remove(&profile.address),
            };
            return Err(e);
        }
        Ok(())
    }

    fn addresses(&self) -> Result<Vec<Address>, StoreError> {
        let table = self.table.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(table.profiles.keys().cloned().collect())
    }
}
