//! Player profiles and wallet addresses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EconomyConfig;
use crate::error::{EngineError, EngineResult};
use crate::stats::Mothership;

/// Longest address accepted.
pub const MAX_ADDRESS_LEN: usize = 128;

/// A validated wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Validate an address string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for empty, oversized, or non-alphanumeric input.
    pub fn parse(raw: &str) -> EngineResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(EngineError::invalid("address is empty"));
        }
        if raw.len() > MAX_ADDRESS_LEN {
            return Err(EngineError::invalid("address is too long"));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EngineError::invalid("address must be alphanumeric"));
        }
        Ok(Self(raw.to_string()))
    }

    /// The address text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

/// Persistent per-player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    /// Owner of this profile.
    pub address: Address,
    /// Spendable currency.
    pub jet_fuel: u64,
    /// Stored energy; fractional between ticks.
    pub energy: f64,
    /// Highest selectable mission.
    pub unlocked_level: u32,
    /// Current session token; empty until the first session starts.
    pub nonce: String,
    /// The player's mothership.
    pub mothership: Mothership,
    /// Unix milliseconds of the last energy accrual.
    pub last_tick: u64,
}

impl PlayerProfile {
    /// A new profile with starting balances and full energy.
    #[must_use]
    pub fn fresh(address: Address, economy: &EconomyConfig, now: u64) -> Self {
        let mothership = Mothership::default();
        Self {
            address,
            jet_fuel: economy.starting_jet_fuel,
            energy: f64::from(mothership.current.energy_cap),
            unlocked_level: economy.starting_unlocked_level,
            nonce: String::new(),
            mothership,
            last_tick: now,
        }
    }

    /// Energy ceiling, taken from the mothership.
    #[must_use]
    pub fn energy_cap(&self) -> u32 {
        self.mothership.current.energy_cap
    }

    /// Energy as shown to clients.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn energy_whole(&self) -> u64 {
        self.energy.max(0.0).floor() as u64
    }

    /// Energy as a whole percentage of the cap, for display only.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn energy_pct(&self) -> u32 {
        let cap = f64::from(self.energy_cap().max(1));
        ((self.energy / cap) * 100.0).floor().clamp(0.0, 100.0) as u32
    }

    #[cfg(test)]
    pub(crate) fn fresh_for_tests() -> Self {
        let address = Address::parse("TESTPLAYER").unwrap();
        Self::fresh(address, &EconomyConfig::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_profile_starting_values() {
        let profile = PlayerProfile::fresh_for_tests();
        assert_eq!(profile.jet_fuel, 100);
        assert_eq!(profile.energy_whole(), 100);
        assert_eq!(profile.energy_cap(), 100);
        assert_eq!(profile.unlocked_level, 5);
        assert!(profile.nonce.is_empty());
    }

    #[test]
    fn test_address_validation() {
        assert!(Address::parse("ABC123").is_ok());
        assert!(Address::parse("").is_err());
        assert!(Address::parse("has space").is_err());
        assert!(Address::parse(&"A".repeat(MAX_ADDRESS_LEN + 1)).is_err());
    }

    #[test]
    fn test_energy_pct_floors() {
        let mut profile = PlayerProfile::fresh_for_tests();
        profile.energy = 49.9;
        assert_eq!(profile.energy_pct(), 49);
        assert_eq!(profile.energy_whole(), 49);
    }

    #[test]
    fn test_profile_json_round_trip_keeps_address_validation() {
        let profile = PlayerProfile::fresh_for_tests();
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"jetFuel\":100"));
        let back: PlayerProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
        let bad = json.replace("TESTPLAYER", "bad address");
        assert!(serde_json::from_str::<PlayerProfile>(&bad).is_err());
    }
}
