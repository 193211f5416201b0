//! Resource ledger: credits and debits against one player's balances.
//!
//! Every write clamps energy into `[0, energyCap]`. Debits are all or
//! nothing: a request larger than the balance fails with the numbers
//! needed to resolve it and leaves the profile untouched.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult, Resource};
use crate::profile::PlayerProfile;

/// Balances as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Spendable currency.
    pub jet_fuel: u64,
    /// Floored energy.
    pub energy: u64,
    /// Energy ceiling.
    pub energy_cap: u32,
}

/// Clamp stored energy into range.
pub fn clamp_energy(profile: &mut PlayerProfile) {
    let cap = f64::from(profile.energy_cap());
    if !profile.energy.is_finite() {
        profile.energy = 0.0;
    }
    profile.energy = profile.energy.clamp(0.0, cap);
}

/// Current balances.
#[must_use]
pub fn balance(profile: &PlayerProfile) -> Balance {
    Balance {
        jet_fuel: profile.jet_fuel,
        energy: profile.energy_whole(),
        energy_cap: profile.energy_cap(),
    }
}

/// Add to a balance. Energy saturates at the cap.
#[allow(clippy::cast_precision_loss)]
pub fn credit(profile: &mut PlayerProfile, resource: Resource, amount: u64) {
    match resource {
        Resource::JetFuel => profile.jet_fuel = profile.jet_fuel.saturating_add(amount),
        Resource::Energy => {
            profile.energy += amount as f64;
            clamp_energy(profile);
        }
    }
}

/// Check a debit would succeed without applying it.
///
/// # Errors
///
/// Returns `InsufficientResource` if `amount` exceeds the balance.
#[allow(clippy::cast_precision_loss)]
pub fn ensure(profile: &PlayerProfile, resource: Resource, amount: u64) -> EngineResult<()> {
    let enough = match resource {
        Resource::JetFuel => profile.jet_fuel >= amount,
        Resource::Energy => profile.energy >= amount as f64,
    };
    if enough {
        return Ok(());
    }
    let have = match resource {
        Resource::JetFuel => profile.jet_fuel,
        Resource::Energy => profile.energy_whole(),
    };
    Err(EngineError::InsufficientResource {
        resource,
        need: amount,
        have,
    })
}

/// Subtract from a balance.
///
/// # Errors
///
/// Returns `InsufficientResource` if `amount` exceeds the balance.
#[allow(clippy::cast_precision_loss)]
pub fn debit(profile: &mut PlayerProfile, resource: Resource, amount: u64) -> EngineResult<()> {
    ensure(profile, resource, amount)?;
    match resource {
        Resource::JetFuel => profile.jet_fuel -= amount,
        Resource::Energy => {
            profile.energy -= amount as f64;
            clamp_energy(profile);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_exact_balance() {
        let mut profile = PlayerProfile::fresh_for_tests();
        debit(&mut profile, Resource::JetFuel, 100).unwrap();
        assert_eq!(profile.jet_fuel, 0);
    }

    #[test]
    fn test_debit_over_balance_is_atomic() {
        let mut profile = PlayerProfile::fresh_for_tests();
        profile.energy = 9.0;
        let err = debit(&mut profile, Resource::Energy, 10).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientResource {
                resource: Resource::Energy,
                need: 10,
                have: 9
            }
        ));
        assert!((profile.energy - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_energy_below_whole_fails() {
        let mut profile = PlayerProfile::fresh_for_tests();
        profile.energy = 9.99;
        assert!(debit(&mut profile, Resource::Energy, 10).is_err());
    }

    #[test]
    fn test_energy_credit_clamps_at_cap() {
        let mut profile = PlayerProfile::fresh_for_tests();
        profile.energy = 98.5;
        credit(&mut profile, Resource::Energy, 5);
        assert!((profile.energy - 100.0).abs() < 1e-9);
        assert_eq!(balance(&profile).energy, 100);
    }

    #[test]
    fn test_jet_fuel_credit_saturates() {
        let mut profile = PlayerProfile::fresh_for_tests();
        profile.jet_fuel = u64::MAX - 1;
        credit(&mut profile, Resource::JetFuel, 10);
        assert_eq!(profile.jet_fuel, u64::MAX);
    }
}
