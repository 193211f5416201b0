//! Reward settlement once a battle ends.

use serde::{Deserialize, Serialize};

use crate::config::EconomyConfig;
use crate::error::Resource;
use crate::ledger;
use crate::mission::mission_for;
use crate::profile::PlayerProfile;
use crate::rng::RollSource;

/// Credits applied for a finished battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Whether the player won.
    pub win: bool,
    /// Mission level fought.
    pub wave: u32,
    /// JetFuel credited.
    pub jet_fuel: u64,
    /// Energy credited before clamping to the cap.
    pub energy_bonus: u64,
    /// Unlock frontier after settlement.
    pub unlocked_level: u32,
}

/// Settle a server-resolved battle, rolling the energy bonus.
pub fn settle(
    profile: &mut PlayerProfile,
    wave: u32,
    win: bool,
    economy: &EconomyConfig,
    rolls: &mut dyn RollSource,
) -> Settlement {
    let (lo, hi) = if win {
        economy.win_energy_bonus
    } else {
        economy.loss_energy_bonus
    };
    let jet_fuel = if win { mission_for(wave).reward } else { 0 };
    let energy_bonus = rolls.int_inclusive(lo, hi);
    apply(profile, wave, win, jet_fuel, energy_bonus)
}

/// Settle a client-resolved battle.
///
/// Claimed rewards are capped at what the mission and the bonus table
/// allow; a loss never grants JetFuel.
pub fn settle_reported(
    profile: &mut PlayerProfile,
    wave: u32,
    win: bool,
    claimed_jet_fuel: u64,
    claimed_energy: u64,
    economy: &EconomyConfig,
) -> Settlement {
    let (jet_fuel, energy_cap) = if win {
        (
            claimed_jet_fuel.min(mission_for(wave).reward),
            economy.win_energy_bonus.1,
        )
    } else {
        (0, economy.loss_energy_bonus.1)
    };
    apply(profile, wave, win, jet_fuel, claimed_energy.min(energy_cap))
}

fn apply(
    profile: &mut PlayerProfile,
    wave: u32,
    win: bool,
    jet_fuel: u64,
    energy_bonus: u64,
) -> Settlement {
    ledger::credit(profile, Resource::JetFuel, jet_fuel);
    ledger::credit(profile, Resource::Energy, energy_bonus);
    if win && wave == profile.unlocked_level {
        profile.unlocked_level = profile.unlocked_level.saturating_add(1);
    }
    Settlement {
        win,
        wave,
        jet_fuel,
        energy_bonus,
        unlocked_level: profile.unlocked_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRolls;

    #[test]
    fn test_win_at_frontier_unlocks_next() {
        let mut profile = PlayerProfile::fresh_for_tests();
        profile.energy = 50.0;
        let mut rolls = SeededRolls::new(3);
        let s = settle(&mut profile, 5, true, &EconomyConfig::default(), &mut rolls);
        assert_eq!(s.jet_fuel, 300);
        assert_eq!(profile.jet_fuel, 400);
        assert_eq!(profile.unlocked_level, 6);
        assert!((2..=5).contains(&s.energy_bonus));
    }

    #[test]
    fn test_win_below_frontier_keeps_level() {
        let mut profile = PlayerProfile::fresh_for_tests();
        let mut rolls = SeededRolls::new(3);
        settle(&mut profile, 2, true, &EconomyConfig::default(), &mut rolls);
        assert_eq!(profile.unlocked_level, 5);
        assert_eq!(profile.jet_fuel, 250);
    }

    #[test]
    fn test_loss_grants_only_energy() {
        let mut profile = PlayerProfile::fresh_for_tests();
        profile.energy = 10.0;
        let mut rolls = SeededRolls::new(3);
        let s = settle(&mut profile, 5, false, &EconomyConfig::default(), &mut rolls);
        assert_eq!(s.jet_fuel, 0);
        assert_eq!(profile.jet_fuel, 100);
        assert_eq!(profile.unlocked_level, 5);
        assert!((1..=2).contains(&s.energy_bonus));
    }

    #[test]
    fn test_reported_claims_are_capped() {
        let mut profile = PlayerProfile::fresh_for_tests();
        profile.energy = 0.0;
        let s = settle_reported(&mut profile, 1, true, 1_000_000, 99, &EconomyConfig::default());
        assert_eq!(s.jet_fuel, 100);
        assert_eq!(s.energy_bonus, 5);

        let s = settle_reported(&mut profile, 1, false, 500, 99, &EconomyConfig::default());
        assert_eq!(s.jet_fuel, 0);
        assert_eq!(s.energy_bonus, 2);
    }
}
