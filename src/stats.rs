//! Mothership stat blocks and per-stat upgrade counters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::upgrade::rule;

/// One upgradeable mothership stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    /// Player hit points at battle start.
    Health,
    /// Energy ceiling.
    EnergyCap,
    /// Energy regenerated per minute.
    RegenPerMin,
    /// Bonus added to the player's base hit chance.
    Hit,
    /// Critical hit chance, in percent.
    Crit,
    /// Dodge chance, in percent.
    Dodge,
}

impl StatKind {
    /// Every stat, in the order batches are applied.
    pub const ALL: [StatKind; 6] = [
        StatKind::Health,
        StatKind::EnergyCap,
        StatKind::RegenPerMin,
        StatKind::Hit,
        StatKind::Crit,
        StatKind::Dodge,
    ];

    /// Wire name of the stat.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            StatKind::Health => "health",
            StatKind::EnergyCap => "energyCap",
            StatKind::RegenPerMin => "regenPerMin",
            StatKind::Hit => "hit",
            StatKind::Crit => "crit",
            StatKind::Dodge => "dodge",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKind::ALL
            .into_iter()
            .find(|stat| stat.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown stat '{s}'"))
    }
}

/// Named mothership stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    /// Hit points.
    pub health: u32,
    /// Energy ceiling.
    pub energy_cap: u32,
    /// Energy per minute.
    pub regen_per_min: f64,
    /// Hit bonus, in percent.
    pub hit: u32,
    /// Crit chance, in percent.
    pub crit: u32,
    /// Dodge chance, in percent.
    pub dodge: u32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            health: 60,
            energy_cap: 100,
            regen_per_min: 1.0,
            hit: 0,
            crit: 10,
            dodge: 5,
        }
    }
}

impl StatBlock {
    /// Read a stat as a real number.
    #[must_use]
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Health => f64::from(self.health),
            StatKind::EnergyCap => f64::from(self.energy_cap),
            StatKind::RegenPerMin => self.regen_per_min,
            StatKind::Hit => f64::from(self.hit),
            StatKind::Crit => f64::from(self.crit),
            StatKind::Dodge => f64::from(self.dodge),
        }
    }

    /// Write a stat; integer stats are rounded.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set(&mut self, stat: StatKind, value: f64) {
        let whole = value.round().max(0.0) as u32;
        match stat {
            StatKind::Health => self.health = whole,
            StatKind::EnergyCap => self.energy_cap = whole,
            StatKind::RegenPerMin => self.regen_per_min = value,
            StatKind::Hit => self.hit = whole,
            StatKind::Crit => self.crit = whole,
            StatKind::Dodge => self.dodge = whole,
        }
    }
}

/// Number of increments applied to each stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatLevels {
    /// Health increments.
    pub health: u32,
    /// Energy cap increments.
    pub energy_cap: u32,
    /// Regen increments.
    pub regen_per_min: u32,
    /// Hit increments.
    pub hit: u32,
    /// Crit increments.
    pub crit: u32,
    /// Dodge increments.
    pub dodge: u32,
}

impl StatLevels {
    /// Counter for one stat.
    #[must_use]
    pub const fn get(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Health => self.health,
            StatKind::EnergyCap => self.energy_cap,
            StatKind::RegenPerMin => self.regen_per_min,
            StatKind::Hit => self.hit,
            StatKind::Crit => self.crit,
            StatKind::Dodge => self.dodge,
        }
    }

    fn slot(&mut self, stat: StatKind) -> &mut u32 {
        match stat {
            StatKind::Health => &mut self.health,
            StatKind::EnergyCap => &mut self.energy_cap,
            StatKind::RegenPerMin => &mut self.regen_per_min,
            StatKind::Hit => &mut self.hit,
            StatKind::Crit => &mut self.crit,
            StatKind::Dodge => &mut self.dodge,
        }
    }
}

/// The player's upgradeable stat holder.
///
/// `current` always lies between `base` and the stat's ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mothership {
    /// Values at creation; never modified.
    pub base: StatBlock,
    /// Base plus applied increments.
    pub current: StatBlock,
    /// Increments applied per stat.
    pub level: StatLevels,
}

impl Default for Mothership {
    fn default() -> Self {
        Self::new(StatBlock::default())
    }
}

impl Mothership {
    /// Create a mothership with no upgrades applied.
    #[must_use]
    pub fn new(base: StatBlock) -> Self {
        Self {
            base,
            current: base,
            level: StatLevels::default(),
        }
    }

    /// Upper bound for a stat.
    #[must_use]
    pub fn ceiling(&self, stat: StatKind) -> f64 {
        rule(stat).ceiling.resolve(self.base.get(stat))
    }

    /// Whole increments still available before the ceiling.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn remaining(&self, stat: StatKind) -> u32 {
        let gap = self.ceiling(stat) - self.current.get(stat);
        if gap <= 0.0 {
            return 0;
        }
        // Epsilon absorbs float drift on fractional steps.
        ((gap / rule(stat).step) + 1e-9).floor() as u32
    }

    /// Apply one increment of `stat`. Returns false at the ceiling.
    pub fn increment(&mut self, stat: StatKind) -> bool {
        if self.remaining(stat) == 0 {
            return false;
        }
        let next = (self.current.get(stat) + rule(stat).step).min(self.ceiling(stat));
        self.current.set(stat, next);
        *self.level.slot(stat) += 1;
        true
    }

    /// Check `base <= current <= ceiling` for every stat.
    #[must_use]
    pub fn within_bounds(&self) -> bool {
        StatKind::ALL.into_iter().all(|stat| {
            let value = self.current.get(stat);
            value >= self.base.get(stat) - 1e-9 && value <= self.ceiling(stat) + 1e-9
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_names_round_trip() {
        for stat in StatKind::ALL {
            assert_eq!(stat.name().parse::<StatKind>().unwrap(), stat);
        }
        assert!("armor".parse::<StatKind>().is_err());
    }

    #[test]
    fn test_fresh_mothership_headroom() {
        let ms = Mothership::default();
        assert_eq!(ms.remaining(StatKind::Health), 8);
        assert_eq!(ms.remaining(StatKind::EnergyCap), 10);
        assert_eq!(ms.remaining(StatKind::RegenPerMin), 8);
        assert_eq!(ms.remaining(StatKind::Hit), 15);
        assert_eq!(ms.remaining(StatKind::Crit), 25);
        assert_eq!(ms.remaining(StatKind::Dodge), 15);
    }

    #[test]
    fn test_increment_stops_at_ceiling() {
        let mut ms = Mothership::default();
        let mut applied = 0;
        while ms.increment(StatKind::RegenPerMin) {
            applied += 1;
        }
        assert_eq!(applied, 8);
        assert!((ms.current.regen_per_min - 5.0).abs() < 1e-9);
        assert_eq!(ms.level.regen_per_min, 8);
        assert!(ms.within_bounds());
        assert!(!ms.increment(StatKind::RegenPerMin));
    }

    #[test]
    fn test_increment_health_steps() {
        let mut ms = Mothership::default();
        assert!(ms.increment(StatKind::Health));
        assert_eq!(ms.current.health, 65);
        assert_eq!(ms.base.health, 60);
        assert_eq!(ms.level.health, 1);
    }
}
