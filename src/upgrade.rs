//! Upgrade cost curve, batch quotes, and atomic batch application.
//!
//! # Cost Model
//!
//! cost(stat, level) = rate × (level + 1)²
//!
//! Where `rate` is the stat's easy rate for its first [`EASY_LEVELS`]
//! increments and its standard rate afterwards. A batch of N increments
//! of one stat walks N consecutive levels, so it pays N rising prices.
//!
//! Increments past a stat's ceiling are dropped from the batch rather
//! than rejected; the quote reports which stats ran out of headroom.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{EngineResult, Resource};
use crate::ledger;
use crate::profile::PlayerProfile;
use crate::stats::{Mothership, StatKind};

/// Levels below this use the easy rate.
pub const EASY_LEVELS: u32 = 3;

/// Where a stat's ceiling comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ceiling {
    /// Base value plus a fixed headroom.
    Headroom(f64),
    /// Absolute maximum.
    Fixed(f64),
}

impl Ceiling {
    /// Resolve against a base value.
    #[must_use]
    pub fn resolve(self, base: f64) -> f64 {
        match self {
            Ceiling::Headroom(extra) => base + extra,
            Ceiling::Fixed(max) => max.max(base),
        }
    }
}

/// Pricing and bounds for one stat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatRule {
    /// Amount added per increment.
    pub step: f64,
    /// Base rate for the first levels.
    pub easy_rate: u64,
    /// Base rate from [`EASY_LEVELS`] on.
    pub standard_rate: u64,
    /// Upper bound.
    pub ceiling: Ceiling,
}

const HEALTH: StatRule = StatRule {
    step: 5.0,
    easy_rate: 6,
    standard_rate: 10,
    ceiling: Ceiling::Headroom(40.0),
};

const ENERGY_CAP: StatRule = StatRule {
    step: 20.0,
    easy_rate: 4,
    standard_rate: 8,
    ceiling: Ceiling::Headroom(200.0),
};

const REGEN_PER_MIN: StatRule = StatRule {
    step: 0.5,
    easy_rate: 15,
    standard_rate: 25,
    ceiling: Ceiling::Fixed(5.0),
};

const HIT: StatRule = StatRule {
    step: 1.0,
    easy_rate: 10,
    standard_rate: 16,
    ceiling: Ceiling::Headroom(15.0),
};

const CRIT: StatRule = StatRule {
    step: 1.0,
    easy_rate: 10,
    standard_rate: 16,
    ceiling: Ceiling::Headroom(25.0),
};

const DODGE: StatRule = StatRule {
    step: 1.0,
    easy_rate: 12,
    standard_rate: 18,
    ceiling: Ceiling::Headroom(15.0),
};

/// Pricing rule for a stat.
#[must_use]
pub const fn rule(stat: StatKind) -> &'static StatRule {
    match stat {
        StatKind::Health => &HEALTH,
        StatKind::EnergyCap => &ENERGY_CAP,
        StatKind::RegenPerMin => &REGEN_PER_MIN,
        StatKind::Hit => &HIT,
        StatKind::Crit => &CRIT,
        StatKind::Dodge => &DODGE,
    }
}

/// Price of the increment taking `stat` from `level` to `level + 1`.
#[must_use]
pub fn cost(stat: StatKind, level: u32) -> u64 {
    let r = rule(stat);
    let rate = if level < EASY_LEVELS {
        r.easy_rate
    } else {
        r.standard_rate
    };
    let n = u64::from(level) + 1;
    rate.saturating_mul(n.saturating_mul(n))
}

/// Requested increments per stat.
pub type UpgradeOps = BTreeMap<StatKind, u32>;

/// Priced, headroom-clamped view of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeQuote {
    /// JetFuel for every applied increment.
    pub total_cost: u64,
    /// Increments asked for.
    pub requested: BTreeMap<StatKind, u32>,
    /// Increments that fit under each ceiling.
    pub applied: BTreeMap<StatKind, u32>,
    /// Stats where fewer increments fit than were requested.
    pub headroom_exhausted: BTreeSet<StatKind>,
}

impl UpgradeQuote {
    /// Whether the batch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applied.values().all(|&n| n == 0)
    }
}

/// Price a batch against a mothership without changing it.
#[must_use]
pub fn quote(ms: &Mothership, ops: &UpgradeOps) -> UpgradeQuote {
    let mut out = UpgradeQuote::default();

    for (&stat, &requested) in ops {
        if requested == 0 {
            continue;
        }
        let take = requested.min(ms.remaining(stat));
        let level = ms.level.get(stat);
        let stat_cost: u64 = (level..level + take).map(|l| cost(stat, l)).sum();

        out.total_cost = out.total_cost.saturating_add(stat_cost);
        out.requested.insert(stat, requested);
        if take > 0 {
            out.applied.insert(stat, take);
        }
        if take < requested {
            out.headroom_exhausted.insert(stat);
        }
    }

    out
}

/// Apply a batch to a profile, all or nothing.
///
/// A batch where nothing fits returns an empty quote and costs nothing.
///
/// # Errors
///
/// Returns `InsufficientResource` for JetFuel if the clamped batch costs
/// more than the balance; the profile is untouched in that case.
pub fn apply(profile: &mut PlayerProfile, ops: &UpgradeOps) -> EngineResult<UpgradeQuote> {
    let q = quote(&profile.mothership, ops);
    if q.is_empty() {
        return Ok(q);
    }

    ledger::debit(profile, Resource::JetFuel, q.total_cost)?;

    for (&stat, &count) in &q.applied {
        for _ in 0..count {
            profile.mothership.increment(stat);
        }
    }

    Ok(q)
}
