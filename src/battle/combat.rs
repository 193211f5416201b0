//! Attack and initiative resolution.
//!
//! # Attack Order
//!
//! 1. Defender's dodge roll; a dodge negates the attack.
//! 2. Attacker's hit roll against a uniform 0-100 draw.
//! 3. Damage = round(max(1, atk × U(0.75, 1.25) − def × U(0.25, 0.60))).
//! 4. Attacker's crit roll; a crit multiplies damage by U(1.40, 1.80).
//!
//! The solo bonus is already folded into the squad's attack.

use serde::{Deserialize, Serialize};

use crate::battle::Squad;
use crate::mission::MissionDef;
use crate::rng::RollSource;
use crate::stats::StatBlock;

/// Player base hit chance before the mothership bonus.
pub const PLAYER_BASE_HIT: f64 = 78.0;
/// Enemy base hit chance before the speed adjustment.
pub const ENEMY_BASE_HIT: f64 = 68.0;

const PLAYER_HIT_BAND: (f64, f64) = (60.0, 95.0);
const PLAYER_CRIT_BAND: (f64, f64) = (0.0, 60.0);
const PLAYER_DODGE_BAND: (f64, f64) = (0.0, 45.0);
const ENEMY_HIT_BAND: (f64, f64) = (50.0, 85.0);
const ENEMY_CRIT_BAND: (f64, f64) = (2.0, 30.0);
const ENEMY_DODGE_BAND: (f64, f64) = (0.0, 25.0);

const VARIANCE: (f64, f64) = (0.75, 1.25);
const DEFENSE_FACTOR: (f64, f64) = (0.25, 0.60);
const CRIT_FACTOR: (f64, f64) = (1.40, 1.80);

fn band(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}

/// Which side of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    /// The player's squad.
    Player,
    /// The mission's enemy.
    Enemy,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

/// Resolved stats for one side; percentages already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    /// Attack.
    pub attack: f64,
    /// Defense.
    pub defense: f64,
    /// Speed.
    pub speed: f64,
    /// Hit chance, percent.
    pub hit: f64,
    /// Crit chance, percent.
    pub crit: f64,
    /// Dodge chance, percent.
    pub dodge: f64,
}

impl Combatant {
    /// The player's squad backed by mothership stats.
    #[must_use]
    pub fn player(squad: &Squad, mothership: &StatBlock) -> Self {
        Self {
            attack: squad.attack,
            defense: squad.defense,
            speed: squad.speed,
            hit: band(
                PLAYER_BASE_HIT + f64::from(mothership.hit),
                PLAYER_HIT_BAND,
            ),
            crit: band(f64::from(mothership.crit), PLAYER_CRIT_BAND),
            dodge: band(f64::from(mothership.dodge), PLAYER_DODGE_BAND),
        }
    }

    /// A mission's enemy, facing a player of `player_speed`.
    ///
    /// The linear coefficients are play-tuned constants.
    #[must_use]
    pub fn enemy(mission: &MissionDef, player_speed: f64) -> Self {
        let atk = f64::from(mission.enemy_atk);
        let spd = f64::from(mission.enemy_spd);
        Self {
            attack: atk,
            defense: f64::from(mission.enemy_def),
            speed: spd,
            hit: band(
                ENEMY_BASE_HIT + ((spd - player_speed) * 1.5).round(),
                ENEMY_HIT_BAND,
            ),
            crit: band(5.0 + ((atk - 5.0) * 0.5).round(), ENEMY_CRIT_BAND),
            dodge: band(3.0 + ((spd - 5.0) * 0.5).round(), ENEMY_DODGE_BAND),
        }
    }
}

/// How an attack landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttackKind {
    /// Defender dodged.
    Dodged,
    /// Attacker missed.
    Missed,
    /// Normal hit.
    Hit,
    /// Critical hit.
    Critical,
}

/// One resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackEvent {
    /// Who attacked.
    pub attacker: Side,
    /// How it landed.
    pub kind: AttackKind,
    /// Damage dealt.
    pub damage: u32,
}

/// Initiative roll: speed + uniform integer in `[0, ceil(speed / 2)]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn roll_initiative(speed: f64, rolls: &mut dyn RollSource) -> f64 {
    let speed = speed.max(0.0);
    let spread = (speed / 2.0).ceil() as u64;
    speed + rolls.int_inclusive(0, spread) as f64
}

/// Decide who acts first; exact ties go to a fair coin.
pub fn first_mover(player: &Combatant, enemy: &Combatant, rolls: &mut dyn RollSource) -> Side {
    let p = roll_initiative(player.speed, rolls);
    let e = roll_initiative(enemy.speed, rolls);
    if p > e {
        Side::Player
    } else if e > p {
        Side::Enemy
    } else if rolls.chance(0.5) {
        Side::Player
    } else {
        Side::Enemy
    }
}

/// Resolve one attack.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resolve_attack(
    side: Side,
    attacker: &Combatant,
    defender: &Combatant,
    rolls: &mut dyn RollSource,
) -> AttackEvent {
    let miss = |kind| AttackEvent {
        attacker: side,
        kind,
        damage: 0,
    };

    if rolls.chance(defender.dodge / 100.0) {
        return miss(AttackKind::Dodged);
    }
    if rolls.uniform(0.0, 100.0) >= attacker.hit {
        return miss(AttackKind::Missed);
    }

    let variance = rolls.uniform(VARIANCE.0, VARIANCE.1);
    let defense_factor = rolls.uniform(DEFENSE_FACTOR.0, DEFENSE_FACTOR.1);
    let mut damage = (attacker.attack * variance - defender.defense * defense_factor)
        .max(1.0)
        .round();

    let mut kind = AttackKind::Hit;
    if rolls.chance(attacker.crit / 100.0) {
        damage = (damage * rolls.uniform(CRIT_FACTOR.0, CRIT_FACTOR.1)).round();
        kind = AttackKind::Critical;
    }

    AttackEvent {
        attacker: side,
        kind,
        damage: damage.min(f64::from(u32::MAX)) as u32,
    }
}
