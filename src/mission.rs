//! Mission definitions.
//!
//! Levels 1-5 are hand-authored. Every later level scales the level-5 block
//! field by field:
//!
//! value(level) = round(value₅ × rate^(level − 5))
//!
//! | field  | rate |
//! |--------|------|
//! | HP     | 1.03 |
//! | ATK    | 1.02 |
//! | DEF    | 1.02 |
//! | SPD    | 1.01 |
//! | reward | 1.01 |

use serde::{Deserialize, Serialize};

/// Number of hand-authored levels.
pub const AUTHORED_LEVELS: u32 = 5;

const HP_GROWTH: f64 = 1.03;
const ATK_GROWTH: f64 = 1.02;
const DEF_GROWTH: f64 = 1.02;
const SPD_GROWTH: f64 = 1.01;
const REWARD_GROWTH: f64 = 1.01;

/// Enemy stats and reward for one mission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionDef {
    /// Mission level, from 1.
    pub level: u32,
    /// Enemy hit points.
    pub enemy_hp: u32,
    /// Enemy attack.
    pub enemy_atk: u32,
    /// Enemy defense.
    pub enemy_def: u32,
    /// Enemy speed.
    pub enemy_spd: u32,
    /// JetFuel granted on a win.
    pub reward: u64,
}

const fn authored(level: u32, hp: u32, atk: u32, def: u32, spd: u32, reward: u64) -> MissionDef {
    MissionDef {
        level,
        enemy_hp: hp,
        enemy_atk: atk,
        enemy_def: def,
        enemy_spd: spd,
        reward,
    }
}

const AUTHORED: [MissionDef; AUTHORED_LEVELS as usize] = [
    authored(1, 12, 4, 2, 4, 100),
    authored(2, 16, 5, 3, 5, 150),
    authored(3, 20, 6, 3, 6, 200),
    authored(4, 24, 7, 4, 7, 250),
    authored(5, 28, 8, 5, 8, 300),
];

fn scale(value: f64, rate: f64, k: i32) -> f64 {
    (value * rate.powi(k)).round().min(f64::from(u32::MAX))
}

/// Definition for any level; level 0 is treated as level 1.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn mission_for(level: u32) -> MissionDef {
    let level = level.max(1);
    if level <= AUTHORED_LEVELS {
        return AUTHORED[(level - 1) as usize];
    }

    let top = AUTHORED[(AUTHORED_LEVELS - 1) as usize];
    let k = i32::try_from(level - AUTHORED_LEVELS).unwrap_or(i32::MAX);
    MissionDef {
        level,
        enemy_hp: scale(f64::from(top.enemy_hp), HP_GROWTH, k) as u32,
        enemy_atk: scale(f64::from(top.enemy_atk), ATK_GROWTH, k) as u32,
        enemy_def: scale(f64::from(top.enemy_def), DEF_GROWTH, k) as u32,
        enemy_spd: scale(f64::from(top.enemy_spd), SPD_GROWTH, k) as u32,
        reward: (top.reward as f64 * REWARD_GROWTH.powi(k)).round() as u64,
    }
}
