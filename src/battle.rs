//! Battle resolution.
//!
//! - Squad projection from the selected jets
//! - Initiative, dodge, hit, damage and crit rolls
//! - The Idle / Active / Terminal state machine
//! - Reward settlement

mod combat;
mod settle;
mod squad;
mod state;

pub use combat::{
    AttackEvent, AttackKind, Combatant, ENEMY_BASE_HIT, PLAYER_BASE_HIT, Side, first_mover,
    resolve_attack, roll_initiative,
};
pub use settle::{Settlement, settle, settle_reported};
pub use squad::{GUN_SYNERGY, JetStats, SOLO_ATTACK, SOLO_SPEED, Squad, SquadSelection};
pub use state::{BattleState, BattleSummary, Outcome, Phase, TurnReport, run_battle};
