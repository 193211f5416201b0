//! Per-battle state machine.
//!
//! ```text
//! Idle ──start──▶ Active ──turn──▶ Active
//!   ▲                │
//!   │              turn (HP hits 0)
//!   │                ▼
//!   └──restart── Terminal ──start──▶ Active
//! ```
//!
//! Energy gating lives in the engine; this type only enforces that turns
//! are taken while Active.

use serde::{Deserialize, Serialize};

use crate::battle::combat::{AttackEvent, Combatant, Side, first_mover, resolve_attack};
use crate::error::{EngineError, EngineResult};
use crate::rng::RollSource;

/// Lifecycle phase of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Selected but not paid for.
    Idle,
    /// Paid for; turns may be taken.
    Active,
    /// One side reached zero HP.
    Terminal,
}

/// Final result of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// Enemy destroyed, player standing.
    Win,
    /// Player destroyed.
    Loss,
}

/// Everything that happened in one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    /// 1-based turn number.
    pub turn: u32,
    /// Who won initiative.
    pub first: Side,
    /// Attacks in order; one if the first attack ended the battle.
    pub events: Vec<AttackEvent>,
    /// Player HP after the turn.
    pub player_hp: u32,
    /// Enemy HP after the turn.
    pub enemy_hp: u32,
    /// Set when the turn ended the battle.
    pub outcome: Option<Outcome>,
}

/// Hit points and phase for one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleState {
    /// Current phase.
    pub phase: Phase,
    /// Player HP.
    pub player_hp: u32,
    /// Enemy HP.
    pub enemy_hp: u32,
    /// Player HP at full.
    pub player_max_hp: u32,
    /// Enemy HP at full.
    pub enemy_max_hp: u32,
    /// Turns taken since the last start.
    pub turns_elapsed: u32,
}

impl BattleState {
    /// Idle battle at full HP.
    #[must_use]
    pub const fn new(player_max_hp: u32, enemy_max_hp: u32) -> Self {
        Self {
            phase: Phase::Idle,
            player_hp: player_max_hp,
            enemy_hp: enemy_max_hp,
            player_max_hp,
            enemy_max_hp,
            turns_elapsed: 0,
        }
    }

    /// Whether turns may be taken.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Enter Active at full HP.
    pub fn activate(&mut self) {
        self.player_hp = self.player_max_hp;
        self.enemy_hp = self.enemy_max_hp;
        self.turns_elapsed = 0;
        self.phase = Phase::Active;
    }

    /// Back to Idle at full HP.
    pub fn reset(&mut self) {
        *self = Self::new(self.player_max_hp, self.enemy_max_hp);
    }

    /// Result once a side is down.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if self.enemy_hp == 0 && self.player_hp > 0 {
            Some(Outcome::Win)
        } else if self.player_hp == 0 {
            Some(Outcome::Loss)
        } else {
            None
        }
    }

    fn hp_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Player => &mut self.player_hp,
            Side::Enemy => &mut self.enemy_hp,
        }
    }

    /// Resolve one full exchange.
    ///
    /// If the first attack drops the other side to zero, the second side
    /// does not act.
    ///
    /// # Errors
    ///
    /// Returns `BattleNotActive` unless the battle is Active.
    pub fn take_turn(
        &mut self,
        player: &Combatant,
        enemy: &Combatant,
        rolls: &mut dyn RollSource,
    ) -> EngineResult<TurnReport> {
        if !self.is_active() {
            return Err(EngineError::BattleNotActive);
        }

        let first = first_mover(player, enemy, rolls);
        let mut events = Vec::with_capacity(2);

        for side in [first, first.opponent()] {
            let (attacker, defender) = match side {
                Side::Player => (player, enemy),
                Side::Enemy => (enemy, player),
            };
            let event = resolve_attack(side, attacker, defender, rolls);
            let target = self.hp_mut(side.opponent());
            *target = target.saturating_sub(event.damage);
            let downed = *target == 0;
            events.push(event);
            if downed {
                break;
            }
        }

        self.turns_elapsed += 1;
        let outcome = self.outcome();
        if outcome.is_some() {
            self.phase = Phase::Terminal;
        }

        Ok(TurnReport {
            turn: self.turns_elapsed,
            first,
            events,
            player_hp: self.player_hp,
            enemy_hp: self.enemy_hp,
            outcome,
        })
    }
}

/// Summary of a battle run to completion or to the turn gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSummary {
    /// None if the turn gate was hit first.
    pub outcome: Option<Outcome>,
    /// Turns taken.
    pub turns: u32,
    /// Player HP at the end.
    pub player_hp: u32,
    /// Enemy HP at the end.
    pub enemy_hp: u32,
    /// Turn-by-turn log.
    pub log: Vec<TurnReport>,
}

/// Run a fresh battle until one side falls or `max_turns` is reached.
#[must_use]
pub fn run_battle(
    player: &Combatant,
    enemy: &Combatant,
    player_hp: u32,
    enemy_hp: u32,
    max_turns: u32,
    rolls: &mut dyn RollSource,
) -> BattleSummary {
    let mut state = BattleState::new(player_hp, enemy_hp);
    state.activate();
    let mut log = Vec::new();

    while state.is_active() && state.turns_elapsed < max_turns {
        match state.take_turn(player, enemy, rolls) {
            Ok(report) => log.push(report),
            Err(_) => break,
        }
    }

    BattleSummary {
        outcome: state.outcome(),
        turns: state.turns_elapsed,
        player_hp: state.player_hp,
        enemy_hp: state.enemy_hp,
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRolls, SeededRolls};

    fn fighter(attack: f64, speed: f64) -> Combatant {
        Combatant {
            attack,
            defense: 0.0,
            speed,
            hit: 95.0,
            crit: 0.0,
            dodge: 0.0,
        }
    }

    #[test]
    fn test_turn_requires_active() {
        let mut state = BattleState::new(10, 10);
        let mut rolls = SeededRolls::new(1);
        let err = state
            .take_turn(&fighter(5.0, 5.0), &fighter(5.0, 5.0), &mut rolls)
            .unwrap_err();
        assert!(matches!(err, EngineError::BattleNotActive));
        assert_eq!(state.turns_elapsed, 0);
    }

    #[test]
    fn test_first_kill_prevents_retaliation() {
        let mut state = BattleState::new(10, 5);
        state.activate();
        // Player is far faster and one-shots the enemy.
        let mut rolls = ScriptedRolls::constant(0.5);
        let report = state
            .take_turn(&fighter(100.0, 50.0), &fighter(100.0, 1.0), &mut rolls)
            .unwrap();
        assert_eq!(report.first, Side::Player);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.outcome, Some(Outcome::Win));
        assert_eq!(state.player_hp, 10);
        assert_eq!(state.phase, Phase::Terminal);
    }

    #[test]
    fn test_terminal_locks_turns() {
        let mut state = BattleState::new(10, 5);
        state.activate();
        let mut rolls = ScriptedRolls::constant(0.5);
        let player = fighter(100.0, 50.0);
        let enemy = fighter(1.0, 1.0);
        state.take_turn(&player, &enemy, &mut rolls).unwrap();
        assert!(matches!(
            state.take_turn(&player, &enemy, &mut rolls),
            Err(EngineError::BattleNotActive)
        ));
        state.activate();
        assert_eq!(state.enemy_hp, 5);
        assert!(state.take_turn(&player, &enemy, &mut rolls).is_ok());
    }

    #[test]
    fn test_reset_returns_to_idle_full_hp() {
        let mut state = BattleState::new(10, 10);
        state.activate();
        state.player_hp = 3;
        state.reset();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.player_hp, 10);
    }

    #[test]
    fn test_run_battle_respects_turn_gate() {
        // Zero attack still deals the minimum 1 per hit, so cap at 3 turns.
        let mut rolls = SeededRolls::new(5);
        let summary = run_battle(&fighter(0.0, 5.0), &fighter(0.0, 5.0), 1_000, 1_000, 3, &mut rolls);
        assert_eq!(summary.turns, 3);
        assert_eq!(summary.outcome, None);
        assert_eq!(summary.log.len(), 3);
    }

    #[test]
    fn test_run_battle_finishes() {
        let mut rolls = SeededRolls::new(11);
        let summary = run_battle(&fighter(20.0, 10.0), &fighter(3.0, 5.0), 60, 28, 200, &mut rolls);
        assert!(summary.outcome.is_some());
        let last = summary.log.last().unwrap();
        assert!(last.player_hp == 0 || last.enemy_hp == 0);
    }
}
