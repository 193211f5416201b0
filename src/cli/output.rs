//! Output formatting utilities for CLI.

use jetsquad::battle::{AttackKind, BattleSummary, Outcome, Side};
use jetsquad::mission::MissionDef;
use jetsquad::upgrade::UpgradeQuote;
use serde::Serialize;

/// Aggregated results of many simulated battles.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct SimulationStats {
    /// Battles run.
    pub(super) battles: u64,
    /// Battles won.
    pub(super) wins: u64,
    /// Battles lost.
    pub(super) losses: u64,
    /// Battles stopped by the turn gate.
    pub(super) unfinished: u64,
    /// Turns across all battles.
    total_turns: u64,
    /// Player HP left across won battles.
    hp_left_on_win: u64,
}

impl SimulationStats {
    /// Add one battle.
    pub(super) fn add(&mut self, summary: &BattleSummary) {
        self.battles += 1;
        self.total_turns += u64::from(summary.turns);
        match summary.outcome {
            Some(Outcome::Win) => {
                self.wins += 1;
                self.hp_left_on_win += u64::from(summary.player_hp);
            }
            Some(Outcome::Loss) => self.losses += 1,
            None => self.unfinished += 1,
        }
    }

    /// Merge another thread's stats.
    pub(super) fn merge(&mut self, other: &Self) {
        self.battles += other.battles;
        self.wins += other.wins;
        self.losses += other.losses;
        self.unfinished += other.unfinished;
        self.total_turns += other.total_turns;
        self.hp_left_on_win += other.hp_left_on_win;
    }

    /// Win rate (0.0-1.0).
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn win_rate(&self) -> f64 {
        if self.battles == 0 {
            return 0.0;
        }
        self.wins as f64 / self.battles as f64
    }

    /// Average battle length.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_turns(&self) -> f64 {
        if self.battles == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.battles as f64
    }

    /// Average player HP left in won battles.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_hp_on_win(&self) -> f64 {
        if self.wins == 0 {
            return 0.0;
        }
        self.hp_left_on_win as f64 / self.wins as f64
    }
}

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JsonSimulation {
    wave: u32,
    battles: u64,
    wins: u64,
    losses: u64,
    unfinished: u64,
    win_rate: f64,
    avg_turns: f64,
    avg_hp_on_win: f64,
}

impl JsonSimulation {
    /// Create from stats.
    pub(super) fn from_stats(wave: u32, stats: &SimulationStats) -> Self {
        Self {
            wave,
            battles: stats.battles,
            wins: stats.wins,
            losses: stats.losses,
            unfinished: stats.unfinished,
            win_rate: stats.win_rate(),
            avg_turns: stats.avg_turns(),
            avg_hp_on_win: stats.avg_hp_on_win(),
        }
    }
}

/// Format simulation stats as human-readable text.
pub(super) fn format_simulation_text(wave: u32, stats: &SimulationStats) -> String {
    let mut output = String::new();
    output.push_str(&format!("Simulation: wave {wave}, {} battles\n", stats.battles));
    output.push_str(&format!(
        "  Wins: {} ({:.1}%)\n",
        stats.wins,
        stats.win_rate() * 100.0
    ));
    output.push_str(&format!("  Losses: {}\n", stats.losses));
    if stats.unfinished > 0 {
        output.push_str(&format!("  Hit turn gate: {}\n", stats.unfinished));
    }
    output.push_str(&format!("  Avg turns: {:.1}\n", stats.avg_turns()));
    output.push_str(&format!("  Avg HP left on win: {:.1}\n", stats.avg_hp_on_win()));
    output
}

fn side_name(side: Side) -> &'static str {
    match side {
        Side::Player => "Squad",
        Side::Enemy => "Enemy",
    }
}

/// Format a battle log as human-readable text.
pub(super) fn format_battle_text(mission: &MissionDef, seed: u64, summary: &BattleSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Battle: wave {} (seed: {seed}), enemy HP {}\n\n",
        mission.level, mission.enemy_hp
    ));
    for turn in &summary.log {
        output.push_str(&format!("Turn {:>3}:", turn.turn));
        for event in &turn.events {
            let who = side_name(event.attacker);
            let what = match event.kind {
                AttackKind::Dodged => "was dodged".to_string(),
                AttackKind::Missed => "missed".to_string(),
                AttackKind::Hit => format!("hit for {}", event.damage),
                AttackKind::Critical => format!("CRIT for {}", event.damage),
            };
            output.push_str(&format!("  {who} {what}."));
        }
        output.push_str(&format!(
            "  [squad {} / enemy {}]\n",
            turn.player_hp, turn.enemy_hp
        ));
    }
    let result = match summary.outcome {
        Some(Outcome::Win) => "Victory",
        Some(Outcome::Loss) => "Defeat",
        None => "Turn limit reached",
    };
    output.push_str(&format!("\n{result} after {} turns\n", summary.turns));
    output
}

/// Format the mission table as human-readable text.
pub(super) fn format_missions_text(missions: &[MissionDef]) -> String {
    let mut output = String::new();
    output.push_str("Level     HP    ATK    DEF    SPD   Reward\n");
    output.push_str("------------------------------------------\n");
    for m in missions {
        output.push_str(&format!(
            "{:>5} {:>6} {:>6} {:>6} {:>6} {:>8}\n",
            m.level, m.enemy_hp, m.enemy_atk, m.enemy_def, m.enemy_spd, m.reward
        ));
    }
    output
}

/// Format the mission table as CSV.
pub(super) fn format_missions_csv(missions: &[MissionDef]) -> String {
    let mut output = String::from("level,enemy_hp,enemy_atk,enemy_def,enemy_spd,reward\n");
    for m in missions {
        output.push_str(&format!(
            "{},{},{},{},{},{}\n",
            m.level, m.enemy_hp, m.enemy_atk, m.enemy_def, m.enemy_spd, m.reward
        ));
    }
    output
}

/// Format an upgrade quote as human-readable text.
pub(super) fn format_quote_text(quote: &UpgradeQuote) -> String {
    let mut output = String::new();
    if quote.requested.is_empty() {
        output.push_str("Nothing requested\n");
        return output;
    }
    for (stat, requested) in &quote.requested {
        let applied = quote.applied.get(stat).copied().unwrap_or(0);
        output.push_str(&format!("  {stat:<12} {applied}/{requested}"));
        if quote.headroom_exhausted.contains(stat) {
            output.push_str("  (at ceiling)");
        }
        output.push('\n');
    }
    output.push_str(&format!("Total cost: {} JetFuel\n", quote.total_cost));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetsquad::mission::mission_for;

    fn summary(outcome: Option<Outcome>, turns: u32, player_hp: u32) -> BattleSummary {
        BattleSummary {
            outcome,
            turns,
            player_hp,
            enemy_hp: 0,
            log: Vec::new(),
        }
    }

    #[test]
    fn test_stats_merge() {
        let mut a = SimulationStats::default();
        a.add(&summary(Some(Outcome::Win), 4, 30));
        let mut b = SimulationStats::default();
        b.add(&summary(Some(Outcome::Loss), 6, 0));
        b.add(&summary(None, 200, 10));
        a.merge(&b);

        assert_eq!(a.battles, 3);
        assert_eq!(a.wins, 1);
        assert_eq!(a.unfinished, 1);
        assert!((a.avg_hp_on_win() - 30.0).abs() < f64::EPSILON);
        assert!((a.avg_turns() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missions_csv() {
        let csv = format_missions_csv(&[mission_for(1)]);
        assert_eq!(
            csv,
            "level,enemy_hp,enemy_atk,enemy_def,enemy_spd,reward\n1,12,4,2,4,100\n"
        );
    }
}
