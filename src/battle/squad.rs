//! Squad projection from the selected jets.

use serde::{Deserialize, Serialize};

/// Attack multiplier when flying without a wingman.
pub const SOLO_ATTACK: f64 = 1.5;
/// Speed multiplier when flying without a wingman.
pub const SOLO_SPEED: f64 = 1.2;
/// Attack multiplier for a matched gun pair.
pub const GUN_SYNERGY: f64 = 1.1;

/// Stats of one jet, supplied by the NFT metadata layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JetStats {
    /// Attack.
    pub attack: u32,
    /// Speed.
    pub speed: u32,
    /// Defense.
    pub defense: u32,
    /// Gun mounted on top.
    #[serde(default)]
    pub top_gun: String,
    /// Gun mounted underneath.
    #[serde(default)]
    pub bottom_gun: String,
}

/// The jets a player picked for the next battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadSelection {
    /// Lead jet.
    pub main: JetStats,
    /// Optional wingman.
    #[serde(default)]
    pub wing: Option<JetStats>,
}

/// Combat-ready squad stats. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Squad {
    /// Effective attack.
    pub attack: f64,
    /// Effective speed.
    pub speed: f64,
    /// Effective defense.
    pub defense: f64,
    /// No wingman.
    pub solo: bool,
    /// Main's top gun matches the wing's bottom gun.
    pub synergy: bool,
}

impl Squad {
    /// Combine the selected jets.
    #[must_use]
    pub fn from_selection(selection: &SquadSelection) -> Self {
        let main = &selection.main;
        match &selection.wing {
            None => Self {
                attack: f64::from(main.attack) * SOLO_ATTACK,
                speed: f64::from(main.speed) * SOLO_SPEED,
                defense: f64::from(main.defense),
                solo: true,
                synergy: false,
            },
            Some(wing) => {
                let synergy = !main.top_gun.is_empty() && main.top_gun == wing.bottom_gun;
                let attack = f64::from(main.attack) + f64::from(wing.attack);
                Self {
                    attack: if synergy { attack * GUN_SYNERGY } else { attack },
                    speed: (f64::from(main.speed) + f64::from(wing.speed)) / 2.0,
                    defense: f64::from(main.defense) + f64::from(wing.defense),
                    solo: false,
                    synergy,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jet(attack: u32, speed: u32, defense: u32, top: &str, bottom: &str) -> JetStats {
        JetStats {
            attack,
            speed,
            defense,
            top_gun: top.to_string(),
            bottom_gun: bottom.to_string(),
        }
    }

    #[test]
    fn test_solo_bonus() {
        let squad = Squad::from_selection(&SquadSelection {
            main: jet(10, 10, 4, "laser", "cannon"),
            wing: None,
        });
        assert!(squad.solo);
        assert!((squad.attack - 15.0).abs() < 1e-9);
        assert!((squad.speed - 12.0).abs() < 1e-9);
        assert!((squad.defense - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_matched_guns_synergy() {
        let squad = Squad::from_selection(&SquadSelection {
            main: jet(10, 8, 4, "laser", "cannon"),
            wing: Some(jet(6, 6, 2, "plasma", "laser")),
        });
        assert!(squad.synergy);
        assert!((squad.attack - 17.6).abs() < 1e-9);
        assert!((squad.speed - 7.0).abs() < 1e-9);
        assert!((squad.defense - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_unmatched_guns_no_synergy() {
        let squad = Squad::from_selection(&SquadSelection {
            main: jet(10, 8, 4, "laser", "cannon"),
            wing: Some(jet(6, 6, 2, "laser", "plasma")),
        });
        assert!(!squad.synergy);
        assert!((squad.attack - 16.0).abs() < 1e-9);
    }
}
