//! CLI command implementations for Jetsquad.

pub(crate) mod battle;
pub(crate) mod missions;
pub(crate) mod quote;
pub(crate) mod serve;
pub(crate) mod simulate;

mod output;

use clap::ValueEnum;
use jetsquad::battle::{JetStats, SquadSelection};
use jetsquad::stats::{Mothership, StatKind};
use jetsquad::upgrade::UpgradeOps;
use std::error::Error;
use std::fmt;

/// Output format for single results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TableFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Jets flown in a battle.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SquadArgs {
    /// Main jet attack
    #[arg(long, default_value = "30")]
    pub(crate) attack: u32,

    /// Main jet speed
    #[arg(long, default_value = "20")]
    pub(crate) speed: u32,

    /// Main jet defense
    #[arg(long, default_value = "20")]
    pub(crate) defense: u32,

    /// Main jet top gun
    #[arg(long, default_value = "")]
    pub(crate) top_gun: String,

    /// Wingman as attack,speed,defense[,bottom_gun]
    #[arg(long)]
    pub(crate) wing: Option<String>,
}

impl SquadArgs {
    /// Build the squad selection.
    pub(crate) fn selection(&self) -> Result<SquadSelection, CliError> {
        let wing = self.wing.as_deref().map(parse_wing).transpose()?;
        Ok(SquadSelection {
            main: JetStats {
                attack: self.attack,
                speed: self.speed,
                defense: self.defense,
                top_gun: self.top_gun.clone(),
                bottom_gun: String::new(),
            },
            wing,
        })
    }
}

fn parse_wing(spec: &str) -> Result<JetStats, CliError> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    if !(3..=4).contains(&parts.len()) {
        return Err(CliError::new(format!(
            "wing '{spec}' must be attack,speed,defense[,bottom_gun]"
        )));
    }
    let num = |s: &str| {
        s.parse::<u32>()
            .map_err(|_| CliError::new(format!("wing stat '{s}' is not a number")))
    };
    Ok(JetStats {
        attack: num(parts[0])?,
        speed: num(parts[1])?,
        defense: num(parts[2])?,
        top_gun: String::new(),
        bottom_gun: parts.get(3).map_or_else(String::new, |s| (*s).to_string()),
    })
}

/// Parse `stat=count` pairs.
pub(crate) fn parse_ops(pairs: &[String]) -> Result<UpgradeOps, CliError> {
    let mut ops = UpgradeOps::new();
    for pair in pairs {
        let (name, count) = pair
            .split_once('=')
            .ok_or_else(|| CliError::new(format!("expected stat=count, got '{pair}'")))?;
        let stat: StatKind = name.trim().parse().map_err(CliError::new)?;
        let count: u32 = count
            .trim()
            .parse()
            .map_err(|_| CliError::new(format!("bad count in '{pair}'")))?;
        if ops.insert(stat, count).is_some() {
            return Err(CliError::new(format!("stat '{name}' given twice")));
        }
    }
    Ok(ops)
}

/// A base mothership with the given upgrade levels applied, clipped at
/// each stat's ceiling.
pub(crate) fn mothership_at(levels: &[String]) -> Result<Mothership, CliError> {
    let mut ms = Mothership::default();
    for (stat, count) in parse_ops(levels)? {
        for _ in 0..count {
            if !ms.increment(stat) {
                break;
            }
        }
    }
    Ok(ms)
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<jetsquad::config::ConfigError> for CliError {
    fn from(e: jetsquad::config::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<jetsquad::store::StoreError> for CliError {
    fn from(e: jetsquad::store::StoreError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ops() {
        let ops = parse_ops(&["health=2".into(), "HIT = 1".into()]).unwrap();
        assert_eq!(ops.get(&StatKind::Health), Some(&2));
        assert_eq!(ops.get(&StatKind::Hit), Some(&1));
        assert!(parse_ops(&["health=4294967295".into(), "HEALTH=1".into()]).is_err());
        assert!(parse_ops(&["armor=1".into()]).is_err());
        assert!(parse_ops(&["health".into()]).is_err());
    }

    #[test]
    fn test_wing_spec() {
        let wing = parse_wing("10, 12, 8, laser").unwrap();
        assert_eq!(wing.speed, 12);
        assert_eq!(wing.bottom_gun, "laser");
        assert!(parse_wing("10,12").is_err());
    }

    #[test]
    fn test_mothership_at_clips_to_ceiling() {
        let ms = mothership_at(&["hit=100".into()]).unwrap();
        assert_eq!(ms.current.hit, 15);
    }
}
