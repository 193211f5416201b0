//! Configuration, loaded from an optional TOML file.
//!
//! ```toml
//! [economy]
//! starting_jet_fuel = 100
//! battle_start_energy = 10
//! win_energy_bonus = [2, 5]
//!
//! [server]
//! bind = "127.0.0.1:8787"
//! sweep_interval_ms = 1000
//! store_path = "profiles.json"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Economy tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// JetFuel on a new profile.
    pub starting_jet_fuel: u64,
    /// Unlock frontier on a new profile.
    pub starting_unlocked_level: u32,
    /// Energy debited to start a battle.
    pub battle_start_energy: u64,
    /// Energy debited per turn.
    pub turn_energy: u64,
    /// Inclusive energy bonus range on a win.
    pub win_energy_bonus: (u64, u64),
    /// Inclusive energy bonus range on a loss.
    pub loss_energy_bonus: (u64, u64),
    /// Turn gate for whole-battle simulation.
    pub max_turns: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_jet_fuel: 100,
            starting_unlocked_level: 5,
            battle_start_energy: 10,
            turn_energy: 1,
            win_energy_bonus: (2, 5),
            loss_energy_bonus: (1, 2),
            max_turns: 200,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
    /// Request worker threads.
    pub workers: usize,
    /// Background energy sweep period; 0 disables it.
    pub sweep_interval_ms: u64,
    /// JSON profile store; in-memory when unset.
    pub store_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            workers: 4,
            sweep_interval_ms: 1000,
            store_path: None,
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Economy tuning.
    pub economy: EconomyConfig,
    /// Server settings.
    pub server: ServerConfig,
}

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        error: std::io::Error,
    },
    /// The file is not valid TOML for [`Config`].
    Parse(toml::de::Error),
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, error } => write!(f, "cannot read {}: {error}", path.display()),
            Self::Parse(e) => write!(f, "invalid config: {e}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parse TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or fails validation.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml(&text)
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.economy;
        if e.starting_unlocked_level == 0 {
            return Err(ConfigError::Invalid(
                "starting_unlocked_level must be at least 1".into(),
            ));
        }
        if e.battle_start_energy == 0 {
            return Err(ConfigError::Invalid(
                "battle_start_energy must be at least 1".into(),
            ));
        }
        if e.turn_energy == 0 {
            return Err(ConfigError::Invalid("turn_energy must be at least 1".into()));
        }
        if e.win_energy_bonus.0 > e.win_energy_bonus.1 {
            return Err(ConfigError::Invalid("win_energy_bonus range is reversed".into()));
        }
        if e.loss_energy_bonus.0 > e.loss_energy_bonus.1 {
            return Err(ConfigError::Invalid("loss_energy_bonus range is reversed".into()));
        }
        if e.max_turns == 0 {
            return Err(ConfigError::Invalid("max_turns must be at least 1".into()));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml(
            "[economy]\nstarting_jet_fuel = 500\nwin_energy_bonus = [3, 4]\n\n[server]\nworkers = 2\n",
        )
        .unwrap();
        assert_eq!(config.economy.starting_jet_fuel, 500);
        assert_eq!(config.economy.win_energy_bonus, (3, 4));
        assert_eq!(config.economy.battle_start_energy, 10);
        assert_eq!(config.server.workers, 2);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = Config::from_toml("[economy]\nloss_energy_bonus = [5, 1]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(Config::from_toml("[server]\nworkers = 0\n").is_err());
    }

    #[test]
    fn test_free_battles_rejected() {
        assert!(Config::from_toml("[economy]\nbattle_start_energy = 0\n").is_err());
        assert!(Config::from_toml("[economy]\nturn_energy = 0\n").is_err());
        assert!(Config::from_toml("[economy]\nturn_energy = 2\n").is_ok());
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(matches!(
            Config::from_toml("[economy]\nstarting_jet_fuel = \"lots\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
