//! Request bodies accepted by the router.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::battle::SquadSelection;
use crate::engine::FinishReport;
use crate::error::{EngineError, EngineResult};
use crate::profile::Address;
use crate::stats::StatKind;
use crate::upgrade::UpgradeOps;

/// `session/start`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStartRequest {
    /// Player address.
    pub address: String,
}

/// Address plus nonce; the shape of every mutating request.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthedRequest {
    /// Player address.
    pub address: String,
    /// Current session nonce.
    #[serde(default)]
    pub nonce: Option<String>,
}

/// `battle/start`.
#[derive(Debug, Clone, Deserialize)]
pub struct BattleStartRequest {
    /// Player address.
    pub address: String,
    /// Current session nonce.
    #[serde(default)]
    pub nonce: Option<String>,
    /// Mission to start; defaults to the selected or frontier wave.
    #[serde(default)]
    pub wave: Option<u32>,
    /// Jets for server-resolved turns.
    #[serde(default)]
    pub squad: Option<SquadSelection>,
}

/// `battle/select`.
#[derive(Debug, Clone, Deserialize)]
pub struct BattleSelectRequest {
    /// Player address.
    pub address: String,
    /// Current session nonce.
    #[serde(default)]
    pub nonce: Option<String>,
    /// Mission to select.
    pub wave: u32,
    /// Jets for server-resolved turns.
    #[serde(default)]
    pub squad: Option<SquadSelection>,
}

/// `battle/finish`.
#[derive(Debug, Clone, Deserialize)]
pub struct BattleFinishRequest {
    /// Player address.
    pub address: String,
    /// Current session nonce.
    #[serde(default)]
    pub nonce: Option<String>,
    /// Client-resolved result.
    #[serde(flatten)]
    pub report: FinishReport,
}

/// `ms/upgrade` and `ms/quote`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeRequest {
    /// Player address.
    pub address: String,
    /// Current session nonce; ignored by `ms/quote`.
    #[serde(default)]
    pub nonce: Option<String>,
    /// Requested increments keyed by stat name.
    #[serde(default)]
    pub ops: BTreeMap<String, u32>,
}

impl UpgradeRequest {
    /// Resolve stat names, dropping zero counts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for an unknown stat name or for two keys
    /// naming the same stat.
    pub fn ops(&self) -> EngineResult<UpgradeOps> {
        let mut ops = UpgradeOps::new();
        let mut seen = Vec::with_capacity(self.ops.len());
        for (name, &count) in &self.ops {
            let stat: StatKind = name.parse().map_err(EngineError::InvalidRequest)?;
            if seen.contains(&stat) {
                return Err(EngineError::invalid(format!("stat '{stat}' given twice")));
            }
            seen.push(stat);
            if count > 0 {
                ops.insert(stat, count);
            }
        }
        Ok(ops)
    }
}

/// Parse a raw address field.
///
/// # Errors
///
/// Returns `InvalidRequest` for an empty or malformed address.
pub fn address(raw: &str) -> EngineResult<Address> {
    Address::parse(raw)
}
