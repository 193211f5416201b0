//! Error types for the economy and battle engine.

use std::fmt;

use crate::store::StoreError;

/// A spendable balance tracked by the resource ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    /// Upgrade currency.
    JetFuel,
    /// Regenerating battle resource.
    Energy,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::JetFuel => write!(f, "jetfuel"),
            Resource::Energy => write!(f, "energy"),
        }
    }
}

/// Failures reported at the operation boundary.
///
/// None of these leave a profile partially updated.
#[derive(Debug)]
pub enum EngineError {
    /// Missing or stale session nonce, or an unknown player on a mutating call.
    Unauthorized,
    /// A debit exceeded the available balance.
    InsufficientResource {
        /// Which balance was short.
        resource: Resource,
        /// Whole units required.
        need: u64,
        /// Whole units available (energy is floored).
        have: u64,
    },
    /// Malformed input, rejected before any state is touched.
    InvalidRequest(String),
    /// A turn or finish was attempted without an active battle.
    BattleNotActive,
    /// The profile store failed.
    Storage(StoreError),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidRequest`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Unauthorized => write!(f, "unauthorized"),
            EngineError::InsufficientResource {
                resource,
                need,
                have,
            } => write!(f, "insufficient {resource}: need {need}, have {have}"),
            EngineError::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            EngineError::BattleNotActive => write!(f, "battle is not active"),
            EngineError::Storage(e) => write!(f, "storage failure: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        Self::Storage(e)
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_display_carries_numbers() {
        let err = EngineError::InsufficientResource {
            resource: Resource::Energy,
            need: 10,
            have: 9,
        };
        let text = err.to_string();
        assert!(text.contains("energy"));
        assert!(text.contains("need 10"));
        assert!(text.contains("have 9"));
    }

    #[test]
    fn test_unauthorized_display_is_opaque() {
        assert_eq!(EngineError::Unauthorized.to_string(), "unauthorized");
    }
}
