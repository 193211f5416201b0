// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Jetsquad: the authoritative economy and battle engine for a wave-based
//! arcade battler.
//!
//! The server owns every balance. Clients only ever display what the last
//! response told them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   HTTP transport / Router (api)     │
//! ├─────────────────────────────────────┤
//! │   Engine: per-player locks, nonces  │
//! ├─────────────────────────────────────┤
//! │  ledger · regen · upgrade           │
//! │  battle · mission · session         │
//! ├─────────────────────────────────────┤
//! │   ProfileStore   Clock   RollSource │
//! └─────────────────────────────────────┘
//! ```

pub mod api;
pub mod battle;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod mission;
pub mod profile;
pub mod regen;
pub mod rng;
pub mod session;
pub mod stats;
pub mod store;
pub mod upgrade;

pub use error::{EngineError, EngineResult, Resource};

// Re-export key types at crate root for convenience
pub use engine::{BattleSession, Engine, FinishReport, ProfileView};
pub use mission::{MissionDef, mission_for};
pub use profile::{Address, PlayerProfile};
pub use stats::{Mothership, StatBlock, StatKind};
pub use upgrade::{UpgradeOps, UpgradeQuote};
