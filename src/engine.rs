//! The authoritative game service.
//!
//! Every operation runs under its player's lock as one read-modify-write:
//! load (or lazily create) the profile, bring energy up to `now`, check the
//! session nonce for mutating calls, apply the change, and persist. A
//! failed operation persists nothing, so no balance is ever partially
//! updated. Different players never share a lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::battle::{
    self, BattleState, Combatant, Outcome, Phase, Settlement, Squad, SquadSelection, TurnReport,
};
use crate::clock::Clock;
use crate::config::EconomyConfig;
use crate::error::{EngineError, EngineResult, Resource};
use crate::ledger::{self, Balance};
use crate::mission::{MissionDef, mission_for};
use crate::profile::{Address, PlayerProfile};
use crate::regen;
use crate::rng::RollSource;
use crate::session;
use crate::stats::Mothership;
use crate::store::{ProfileStore, StoreError};
use crate::upgrade::{self, UpgradeOps, UpgradeQuote};

/// Profile as returned to clients; always a full resync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    /// Owner.
    pub address: Address,
    /// Mothership stats and levels.
    pub ms: Mothership,
    /// Floored energy.
    pub energy: u64,
    /// Energy ceiling.
    pub energy_cap: u32,
    /// Highest selectable mission.
    pub unlocked_level: u32,
    /// Spendable currency.
    pub jet_fuel: u64,
    /// Energy as a percentage of the cap.
    pub pct: u32,
}

impl ProfileView {
    /// Project a profile.
    #[must_use]
    pub fn of(profile: &PlayerProfile) -> Self {
        Self {
            address: profile.address.clone(),
            ms: profile.mothership,
            energy: profile.energy_whole(),
            energy_cap: profile.energy_cap(),
            unlocked_level: profile.unlocked_level,
            jet_fuel: profile.jet_fuel,
            pct: profile.energy_pct(),
        }
    }
}

/// The player's current battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSession {
    /// Mission being fought.
    pub wave: u32,
    /// Jets for server-resolved turns; absent for client-resolved battles.
    pub squad: Option<SquadSelection>,
    /// Hit points and phase.
    pub state: BattleState,
}

impl BattleSession {
    fn new(wave: u32, squad: Option<SquadSelection>, profile: &PlayerProfile) -> Self {
        let mission = mission_for(wave);
        Self {
            wave,
            squad,
            state: BattleState::new(profile.mothership.current.health, mission.enemy_hp),
        }
    }

    /// Mission definition for the selected wave.
    #[must_use]
    pub fn mission(&self) -> MissionDef {
        mission_for(self.wave)
    }
}

/// Result of a successful battle start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartReceipt {
    /// Energy left after paying for the start.
    pub energy: u64,
    /// The now-active battle.
    pub battle: BattleSession,
}

/// Result of one server-resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReceipt {
    /// What happened.
    pub turn: TurnReport,
    /// Battle after the turn.
    pub battle: BattleSession,
    /// Present when the turn ended the battle.
    pub settlement: Option<Settlement>,
    /// Profile after the turn.
    pub profile: ProfileView,
}

/// A client-resolved battle result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishReport {
    /// Claimed outcome.
    pub win: bool,
    /// Mission fought.
    pub wave: u32,
    /// Turns the client took.
    #[serde(default)]
    pub turns: u32,
    /// Claimed JetFuel reward.
    #[serde(default, rename = "rewardJF")]
    pub reward_jf: u64,
    /// Claimed energy bonus.
    #[serde(default)]
    pub energy_refill: u64,
}

/// Which checks a player operation needs.
#[derive(Debug, Clone, Copy)]
enum Access<'a> {
    /// Read, creating the profile on first reference.
    Read,
    /// Mutation guarded by the session nonce; the profile must exist.
    Mutate(Option<&'a str>),
}

#[derive(Debug, Clone, Default)]
struct PlayerSlot {
    battle: Option<BattleSession>,
}

fn lock<T>(mutex: &Mutex<T>) -> EngineResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| EngineError::Storage(StoreError::Poisoned))
}

/// Economy and battle service over a profile store.
pub struct Engine {
    store: Arc<dyn ProfileStore>,
    clock: Arc<dyn Clock>,
    rolls: Mutex<Box<dyn RollSource + Send>>,
    economy: EconomyConfig,
    slots: Mutex<HashMap<Address, Arc<Mutex<PlayerSlot>>>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("economy", &self.economy)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Build an engine.
    pub fn new(
        store: Arc<dyn ProfileStore>,
        clock: Arc<dyn Clock>,
        rolls: Box<dyn RollSource + Send>,
        economy: EconomyConfig,
    ) -> Self {
        Self {
            store,
            clock,
            rolls: Mutex::new(rolls),
            economy,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Economy settings in use.
    #[must_use]
    pub fn economy(&self) -> &EconomyConfig {
        &self.economy
    }

    fn slot(&self, address: &Address) -> EngineResult<Arc<Mutex<PlayerSlot>>> {
        let mut slots = lock(&self.slots)?;
        Ok(Arc::clone(slots.entry(address.clone()).or_default()))
    }

    /// Run `op` on one player's profile under that player's lock.
    ///
    /// `op` works on a copy of the slot. The profile is persisted only when
    /// `op` succeeds, and the slot is committed only once that write lands.
    fn with_player<T>(
        &self,
        address: &Address,
        access: Access<'_>,
        op: impl FnOnce(&mut PlayerProfile, &mut PlayerSlot) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let slot = self.slot(address)?;
        let mut slot = lock(&slot)?;
        let now = self.clock.now_ms();

        let mut profile = match (self.store.get(address)?, access) {
            (Some(profile), _) => profile,
            (None, Access::Read) => {
                info!(address = %address, "creating profile");
                PlayerProfile::fresh(address.clone(), &self.economy, now)
            }
            (None, Access::Mutate(_)) => {
                warn!(address = %address, "mutation for unknown profile");
                return Err(EngineError::Unauthorized);
            }
        };

        regen::tick(&mut profile, now);

        if let Access::Mutate(nonce) = access {
            session::authenticate(&profile, nonce)
                .inspect_err(|_| warn!(address = %address, "rejected stale or missing nonce"))?;
        }

        let mut staged = slot.clone();
        let out = op(&mut profile, &mut staged)?;
        self.store.upsert(&profile)?;
        *slot = staged;
        Ok(out)
    }

    /// Rotate the player's nonce, creating the profile if needed.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the profile cannot be persisted.
    pub fn start_session(&self, address: &Address) -> EngineResult<String> {
        self.with_player(address, Access::Read, |profile, _| {
            let nonce = session::rotate(profile, &mut rand::thread_rng());
            info!(address = %address, "session started");
            Ok(nonce)
        })
    }

    /// Current profile, created on first reference.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store fails.
    pub fn profile(&self, address: &Address) -> EngineResult<ProfileView> {
        self.with_player(address, Access::Read, |profile, _| Ok(ProfileView::of(profile)))
    }

    /// Current balances.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store fails.
    pub fn balance(&self, address: &Address) -> EngineResult<Balance> {
        self.with_player(address, Access::Read, |profile, _| Ok(ledger::balance(profile)))
    }

    /// Credit a balance directly, outside any session.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store fails.
    pub fn credit(&self, address: &Address, resource: Resource, amount: u64) -> EngineResult<Balance> {
        self.with_player(address, Access::Read, |profile, _| {
            ledger::credit(profile, resource, amount);
            debug!(address = %address, %resource, amount, "credit");
            Ok(ledger::balance(profile))
        })
    }

    /// Debit a balance directly, outside any session.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientResource` if the balance is short, leaving it
    /// unchanged.
    pub fn debit(&self, address: &Address, resource: Resource, amount: u64) -> EngineResult<Balance> {
        self.with_player(address, Access::Read, |profile, _| {
            ledger::debit(profile, resource, amount)?;
            debug!(address = %address, %resource, amount, "debit");
            Ok(ledger::balance(profile))
        })
    }

    /// Price an upgrade batch without applying it.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store fails.
    pub fn quote_upgrade(&self, address: &Address, ops: &UpgradeOps) -> EngineResult<UpgradeQuote> {
        self.with_player(address, Access::Read, |profile, _| {
            Ok(upgrade::quote(&profile.mothership, ops))
        })
    }

    /// Apply an upgrade batch, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for a bad nonce and `InsufficientResource`
    /// if the batch costs more JetFuel than the player has.
    pub fn apply_upgrade(
        &self,
        address: &Address,
        nonce: Option<&str>,
        ops: &UpgradeOps,
    ) -> EngineResult<(UpgradeQuote, ProfileView)> {
        self.with_player(address, Access::Mutate(nonce), |profile, _| {
            let applied = match upgrade::apply(profile, ops) {
                Ok(q) => q,
                Err(e) => {
                    warn!(address = %address, error = %e, "upgrade rejected");
                    return Err(e);
                }
            };
            if applied.is_empty() {
                info!(address = %address, "no upgrades applied");
            } else {
                info!(
                    address = %address,
                    cost = applied.total_cost,
                    jet_fuel = profile.jet_fuel,
                    "upgrade applied"
                );
            }
            Ok((applied, ProfileView::of(profile)))
        })
    }

    fn check_wave(profile: &PlayerProfile, wave: u32) -> EngineResult<()> {
        if wave == 0 || wave > profile.unlocked_level {
            return Err(EngineError::invalid(format!(
                "wave {wave} is outside 1..={}",
                profile.unlocked_level
            )));
        }
        Ok(())
    }

    /// Pick a mission and squad; any battle in progress is abandoned
    /// without touching energy.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for a bad nonce and `InvalidRequest` for a
    /// locked wave.
    pub fn select_battle(
        &self,
        address: &Address,
        nonce: Option<&str>,
        wave: u32,
        squad: Option<SquadSelection>,
    ) -> EngineResult<BattleSession> {
        self.with_player(address, Access::Mutate(nonce), |profile, slot| {
            Self::check_wave(profile, wave)?;
            let session = BattleSession::new(wave, squad, profile);
            debug!(address = %address, wave, "battle selected");
            slot.battle = Some(session.clone());
            Ok(session)
        })
    }

    /// Pay the start cost and make the battle Active at full HP.
    ///
    /// Without a prior selection the player's frontier wave is used.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for a bad nonce, `InvalidRequest` for a
    /// locked wave, and `InsufficientResource` when energy is below the
    /// start cost.
    pub fn start_battle(
        &self,
        address: &Address,
        nonce: Option<&str>,
        wave: Option<u32>,
        squad: Option<SquadSelection>,
    ) -> EngineResult<StartReceipt> {
        let cost = self.economy.battle_start_energy;
        self.with_player(address, Access::Mutate(nonce), |profile, slot| {
            let mut session = match (slot.battle.clone(), wave) {
                (Some(existing), None) => existing,
                (existing, Some(w)) => {
                    BattleSession::new(w, existing.and_then(|s| s.squad), profile)
                }
                (None, None) => BattleSession::new(profile.unlocked_level, None, profile),
            };
            if let Some(squad) = squad {
                session.squad = Some(squad);
            }

            let checked = Self::check_wave(profile, session.wave)
                .and_then(|()| ledger::debit(profile, Resource::Energy, cost));
            if let Err(e) = checked {
                warn!(address = %address, error = %e, "battle start rejected");
                return Err(e);
            }

            // HP ceiling tracks the mothership at the moment of paying.
            session.state =
                BattleState::new(profile.mothership.current.health, session.mission().enemy_hp);
            session.state.activate();
            info!(address = %address, wave = session.wave, energy = profile.energy_whole(), "battle started");
            slot.battle = Some(session.clone());
            Ok(StartReceipt {
                energy: profile.energy_whole(),
                battle: session,
            })
        })
    }

    /// Resolve one paid turn; settles rewards when the battle ends.
    ///
    /// # Errors
    ///
    /// Returns `BattleNotActive` unless a started battle is in progress,
    /// `InvalidRequest` when no squad was selected, and
    /// `InsufficientResource` when energy is below the turn cost.
    pub fn take_turn(&self, address: &Address, nonce: Option<&str>) -> EngineResult<TurnReceipt> {
        let cost = self.economy.turn_energy;
        self.with_player(address, Access::Mutate(nonce), |profile, slot| {
            let Some(session) = slot.battle.as_mut().filter(|s| s.state.is_active()) else {
                return Err(EngineError::BattleNotActive);
            };
            let Some(selection) = &session.squad else {
                return Err(EngineError::invalid("no squad selected for server-side turns"));
            };
            ledger::ensure(profile, Resource::Energy, cost)?;

            let squad = Squad::from_selection(selection);
            let player = Combatant::player(&squad, &profile.mothership.current);
            let enemy = Combatant::enemy(&session.mission(), player.speed);

            let mut rolls = lock(&self.rolls)?;
            let report = session.state.take_turn(&player, &enemy, &mut **rolls)?;
            ledger::debit(profile, Resource::Energy, cost)?;
            debug!(
                address = %address,
                turn = report.turn,
                player_hp = report.player_hp,
                enemy_hp = report.enemy_hp,
                "turn resolved"
            );

            let settlement = report.outcome.map(|outcome| {
                let s = battle::settle(
                    profile,
                    session.wave,
                    outcome == Outcome::Win,
                    &self.economy,
                    &mut **rolls,
                );
                info!(address = %address, wave = s.wave, win = s.win, jet_fuel = s.jet_fuel, "battle settled");
                s
            });

            Ok(TurnReceipt {
                turn: report,
                battle: session.clone(),
                settlement,
                profile: ProfileView::of(profile),
            })
        })
    }

    /// Reset HP to full and return to Idle without touching energy.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for a bad nonce.
    pub fn restart_battle(&self, address: &Address, nonce: Option<&str>) -> EngineResult<BattleSession> {
        self.with_player(address, Access::Mutate(nonce), |profile, slot| {
            let session = slot
                .battle
                .get_or_insert_with(|| BattleSession::new(profile.unlocked_level, None, profile));
            session.state =
                BattleState::new(profile.mothership.current.health, session.mission().enemy_hp);
            debug!(address = %address, wave = session.wave, "battle restarted");
            Ok(session.clone())
        })
    }

    /// Settle a battle the client resolved itself.
    ///
    /// # Errors
    ///
    /// Returns `BattleNotActive` unless a started battle is in progress and
    /// `InvalidRequest` if `wave` differs from the started one.
    pub fn finish_battle(
        &self,
        address: &Address,
        nonce: Option<&str>,
        report: FinishReport,
    ) -> EngineResult<(Settlement, ProfileView)> {
        self.with_player(address, Access::Mutate(nonce), |profile, slot| {
            let Some(session) = slot.battle.as_mut().filter(|s| s.state.is_active()) else {
                return Err(EngineError::BattleNotActive);
            };
            if session.wave != report.wave {
                return Err(EngineError::invalid(format!(
                    "finish for wave {} but wave {} was started",
                    report.wave, session.wave
                )));
            }

            let s = battle::settle_reported(
                profile,
                report.wave,
                report.win,
                report.reward_jf,
                report.energy_refill,
                &self.economy,
            );
            session.state.phase = Phase::Terminal;
            info!(
                address = %address,
                wave = s.wave,
                win = s.win,
                turns = report.turns,
                jet_fuel = s.jet_fuel,
                "reported battle settled"
            );
            Ok((s, ProfileView::of(profile)))
        })
    }

    /// The player's current battle, if any.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the store fails.
    pub fn battle_status(&self, address: &Address) -> EngineResult<Option<BattleSession>> {
        self.with_player(address, Access::Read, |_, slot| Ok(slot.battle.clone()))
    }

    /// Bring every stored profile's energy up to now.
    ///
    /// Runs in parallel; each profile is ticked under its player's lock, so
    /// this never interleaves with a request for the same player. A profile
    /// is written back only when its whole-unit energy moved; a later tick
    /// from the stored `last_tick` lands on the same value.
    ///
    /// # Errors
    ///
    /// Returns the first store failure; other profiles are still swept.
    pub fn sweep(&self) -> EngineResult<usize> {
        let addresses = self.store.addresses()?;
        let results: Vec<EngineResult<()>> = addresses
            .par_iter()
            .map(|address| {
                let slot = self.slot(address)?;
                let _guard = lock(&slot)?;
                if let Some(mut profile) = self.store.get(address)? {
                    let before = profile.energy_whole();
                    regen::tick(&mut profile, self.clock.now_ms());
                    if profile.energy_whole() != before {
                        self.store.upsert(&profile)?;
                    }
                }
                Ok(())
            })
            .collect();

        let swept = results.iter().filter(|r| r.is_ok()).count();
        debug!(profiles = swept, "energy sweep");
        results.into_iter().collect::<EngineResult<Vec<()>>>()?;
        Ok(swept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::JetStats;
    use crate::clock::ManualClock;
    use crate::rng::SeededRolls;
    use crate::stats::StatKind;
    use crate::store::MemoryStore;

    fn engine() -> (Engine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let engine = Engine::new(
            Arc::new(MemoryStore::new()),
            clock.clone(),
            Box::new(SeededRolls::new(77)),
            EconomyConfig::default(),
        );
        (engine, clock)
    }

    fn addr() -> Address {
        Address::parse("PILOT1").unwrap()
    }

    fn strong_squad() -> SquadSelection {
        SquadSelection {
            main: JetStats {
                attack: 40,
                speed: 20,
                defense: 20,
                top_gun: "laser".into(),
                bottom_gun: "laser".into(),
            },
            wing: None,
        }
    }

    #[test]
    fn test_profile_created_on_first_read() {
        let (engine, _) = engine();
        let view = engine.profile(&addr()).unwrap();
        assert_eq!(view.jet_fuel, 100);
        assert_eq!(view.energy, 100);
        assert_eq!(view.energy_cap, 100);
        assert_eq!(view.unlocked_level, 5);
        assert_eq!(view.pct, 100);
    }

    #[test]
    fn test_mutation_without_session_unauthorized() {
        let (engine, _) = engine();
        let err = engine.start_battle(&addr(), Some("x"), None, None).unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized));
    }

    #[test]
    fn test_stale_nonce_after_rotation() {
        let (engine, _) = engine();
        let old = engine.start_session(&addr()).unwrap();
        let new = engine.start_session(&addr()).unwrap();
        assert!(matches!(
            engine.start_battle(&addr(), Some(&old), None, None),
            Err(EngineError::Unauthorized)
        ));
        assert!(engine.start_battle(&addr(), Some(&new), None, None).is_ok());
    }

    #[test]
    fn test_start_debits_ten() {
        let (engine, _) = engine();
        let nonce = engine.start_session(&addr()).unwrap();
        let receipt = engine.start_battle(&addr(), Some(&nonce), Some(3), None).unwrap();
        assert_eq!(receipt.energy, 90);
        assert_eq!(receipt.battle.wave, 3);
        assert_eq!(receipt.battle.state.phase, Phase::Active);
    }

    #[test]
    fn test_start_with_nine_energy_fails_cleanly() {
        let (engine, _) = engine();
        let nonce = engine.start_session(&addr()).unwrap();
        engine.debit(&addr(), Resource::Energy, 91).unwrap();
        let err = engine.start_battle(&addr(), Some(&nonce), None, None).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientResource {
                resource: Resource::Energy,
                need: 10,
                have: 9
            }
        ));
        assert_eq!(engine.profile(&addr()).unwrap().energy, 9);
        assert!(engine.battle_status(&addr()).unwrap().is_none());
    }

    #[test]
    fn test_turn_without_start_is_locked() {
        let (engine, _) = engine();
        let nonce = engine.start_session(&addr()).unwrap();
        engine
            .select_battle(&addr(), Some(&nonce), 1, Some(strong_squad()))
            .unwrap();
        assert!(matches!(
            engine.take_turn(&addr(), Some(&nonce)),
            Err(EngineError::BattleNotActive)
        ));
        assert_eq!(engine.profile(&addr()).unwrap().energy, 100);
    }

    #[test]
    fn test_server_battle_runs_to_settlement() {
        let (engine, _) = engine();
        let nonce = engine.start_session(&addr()).unwrap();
        engine
            .select_battle(&addr(), Some(&nonce), 5, Some(strong_squad()))
            .unwrap();
        engine.start_battle(&addr(), Some(&nonce), None, None).unwrap();

        let mut last = None;
        for _ in 0..80 {
            let receipt = engine.take_turn(&addr(), Some(&nonce)).unwrap();
            if receipt.settlement.is_some() {
                last = Some(receipt);
                break;
            }
        }
        let receipt = last.unwrap();
        let settlement = receipt.settlement.unwrap();
        assert_eq!(receipt.battle.state.phase, Phase::Terminal);
        if settlement.win {
            assert_eq!(receipt.profile.jet_fuel, 400);
            assert_eq!(receipt.profile.unlocked_level, 6);
        }
        assert!(matches!(
            engine.take_turn(&addr(), Some(&nonce)),
            Err(EngineError::BattleNotActive)
        ));
    }

    #[test]
    fn test_turn_needs_squad() {
        let (engine, _) = engine();
        let nonce = engine.start_session(&addr()).unwrap();
        engine.start_battle(&addr(), Some(&nonce), None, None).unwrap();
        assert!(matches!(
            engine.take_turn(&addr(), Some(&nonce)),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_restart_keeps_energy() {
        let (engine, _) = engine();
        let nonce = engine.start_session(&addr()).unwrap();
        engine.start_battle(&addr(), Some(&nonce), None, None).unwrap();
        let session = engine.restart_battle(&addr(), Some(&nonce)).unwrap();
        assert_eq!(session.state.phase, Phase::Idle);
        assert_eq!(engine.profile(&addr()).unwrap().energy, 90);
    }

    #[test]
    fn test_finish_requires_started_wave() {
        let (engine, _) = engine();
        let nonce = engine.start_session(&addr()).unwrap();
        let report = FinishReport {
            win: true,
            wave: 5,
            turns: 4,
            reward_jf: 300,
            energy_refill: 3,
        };
        assert!(matches!(
            engine.finish_battle(&addr(), Some(&nonce), report),
            Err(EngineError::BattleNotActive)
        ));

        engine.start_battle(&addr(), Some(&nonce), Some(5), None).unwrap();
        let (settlement, view) = engine.finish_battle(&addr(), Some(&nonce), report).unwrap();
        assert_eq!(settlement.jet_fuel, 300);
        assert_eq!(view.jet_fuel, 400);
        assert_eq!(view.unlocked_level, 6);

        // Second finish for the same paid start is refused.
        assert!(matches!(
            engine.finish_battle(&addr(), Some(&nonce), report),
            Err(EngineError::BattleNotActive)
        ));
    }

    #[test]
    fn test_locked_wave_rejected() {
        let (engine, _) = engine();
        let nonce = engine.start_session(&addr()).unwrap();
        assert!(matches!(
            engine.start_battle(&addr(), Some(&nonce), Some(6), None),
            Err(EngineError::InvalidRequest(_))
        ));
        assert_eq!(engine.profile(&addr()).unwrap().energy, 100);
    }

    #[test]
    fn test_upgrade_through_engine() {
        let (engine, _) = engine();
        let nonce = engine.start_session(&addr()).unwrap();
        let ops: UpgradeOps = [(StatKind::Health, 1)].into_iter().collect();
        let (q, view) = engine.apply_upgrade(&addr(), Some(&nonce), &ops).unwrap();
        assert_eq!(q.total_cost, 6);
        assert_eq!(view.jet_fuel, 94);
        assert_eq!(view.ms.current.health, 65);
    }

    #[test]
    fn test_sweep_matches_lazy_tick() {
        let (swept, swept_clock) = engine();
        let (lazy, lazy_clock) = engine();
        for e in [&swept, &lazy] {
            e.debit(&addr(), Resource::Energy, 50).unwrap();
        }

        swept_clock.advance(30_000);
        assert_eq!(swept.sweep().unwrap(), 1);
        swept_clock.advance(60_000);
        assert_eq!(swept.sweep().unwrap(), 1);
        lazy_clock.advance(90_000);

        let a = swept.balance(&addr()).unwrap();
        let b = lazy.balance(&addr()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.energy, 51);
    }
}
