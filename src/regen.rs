//! Continuous-time energy regeneration.
//!
//! gain = elapsedSeconds × regenPerMin / 60
//!
//! The server tick is authoritative and never caps elapsed time. It is a
//! pure function of `(energy, lastTick, regenPerMin, energyCap, now)`, so
//! the lazy per-request tick and the background sweep can both run on the
//! same profile in any order and land on the same value.

use serde::{Deserialize, Serialize};

use crate::ledger::clamp_energy;
use crate::profile::PlayerProfile;

/// Longest step the client projection applies at once, in milliseconds.
pub const CLIENT_MAX_STEP_MS: u64 = 300_000;

/// Energy gained over `elapsed_ms` at `regen_per_min`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn accrual(elapsed_ms: u64, regen_per_min: f64) -> f64 {
    let seconds = elapsed_ms as f64 / 1000.0;
    seconds * (regen_per_min.max(0.0) / 60.0)
}

/// Bring a profile's energy up to `now` and return the new value.
///
/// A `now` earlier than `lastTick` accrues nothing and leaves `lastTick`
/// where it is.
pub fn tick(profile: &mut PlayerProfile, now: u64) -> f64 {
    if now > profile.last_tick {
        let elapsed = now - profile.last_tick;
        profile.energy += accrual(elapsed, profile.mothership.current.regen_per_min);
        profile.last_tick = now;
    }
    clamp_energy(profile);
    profile.energy
}

/// Server values a client resynchronises from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergySnapshot {
    /// Authoritative energy.
    pub energy: f64,
    /// Energy ceiling.
    pub energy_cap: u32,
    /// Regeneration rate.
    pub regen_per_min: f64,
    /// Server time the snapshot was taken.
    pub at: u64,
}

impl EnergySnapshot {
    /// Snapshot a profile as of its last tick.
    #[must_use]
    pub fn of(profile: &PlayerProfile) -> Self {
        Self {
            energy: profile.energy,
            energy_cap: profile.energy_cap(),
            regen_per_min: profile.mothership.current.regen_per_min,
            at: profile.last_tick,
        }
    }
}

/// Advisory client-side energy projection.
///
/// Steps longer than [`CLIENT_MAX_STEP_MS`] are truncated so a long pause
/// does not render as one burst. The projection drifts below server truth
/// after such a pause; every [`sync`](Self::sync) replaces it outright.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientEnergyCache {
    energy: f64,
    energy_cap: u32,
    regen_per_min: f64,
    last_step: u64,
}

impl ClientEnergyCache {
    /// Start from a server snapshot.
    #[must_use]
    pub fn new(snapshot: EnergySnapshot) -> Self {
        Self {
            energy: snapshot.energy,
            energy_cap: snapshot.energy_cap,
            regen_per_min: snapshot.regen_per_min,
            last_step: snapshot.at,
        }
    }

    /// Advance the local estimate to `now`.
    pub fn step(&mut self, now: u64) -> f64 {
        if now > self.last_step {
            let elapsed = (now - self.last_step).min(CLIENT_MAX_STEP_MS);
            self.energy = (self.energy + accrual(elapsed, self.regen_per_min))
                .clamp(0.0, f64::from(self.energy_cap));
            self.last_step = now;
        }
        self.energy
    }

    /// Replace the estimate with server truth.
    pub fn sync(&mut self, snapshot: EnergySnapshot) {
        *self = Self::new(snapshot);
    }

    /// Energy as displayed.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn displayed(&self) -> u64 {
        self.energy.max(0.0).floor() as u64
    }
}
