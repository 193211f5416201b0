//! Injectable randomness for combat and reward rolls.
//!
//! Battle code never touches a global RNG. Production uses [`SeededRolls`];
//! tests script exact outcomes with [`ScriptedRolls`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of random draws.
pub trait RollSource {
    /// Uniform real in `[lo, hi)`. Returns `lo` when `hi <= lo`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;

    /// True with probability `p` (clamped to `[0, 1]`).
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform integer in `[lo, hi]`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn int_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo + 1) as f64;
        let offset = self.uniform(0.0, span).floor() as u64;
        lo + offset.min(hi - lo)
    }
}

/// Seeded pseudo-random rolls.
#[derive(Debug, Clone)]
pub struct SeededRolls {
    rng: SmallRng,
}

impl SeededRolls {
    /// Deterministic sequence for a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seeded from the OS entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl RollSource for SeededRolls {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    fn chance(&mut self, p: f64) -> bool {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.rng.gen_bool(p)
    }
}

/// Replays a fixed list of unit draws in `[0, 1)`.
///
/// `uniform(lo, hi)` maps the next draw to `lo + u × (hi − lo)`;
/// `chance(p)` succeeds when the next draw is below `p`. The list cycles.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedRolls {
    /// Cycle through `draws`.
    #[must_use]
    pub fn new(draws: Vec<f64>) -> Self {
        let draws = if draws.is_empty() { vec![0.5] } else { draws };
        Self { draws, cursor: 0 }
    }

    /// Always the same draw.
    #[must_use]
    pub fn constant(draw: f64) -> Self {
        Self::new(vec![draw])
    }

    fn next(&mut self) -> f64 {
        let u = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        u.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl RollSource for ScriptedRolls {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let u = self.next();
        if hi <= lo {
            return lo;
        }
        lo + u * (hi - lo)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }
}
