//! Property-based tests for the resource ledger, energy regeneration and
//! upgrade pricing.
//!
//! Run with: cargo test --release prop_economy

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_precision_loss)]

use proptest::prelude::*;

use jetsquad::config::EconomyConfig;
use jetsquad::ledger;
use jetsquad::regen::{self, ClientEnergyCache, EnergySnapshot};
use jetsquad::upgrade::{self, UpgradeOps};
use jetsquad::{Address, EngineError, PlayerProfile, Resource, StatKind};

fn profile(now: u64) -> PlayerProfile {
    PlayerProfile::fresh(
        Address::parse("PROPPLAYER").unwrap(),
        &EconomyConfig::default(),
        now,
    )
}

fn stat() -> impl Strategy<Value = StatKind> {
    prop::sample::select(StatKind::ALL.to_vec())
}

fn ops() -> impl Strategy<Value = UpgradeOps> {
    prop::collection::btree_map(stat(), 0u32..12, 0..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Energy never leaves [0, cap] however long the player was away.
    #[test]
    fn prop_tick_respects_cap(
        energy in 0.0f64..100.0,
        elapsed in 0u64..10_000_000_000,
        regen_steps in 0u32..9,
    ) {
        let mut p = profile(0);
        p.energy = energy;
        for _ in 0..regen_steps {
            p.mothership.increment(StatKind::RegenPerMin);
        }
        let after = regen::tick(&mut p, elapsed);
        prop_assert!(after >= 0.0);
        prop_assert!(after <= f64::from(p.energy_cap()));
    }

    /// Splitting an interval into two ticks lands on the same energy.
    #[test]
    fn prop_tick_idempotent_under_split(
        energy in 0.0f64..100.0,
        a in 0u64..5_000_000,
        b in 0u64..5_000_000,
    ) {
        let (mid, end) = (a.min(b), a.max(b));
        let mut split = profile(0);
        split.energy = energy;
        let mut whole = split.clone();

        regen::tick(&mut split, mid);
        regen::tick(&mut split, mid);
        regen::tick(&mut split, end);
        regen::tick(&mut whole, end);

        prop_assert!((split.energy - whole.energy).abs() < 1e-6);
        prop_assert_eq!(split.last_tick, whole.last_tick);
    }

    /// A debit either takes exactly the amount or changes nothing.
    #[test]
    fn prop_debit_atomic(
        jet_fuel in 0u64..1_000,
        energy in 0.0f64..100.0,
        amount in 0u64..1_200,
        use_energy in any::<bool>(),
    ) {
        let resource = if use_energy { Resource::Energy } else { Resource::JetFuel };
        let mut p = profile(0);
        p.jet_fuel = jet_fuel;
        p.energy = energy;
        let before = p.clone();

        match ledger::debit(&mut p, resource, amount) {
            Ok(()) => {
                let had = ledger::balance(&before);
                let now = ledger::balance(&p);
                match resource {
                    Resource::JetFuel => prop_assert_eq!(now.jet_fuel, had.jet_fuel - amount),
                    Resource::Energy => prop_assert!((before.energy - p.energy - amount as f64).abs() < 1e-9),
                }
            }
            Err(EngineError::InsufficientResource { need, .. }) => {
                prop_assert_eq!(need, amount);
                prop_assert_eq!(&p, &before);
            }
            Err(e) => prop_assert!(false, "unexpected error {e}"),
        }
    }

    /// Upgrades never push a stat past its ceiling or JetFuel below zero,
    /// and a rejected batch leaves the profile untouched.
    #[test]
    fn prop_upgrade_bounded(jet_fuel in 0u64..20_000, batches in prop::collection::vec(ops(), 1..6)) {
        let mut p = profile(0);
        p.jet_fuel = jet_fuel;
        for batch in &batches {
            let before = p.clone();
            match upgrade::apply(&mut p, batch) {
                Ok(q) => prop_assert_eq!(p.jet_fuel, before.jet_fuel - q.total_cost),
                Err(_) => prop_assert_eq!(&p, &before),
            }
            prop_assert!(p.mothership.within_bounds());
            prop_assert!((p.energy - before.energy).abs() < 1e-12);
        }
    }

    /// Requesting more of a stat never costs less.
    #[test]
    fn prop_quote_monotone(s in stat(), n in 0u32..40, levels in 0u32..20) {
        let mut p = profile(0);
        for _ in 0..levels {
            p.mothership.increment(s);
        }
        let fewer: UpgradeOps = [(s, n)].into_iter().collect();
        let more: UpgradeOps = [(s, n + 1)].into_iter().collect();
        prop_assert!(
            upgrade::quote(&p.mothership, &fewer).total_cost
                <= upgrade::quote(&p.mothership, &more).total_cost
        );
    }

    /// Buying N levels one at a time costs what the batch quote says.
    #[test]
    fn prop_batch_equals_sequential(s in stat(), n in 0u32..30) {
        let mut batch = profile(0);
        batch.jet_fuel = u64::MAX / 2;
        let mut single = batch.clone();

        let quoted = upgrade::apply(&mut batch, &[(s, n)].into_iter().collect()).unwrap();
        let mut paid = 0;
        for _ in 0..n {
            paid += upgrade::apply(&mut single, &[(s, 1)].into_iter().collect())
                .unwrap()
                .total_cost;
        }

        prop_assert_eq!(quoted.total_cost, paid);
        prop_assert_eq!(batch.mothership, single.mothership);
    }

    /// At the ceiling, further requests are free no-ops.
    #[test]
    fn prop_headroom_idempotent(s in stat(), extra in 1u32..10) {
        let mut p = profile(0);
        p.jet_fuel = u64::MAX / 2;
        while p.mothership.increment(s) {}
        let before = p.clone();

        let q = upgrade::apply(&mut p, &[(s, extra)].into_iter().collect()).unwrap();
        prop_assert_eq!(q.total_cost, 0);
        prop_assert!(q.headroom_exhausted.contains(&s));
        prop_assert_eq!(&p, &before);
    }

    /// The client projection stays within the cap and snaps to server truth
    /// on sync.
    #[test]
    fn prop_client_cache_converges(
        energy in 0.0f64..100.0,
        steps in prop::collection::vec(0u64..1_000_000, 1..20),
    ) {
        let mut server = profile(0);
        server.energy = energy;
        let mut cache = ClientEnergyCache::new(EnergySnapshot::of(&server));

        let mut now = 0;
        for step in steps {
            now += step;
            let shown = cache.step(now);
            prop_assert!((0.0..=100.0).contains(&shown));
        }
        regen::tick(&mut server, now);
        prop_assert!(cache.step(now) <= server.energy + 1e-9);

        cache.sync(EnergySnapshot::of(&server));
        prop_assert_eq!(cache.displayed(), server.energy_whole());
    }
}
