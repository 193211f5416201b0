#![no_main]

use arbitrary::Arbitrary;
use jetsquad::config::EconomyConfig;
use jetsquad::stats::StatKind;
use jetsquad::upgrade::{self, UpgradeOps};
use jetsquad::{Address, PlayerProfile};
use libfuzzer_sys::fuzz_target;

/// Structured input for upgrade fuzzing.
#[derive(Arbitrary, Debug)]
struct UpgradeInput {
    /// Starting JetFuel.
    jet_fuel: u64,
    /// Batches of (stat index, count) requests.
    batches: Vec<Vec<(u8, u16)>>,
}

fuzz_target!(|input: UpgradeInput| {
    let Ok(address) = Address::parse("FUZZ") else {
        return;
    };
    let mut profile = PlayerProfile::fresh(address, &EconomyConfig::default(), 0);
    profile.jet_fuel = input.jet_fuel;

    for batch in input.batches.iter().take(32) {
        let ops: UpgradeOps = batch
            .iter()
            .map(|&(stat, count)| {
                let stat = StatKind::ALL[usize::from(stat) % StatKind::ALL.len()];
                (stat, u32::from(count))
            })
            .collect();

        let before = profile.clone();
        match upgrade::apply(&mut profile, &ops) {
            Ok(quote) => {
                assert_eq!(profile.jet_fuel, before.jet_fuel - quote.total_cost);
            }
            Err(_) => assert_eq!(profile, before, "rejected batch mutated the profile"),
        }

        assert!(profile.mothership.within_bounds(), "stat escaped its bounds");
        assert!(profile.jet_fuel <= input.jet_fuel);
    }
});
