#![no_main]

use arbitrary::Arbitrary;
use jetsquad::EngineError;
use jetsquad::battle::{BattleState, Combatant, JetStats, Phase, Squad, SquadSelection};
use jetsquad::mission::mission_for;
use jetsquad::rng::SeededRolls;
use jetsquad::stats::StatBlock;
use libfuzzer_sys::fuzz_target;

/// One jet as raw numbers.
#[derive(Arbitrary, Debug)]
struct RawJet {
    attack: u32,
    speed: u32,
    defense: u32,
    gun: u8,
}

impl RawJet {
    fn jet(&self, top: bool) -> JetStats {
        let gun = format!("g{}", self.gun % 3);
        JetStats {
            attack: self.attack,
            speed: self.speed,
            defense: self.defense,
            top_gun: if top { gun.clone() } else { String::new() },
            bottom_gun: if top { String::new() } else { gun },
        }
    }
}

/// Structured input for battle fuzzing.
#[derive(Arbitrary, Debug)]
struct BattleInput {
    main: RawJet,
    wing: Option<RawJet>,
    wave: u32,
    hit: u32,
    crit: u32,
    dodge: u32,
    health: u32,
    seed: u64,
    turns: u16,
}

fuzz_target!(|input: BattleInput| {
    let selection = SquadSelection {
        main: input.main.jet(true),
        wing: input.wing.as_ref().map(|w| w.jet(false)),
    };
    let mothership = StatBlock {
        hit: input.hit,
        crit: input.crit,
        dodge: input.dodge,
        ..StatBlock::default()
    };
    let mission = mission_for(input.wave);
    let player = Combatant::player(&Squad::from_selection(&selection), &mothership);
    let enemy = Combatant::enemy(&mission, player.speed);

    let mut rolls = SeededRolls::new(input.seed);
    let mut state = BattleState::new(input.health.max(1), mission.enemy_hp.max(1));
    state.activate();

    for _ in 0..input.turns.min(2_000) {
        let before = state;
        match state.take_turn(&player, &enemy, &mut rolls) {
            Ok(report) => {
                assert!(state.player_hp <= before.player_hp);
                assert!(state.enemy_hp <= before.enemy_hp);
                assert_eq!(report.outcome.is_some(), state.phase == Phase::Terminal);
            }
            Err(EngineError::BattleNotActive) => {
                assert_eq!(before.phase, Phase::Terminal, "turn refused while active");
                assert_eq!(state, before, "refused turn changed state");
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
});
