//! Battle command implementation.

use super::output::format_battle_text;
use super::{CliError, OutputFormat, SquadArgs, mothership_at};
use jetsquad::battle::{Combatant, Squad, run_battle};
use jetsquad::config::Config;
use jetsquad::mission::mission_for;
use jetsquad::rng::SeededRolls;

/// Execute the battle command.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or output fails.
pub(crate) fn execute(
    config: &Config,
    wave: u32,
    seed: Option<u64>,
    squad: &SquadArgs,
    levels: &[String],
    format: OutputFormat,
) -> Result<(), CliError> {
    let selection = squad.selection()?;
    let ms = mothership_at(levels)?;
    let mission = mission_for(wave);
    let player = Combatant::player(&Squad::from_selection(&selection), &ms.current);
    let enemy = Combatant::enemy(&mission, player.speed);

    let seed = seed.unwrap_or_else(rand::random);
    let mut rolls = SeededRolls::new(seed);
    let summary = run_battle(
        &player,
        &enemy,
        ms.current.health,
        mission.enemy_hp,
        config.economy.max_turns,
        &mut rolls,
    );

    match format {
        OutputFormat::Text => print!("{}", format_battle_text(&mission, seed, &summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
