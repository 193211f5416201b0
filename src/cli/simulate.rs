//! Simulate command implementation.

use super::output::{JsonSimulation, SimulationStats, format_simulation_text};
use super::{CliError, OutputFormat, SquadArgs, mothership_at};
use indicatif::{ProgressBar, ProgressStyle};
use jetsquad::battle::{Combatant, Squad, run_battle};
use jetsquad::config::Config;
use jetsquad::mission::mission_for;
use jetsquad::rng::SeededRolls;
use rayon::prelude::*;
use std::time::Instant;
use tracing::debug;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or output fails.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    config: &Config,
    wave: u32,
    battles: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    squad: &SquadArgs,
    levels: &[String],
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    let selection = squad.selection()?;
    let ms = mothership_at(levels)?;
    let mission = mission_for(wave);
    let player = Combatant::player(&Squad::from_selection(&selection), &ms.current);
    let enemy = Combatant::enemy(&mission, player.speed);
    let max_turns = config.economy.max_turns;

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed.unwrap_or_else(rand::random);

    let pb = if progress {
        let pb = ProgressBar::new(battles);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} battles ({per_sec})")
                .map_err(|e| CliError::new(format!("bad progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread folds into its own stats; merged at the end.
    let stats = (0..battles)
        .into_par_iter()
        .fold(SimulationStats::default, |mut local, i| {
            let mut rolls = SeededRolls::new(base_seed.wrapping_add(i));
            let summary = run_battle(
                &player,
                &enemy,
                ms.current.health,
                mission.enemy_hp,
                max_turns,
                &mut rolls,
            );
            local.add(&summary);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SimulationStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    debug!(battles = stats.battles, elapsed = ?duration, "simulation finished");

    match format {
        OutputFormat::Text => {
            print!("{}", format_simulation_text(mission.level, &stats));
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSimulation::from_stats(mission.level, &stats))?;
            println!("{json}");
        }
    }

    Ok(())
}
