//! Missions command implementation.

use super::output::{format_missions_csv, format_missions_text};
use super::{CliError, TableFormat};
use jetsquad::mission::{MissionDef, mission_for};

/// Execute the missions command.
///
/// # Errors
///
/// Returns an error if the range is empty or output fails.
pub(crate) fn execute(from: u32, to: u32, format: TableFormat) -> Result<(), CliError> {
    if from == 0 || to < from {
        return Err(CliError::new(format!("invalid level range {from}..={to}")));
    }
    let missions: Vec<MissionDef> = (from..=to).map(mission_for).collect();

    match format {
        TableFormat::Text => print!("{}", format_missions_text(&missions)),
        TableFormat::Json => println!("{}", serde_json::to_string_pretty(&missions)?),
        TableFormat::Csv => print!("{}", format_missions_csv(&missions)),
    }

    Ok(())
}
