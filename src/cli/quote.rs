//! Quote command implementation.

use super::output::format_quote_text;
use super::{CliError, OutputFormat, mothership_at, parse_ops};
use jetsquad::upgrade;

/// Execute the quote command.
///
/// # Errors
///
/// Returns an error if a `stat=count` pair is malformed.
pub(crate) fn execute(levels: &[String], ops: &[String], format: OutputFormat) -> Result<(), CliError> {
    let ms = mothership_at(levels)?;
    let quote = upgrade::quote(&ms, &parse_ops(ops)?);

    match format {
        OutputFormat::Text => print!("{}", format_quote_text(&quote)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quote)?),
    }

    Ok(())
}
