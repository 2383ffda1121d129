//! Results command implementation.

use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use turbobatch::{Outcome, export};

use super::{GlobalArgs, parse_batch_id};

/// Execute the results command.
///
/// Writes a CSV when `output` is given, otherwise prints one line per result.
pub async fn execute(global: &GlobalArgs, batch_id: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let batch_id = parse_batch_id(batch_id)?;
    let results = global.client()?.results(&batch_id).await?;

    if let Some(output) = output {
        export::write_csv_file(&results, output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("{} results written to {}", results.len(), output.display().to_string().green());
        return Ok(());
    }

    for record in &results {
        match &record.outcome {
            Outcome::Succeeded { text } => println!("{} {}", record.custom_id.cyan(), text),
            Outcome::Errored { message } => {
                println!("{} {} {}", record.custom_id.cyan(), "error:".red(), message)
            }
            Outcome::Other { kind } => println!("{} {}", record.custom_id.cyan(), kind.dimmed()),
        }
    }
    Ok(())
}
