//! Run command implementation.

use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use turbobatch::{
    BatchHandle, BatchObserver, BatchOutcome, BatchRunner, Error, ResultRecord, export, loader,
};

use super::{GlobalArgs, print_handle};

/// Prints lifecycle events as they happen.
struct ConsoleObserver;

impl BatchObserver for ConsoleObserver {
    fn on_submitted(&self, handle: &BatchHandle) {
        println!(
            "{} {} ({} requests)",
            "Submitted".green().bold(),
            handle.batch_id.to_string().cyan(),
            handle.total()
        );
    }

    fn on_status(&self, handle: &BatchHandle) {
        println!(
            "  {} {:>3.0}%  succeeded {}  errored {}",
            handle.status.to_string().yellow(),
            handle.progress() * 100.0,
            handle.counts.succeeded,
            handle.counts.errored
        );
    }

    fn on_results(&self, records: &[ResultRecord]) {
        let failed = records.iter().filter(|r| !r.is_success()).count();
        println!(
            "{} {} results ({} failed)",
            "Retrieved".green().bold(),
            records.len(),
            failed
        );
    }

    fn on_poll_error(&self, error: &Error) {
        eprintln!("{} {}", "Status check failed:".red().bold(), error);
    }
}

/// Execute the run command.
///
/// Loads the input file, submits it as one batch, waits for the batch to
/// finish and writes the results CSV.
pub async fn execute(global: &GlobalArgs, input: &Path, output: &Path) -> anyhow::Result<()> {
    let config = global.submission_config()?;
    let records = loader::load_records(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    println!("Loaded {} records from {}", records.len(), input.display());

    let runner = BatchRunner::new(&config)?;
    let outcome = runner.run(&config, &records, &ConsoleObserver).await?;

    match outcome {
        BatchOutcome::Completed { results, .. } => {
            export::write_csv_file(&results, output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Results written to {}", output.display().to_string().green());
        }
        BatchOutcome::Stopped { handle } => {
            print_handle(&handle);
            anyhow::bail!("Batch finished as {} without results", handle.status);
        }
        BatchOutcome::PollLimitReached { handle } => {
            print_handle(&handle);
            println!(
                "{} Check again with: turbobatch status {}",
                "Still processing.".yellow(),
                handle.batch_id
            );
        }
    }

    Ok(())
}
