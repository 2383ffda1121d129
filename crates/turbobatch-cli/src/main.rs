//! turbobatch CLI - run and inspect Message Batches from the command line
//!
//! Provides a `turbobatch` command that submits a CSV/JSONL file as one batch,
//! follows it to completion and exports the results, plus an edge proxy server.

mod commands;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::GlobalArgs;

/// turbobatch - batch lifecycle runner for the Message Batches API
#[derive(Parser, Debug)]
#[command(name = "turbobatch", author, version, about)]
struct Args {
    #[command(flatten)]
    global: GlobalArgs,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit an input file as one batch and wait for its results
    Run {
        /// CSV or JSONL file with `custom_id` and `user_message` fields
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the results CSV
        #[arg(short, long, default_value = "results.csv")]
        output: PathBuf,
    },

    /// Show the status of a batch
    Status {
        /// Batch id (`msgbatch_...`)
        batch_id: String,
    },

    /// Download the results of an ended batch
    Results {
        /// Batch id (`msgbatch_...`)
        batch_id: String,

        /// Write a CSV file instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the endpoint is reachable
    Check,

    /// Request cancellation of a batch
    Cancel {
        /// Batch id (`msgbatch_...`)
        batch_id: String,
    },

    /// Serve the CORS edge proxy
    Proxy {
        /// Listen address
        #[arg(long, default_value = turbobatch_proxy::config::DEFAULT_BIND)]
        bind: SocketAddr,

        /// Upstream API root
        #[arg(long, default_value = turbobatch::DEFAULT_BASE_URL)]
        upstream: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Run { input, output } => commands::run::execute(&args.global, &input, &output).await,
        Command::Status { batch_id } => commands::status::execute(&args.global, &batch_id).await,
        Command::Results { batch_id, output } => {
            commands::results::execute(&args.global, &batch_id, output.as_deref()).await
        }
        Command::Check => commands::check::execute(&args.global).await,
        Command::Cancel { batch_id } => commands::cancel::execute(&args.global, &batch_id).await,
        Command::Proxy { bind, upstream } => commands::proxy::execute(bind, upstream).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let args = Args::try_parse_from([
            "turbobatch",
            "--model",
            "claude-3-5-haiku-20241022",
            "--api-key",
            "k",
            "run",
            "--input",
            "prompts.csv",
        ])
        .unwrap();

        assert_eq!(args.global.model.as_deref(), Some("claude-3-5-haiku-20241022"));
        match args.command {
            Command::Run { input, output } => {
                assert_eq!(input, PathBuf::from("prompts.csv"));
                assert_eq!(output, PathBuf::from("results.csv"));
            }
            other => panic!("Expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_check() {
        let args = Args::try_parse_from([
            "turbobatch",
            "check",
            "--endpoint",
            "http://localhost:8787/",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::Check));
        assert_eq!(args.global.endpoint, "http://localhost:8787/");
    }

    #[test]
    fn test_parse_proxy_defaults() {
        let args = Args::try_parse_from(["turbobatch", "proxy"]).unwrap();
        match args.command {
            Command::Proxy { bind, upstream } => {
                assert_eq!(bind.to_string(), "127.0.0.1:8787");
                assert_eq!(upstream, "https://api.anthropic.com/v1");
            }
            other => panic!("Expected Proxy, got {:?}", other),
        }
    }
}
