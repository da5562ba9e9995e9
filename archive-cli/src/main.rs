//! Binary crate for the `weather-archive` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive form/results session
//! - Human-friendly output formatting

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod configure;
mod render;
mod session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

/// Logs go to stderr so they never interleave with the table on stdout.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "archive_core=warn,archive_cli=warn",
        1 => "archive_core=info,archive_cli=info",
        _ => "archive_core=debug,archive_cli=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
