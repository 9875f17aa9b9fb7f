//! Quill CLI - split long text into chat-sized messages.
//!
//! Provides commands for:
//! - `split`: Segment text from a file, stdin, or the last session
//! - `rules`: List the configured markup rules

mod commands;
mod error;
mod output;
mod render;
mod session;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{RulesArgs, SplitArgs};
use output::Output;

/// Quill - split long text into chat-sized messages.
#[derive(Parser)]
#[command(name = "quill", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split text into segments.
    Split(SplitArgs),
    /// List configured markup rules.
    Rules(RulesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Split(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Split(args) => args.execute(),
        Commands::Rules(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
