//! # disclose CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use disclose_cli::gate::{run_save, run_token, run_verify, Endpoints, SaveArgs, TokenArgs, VerifyArgs};
use disclose_cli::link::{run_link, LinkCommand};
use disclose_cli::session::{run_session, SessionArgs};

/// Disclosure gate CLI.
///
/// Builds verification requests and universal links, persists disclosure
/// options, fetches deep-link tokens, and submits proofs for verification.
#[derive(Parser, Debug)]
#[command(name = "disclose", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    endpoints: Endpoints,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the request, universal link and digest for a config.
    Link(LinkCommand),

    /// Persist a subject's options through the gate.
    Save(SaveArgs),

    /// Fetch a deep-link token for a config.
    Token(TokenArgs),

    /// Submit a proof for verification.
    Verify(VerifyArgs),

    /// Run a full verification session and print the link and token.
    Session(SessionArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Link(args) => run_link(args, &cli.endpoints).await,
        Commands::Save(args) => run_save(args, &cli.endpoints).await,
        Commands::Token(args) => run_token(args, &cli.endpoints).await,
        Commands::Verify(args) => run_verify(args, &cli.endpoints).await,
        Commands::Session(args) => run_session(args, &cli.endpoints).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
