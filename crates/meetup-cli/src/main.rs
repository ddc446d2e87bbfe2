//! `meetup` operator CLI
//!
//! Issues tokens, dry-runs authorization, draws and claims raffle wins, and
//! checks in tickets against a JSON data file. Output is JSON on stdout; logs
//! go to stderr.

use anyhow::Result;
use clap::Parser;
use meetup_cli::{execute, Command};
use meetup_core::MeetupConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meetup")]
#[command(about = "Meetup backend operator tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (defaults plus MEETUP_* environment when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data file holding the store snapshot and attendee roster
    #[arg(short, long, global = true, default_value = "meetup-data.json")]
    data: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = MeetupConfig::load(cli.config.as_deref())?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log.level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_writer(std::io::stderr)
        .init();

    let output = execute(cli.command, &config, &cli.data).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
