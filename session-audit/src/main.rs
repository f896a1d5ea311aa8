mod audit;
mod config;
mod logging;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use session_audit_common::{OutputFormat, Verdict};
use tracing::*;

use crate::config::{load_config, LoadConfigError};

/// Exit status when any integrity problem is found.
const EXIT_DIRTY: u8 = 2;

/// Validate a sessions table: (A) sessions with no links, (B) links without
/// a session, and optionally (C) links whose sortId is not a known user id.
#[derive(clap::Parser)]
#[clap(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// YAML file with default settings
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// AWS region [default: eu-west-3]
    #[clap(long)]
    pub region: Option<String>,

    /// AWS profile name
    #[clap(long)]
    pub profile: Option<String>,

    /// Sessions table name
    #[clap(long)]
    pub sessions_table: Option<String>,

    /// Users table name (optional; enables user-ref check)
    #[clap(long)]
    pub users_table: Option<String>,

    /// Output format [default: json]
    #[clap(long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Output only id/sortId for offending rows
    #[clap(long)]
    pub ids_only: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    logging::init_logging();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(error @ LoadConfigError::MissingSessionsTable) => Cli::command()
            .error(ErrorKind::MissingRequiredArgument, error)
            .exit(),
        Err(LoadConfigError::Invalid(error)) => Cli::command()
            .error(ErrorKind::ValueValidation, error)
            .exit(),
        Err(LoadConfigError::Config(error)) => {
            return Err(error).context("Could not load config");
        }
    };

    match audit::run(&config).await? {
        Verdict::Clean => {
            info!("No problems found");
            Ok(ExitCode::SUCCESS)
        }
        Verdict::Dirty => {
            warn!("Integrity problems found");
            Ok(ExitCode::from(EXIT_DIRTY))
        }
    }
}
