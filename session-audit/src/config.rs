use clap::ValueEnum;
use config::{Config, ConfigError, Environment, File, FileFormat};
use session_audit_common::{AuditConfig, AuditError};
use tracing::*;

use crate::Cli;

pub const ENV_PREFIX: &str = "SESSION_AUDIT";

#[derive(thiserror::Error, Debug)]
pub enum LoadConfigError {
    #[error("the following required argument was not provided: --sessions-table <SESSIONS_TABLE>")]
    MissingSessionsTable,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Invalid(#[from] AuditError),
}

/// Merges the optional config file, `SESSION_AUDIT_*` environment variables
/// and command-line flags, in increasing order of precedence.
pub fn load_config(cli: &Cli) -> Result<AuditConfig, LoadConfigError> {
    load_config_with_env(cli, Environment::with_prefix(ENV_PREFIX))
}

fn load_config_with_env(cli: &Cli, env: Environment) -> Result<AuditConfig, LoadConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = &cli.config {
        builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Yaml));
    }

    let output = cli
        .output
        .and_then(|format| format.to_possible_value())
        .map(|value| value.get_name().to_owned());

    let mut builder = builder
        .add_source(env)
        .set_override_option("region", cli.region.clone())?
        .set_override_option("profile", cli.profile.clone())?
        .set_override_option("sessions_table", cli.sessions_table.clone())?
        .set_override_option("users_table", cli.users_table.clone())?
        .set_override_option("output", output)?;
    if cli.ids_only {
        builder = builder.set_override("ids_only", true)?;
    }

    let settings = builder.build()?;
    match settings.get_string("sessions_table") {
        Err(ConfigError::NotFound(_)) => return Err(LoadConfigError::MissingSessionsTable),
        Err(error) => return Err(error.into()),
        Ok(_) => (),
    }

    let config: AuditConfig = settings.try_deserialize()?;
    config.validate()?;

    debug!(
        sessions_table = %config.sessions_table,
        users_table = ?config.users_table,
        region = %config.region,
        output = ?config.output,
        ids_only = config.ids_only,
        "Loaded config"
    );
    Ok(config)
}
