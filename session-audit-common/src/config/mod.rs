mod defaults;

use defaults::*;
use serde::Deserialize;

use crate::{AuditError, Detail, OutputFormat};

/// Settings for one audit run, merged from the config file, the
/// environment and the command line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "_default_region")]
    pub region: String,

    #[serde(default)]
    pub profile: Option<String>,

    pub sessions_table: String,

    /// Enables the user reference check.
    #[serde(default)]
    pub users_table: Option<String>,

    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default)]
    pub ids_only: bool,

    /// Total attempts per storage request, including the first one.
    #[serde(default = "_default_max_attempts")]
    pub max_attempts: u32,
}

impl AuditConfig {
    pub fn new(sessions_table: impl Into<String>) -> Self {
        Self {
            region: _default_region(),
            profile: None,
            sessions_table: sessions_table.into(),
            users_table: None,
            output: OutputFormat::default(),
            ids_only: false,
            max_attempts: _default_max_attempts(),
        }
    }

    pub fn detail(&self) -> Detail {
        Detail::from_ids_only(self.ids_only)
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if self.sessions_table.trim().is_empty() {
            return Err(AuditError::InvalidConfig(
                "sessions_table must not be empty".into(),
            ));
        }
        if self.users_table.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AuditError::InvalidConfig(
                "users_table must not be empty when set".into(),
            ));
        }
        if self.region.trim().is_empty() {
            return Err(AuditError::InvalidConfig("region must not be empty".into()));
        }
        if self.max_attempts == 0 {
            return Err(AuditError::InvalidConfig(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
