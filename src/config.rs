//! Ledger configuration
//!
//! Deployment-time settings: the contract-owner principal, fixed for the
//! lifetime of the deployment, and the database location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ledger::models::PrincipalId;

/// Configuration for opening a [`crate::GameLedger`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Principal allowed to register games. Immutable once deployed.
    pub owner: PrincipalId,

    /// Database file location. Defaults to `~/.game-pulse/ledger.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

impl LedgerConfig {
    pub fn new(owner: PrincipalId) -> Self {
        Self {
            owner,
            db_path: None,
        }
    }

    /// Get the default data directory (~/.game-pulse/)
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".game-pulse")
    }

    /// Resolved database path.
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("ledger.db"))
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: LedgerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}
