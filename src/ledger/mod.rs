//! Progression ledger core
//!
//! Tracks per-game authorization, achievements, player statistics, and
//! season leaderboards in a single SQLite database.
//!
//! # Architecture
//!
//! ```text
//! register-game ──────► GameRegistry ──────┐
//! create/unlock ──────► AchievementCatalog ─┤
//! log-game-session ───► SessionRecorder ────┼──► ledger.db
//! start-new-season ───► SeasonManager ──────┘
//! ```
//!
//! Every mutation passes an authorization gate first, then commits its
//! writes in one transaction. Reads take no authorization and encode
//! absence as `None`.
//!
//! # Usage
//!
//! ```ignore
//! let ledger = GameLedger::open(&config)?;
//!
//! ledger.registry().register_game(&owner, &dev)?;
//! ledger.achievements().create_achievement(&dev, &dev, 1, "First Win", "Win your first match", 100, 1)?;
//! ledger.sessions().log_session(&dev, &dev, &player, 3600, Some(100))?;
//! ```

mod auth;
mod db;
pub mod models;
mod ops;

mod achievements;
mod registry;
mod seasons;
mod sessions;

pub use achievements::AchievementCatalog;
pub use db::LedgerDb;
pub use ops::{Operation, Reply};
pub use registry::GameRegistry;
pub use seasons::SeasonManager;
pub use sessions::SessionRecorder;

use std::path::Path;

use anyhow::Result;

use crate::config::LedgerConfig;
use models::PrincipalId;

/// Central handle over the progression ledger.
///
/// Holds the shared database and the immutable contract-owner principal.
/// Component accessors are cheap; each hands out a view over the same
/// connection.
#[derive(Clone)]
pub struct GameLedger {
    db: LedgerDb,
    owner: PrincipalId,
}

impl GameLedger {
    /// Open the ledger described by `config`.
    pub fn open(config: &LedgerConfig) -> Result<Self> {
        let db = LedgerDb::open(&config.db_path())?;
        Ok(Self {
            db,
            owner: config.owner.clone(),
        })
    }

    /// Open a ledger at a specific path with the given owner principal.
    pub fn with_path(owner: PrincipalId, path: &Path) -> Result<Self> {
        let db = LedgerDb::open(path)?;
        Ok(Self { db, owner })
    }

    /// The contract-owner principal, fixed for the ledger's lifetime.
    pub fn owner(&self) -> &PrincipalId {
        &self.owner
    }

    /// Game registration and authorization reads
    pub fn registry(&self) -> GameRegistry {
        GameRegistry::new(self.db.clone(), self.owner.clone())
    }

    /// Achievement definitions and unlocks
    pub fn achievements(&self) -> AchievementCatalog {
        AchievementCatalog::new(self.db.clone())
    }

    /// Session logging and lifetime stats
    pub fn sessions(&self) -> SessionRecorder {
        SessionRecorder::new(self.db.clone())
    }

    /// Season lifecycle and leaderboards
    pub fn seasons(&self) -> SeasonManager {
        SeasonManager::new(self.db.clone())
    }
}
