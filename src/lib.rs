//! Game Pulse - per-game progression ledger
//!
//! Tracks which developer accounts are authorized to operate a game, records
//! player session telemetry and cumulative statistics, manages an achievement
//! catalog with one-time unlock semantics, and maintains a ranked,
//! capacity-bounded leaderboard per competitive season.
//!
//! All state lives in a single SQLite database. Every mutation passes an
//! authorization gate before touching state and commits atomically; counters
//! only ever grow, and additions past the representable maximum are rejected
//! rather than wrapped.
//!
//! ## Usage
//!
//! ```ignore
//! let config = LedgerConfig::from_file(Path::new("game-pulse.toml"))?;
//! let ledger = GameLedger::open(&config)?;
//!
//! // Owner registers a game for a developer
//! ledger.registry().register_game(&owner, &dev)?;
//!
//! // The developer defines and awards achievements
//! ledger.achievements().create_achievement(&dev, &dev, 1, "First Win", "Win your first match", 100, 1)?;
//! ledger.achievements().unlock_achievement(&dev, &dev, &player, 1)?;
//! ```

pub mod config;
pub mod error;
pub mod ledger;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use ledger::models::{
    AchievementDef, GameRecord, LeaderboardEntry, PlayerAchievementStatus, PlayerStats,
    PrincipalId, Season, SeasonLeaderboard,
};
pub use ledger::{GameLedger, Operation, Reply};
