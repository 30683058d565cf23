//! SQLite connection and schema management for the ledger
//!
//! All ledger state lives in one database file. The schema is created
//! idempotently at open, and a `schema_version` table is kept so future
//! releases can migrate in place.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Database wrapper shared by all ledger components
#[derive(Clone)]
pub struct LedgerDb {
    conn: Arc<Mutex<Connection>>,
}

impl LedgerDb {
    /// Open or create the ledger database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create ledger dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open ledger db: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Lock the shared connection.
    ///
    /// Operations that touch more than one row open a transaction on the
    /// guarded connection so their writes commit all-or-nothing.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("ledger db lock poisoned")
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }
}

/// SQL schema for the ledger database
const SCHEMA_SQL: &str = r#"
-- Registered games, keyed by the developer principal
CREATE TABLE IF NOT EXISTS games (
    game TEXT PRIMARY KEY,
    authorized INTEGER NOT NULL DEFAULT 1,
    current_season INTEGER,
    registered_at INTEGER NOT NULL
);

-- Achievement catalog, immutable once created
CREATE TABLE IF NOT EXISTS achievement_defs (
    game TEXT NOT NULL,
    achievement_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    points INTEGER NOT NULL,
    kind INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (game, achievement_id)
);

-- One-time unlock records; the unlocked flag never reverts
CREATE TABLE IF NOT EXISTS player_achievements (
    game TEXT NOT NULL,
    player TEXT NOT NULL,
    achievement_id INTEGER NOT NULL,
    unlocked INTEGER NOT NULL DEFAULT 1,
    unlocked_at INTEGER NOT NULL,
    PRIMARY KEY (game, player, achievement_id)
);

-- Lifetime per-player counters, created lazily with zero defaults
CREATE TABLE IF NOT EXISTS player_stats (
    game TEXT NOT NULL,
    player TEXT NOT NULL,
    total_playtime INTEGER NOT NULL DEFAULT 0,
    sessions INTEGER NOT NULL DEFAULT 0,
    achievement_points INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (game, player)
);

-- Competitive seasons and their leaderboard capacity
CREATE TABLE IF NOT EXISTS seasons (
    game TEXT NOT NULL,
    season_id INTEGER NOT NULL,
    capacity INTEGER NOT NULL,
    started_at INTEGER NOT NULL,
    PRIMARY KEY (game, season_id)
);

-- Season-scoped point totals. entry_seq records first-insert order and is
-- preserved across point updates, giving a stable tie-break for ranking.
CREATE TABLE IF NOT EXISTS leaderboard_entries (
    entry_seq INTEGER PRIMARY KEY AUTOINCREMENT,
    game TEXT NOT NULL,
    season_id INTEGER NOT NULL,
    player TEXT NOT NULL,
    points INTEGER NOT NULL DEFAULT 0,
    UNIQUE (game, season_id, player)
);
CREATE INDEX IF NOT EXISTS idx_leaderboard_scope
    ON leaderboard_entries(game, season_id, points DESC);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;
