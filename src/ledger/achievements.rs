//! Achievement catalog and unlock engine
//!
//! Definitions are immutable once created and duplicate ids are rejected.
//! Unlocking is one-time per `(game, player, achievement)`: the unlock row
//! and the point credit land in the same transaction, and a repeat unlock is
//! a successful no-op that credits nothing.

use chrono::Utc;
use rusqlite::OptionalExtension;
use tracing::{debug, info};

use super::auth::check_developer;
use super::db::LedgerDb;
use super::models::{
    credit_counter, ensure_representable, validate_text, AchievementDef, PlayerAchievementStatus,
    PrincipalId, MAX_DESCRIPTION_LEN, MAX_NAME_LEN,
};
use crate::error::LedgerError;

/// Per-game achievement definitions and player unlock state
pub struct AchievementCatalog {
    db: LedgerDb,
}

impl AchievementCatalog {
    pub(crate) fn new(db: LedgerDb) -> Self {
        Self { db }
    }

    /// Define a new achievement for `game`. Developer only.
    ///
    /// Ids are unique within a game: defining an id twice fails with
    /// `AchievementExists` and leaves the original definition intact.
    #[allow(clippy::too_many_arguments)]
    pub fn create_achievement(
        &self,
        caller: &PrincipalId,
        game: &PrincipalId,
        id: u64,
        name: &str,
        description: &str,
        points: u64,
        kind: u64,
    ) -> Result<(), LedgerError> {
        validate_text("name", name, MAX_NAME_LEN)?;
        validate_text("description", description, MAX_DESCRIPTION_LEN)?;
        ensure_representable(id, "achievement-id")?;
        ensure_representable(points, "points")?;
        ensure_representable(kind, "kind")?;
        let now = Utc::now().timestamp_millis();

        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        check_developer(&tx, game, caller)?;

        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM achievement_defs WHERE game = ?1 AND achievement_id = ?2)",
            rusqlite::params![game.as_str(), id],
            |r| r.get(0),
        )?;
        if exists {
            return Err(LedgerError::AchievementExists { id });
        }

        tx.execute(
            r#"INSERT INTO achievement_defs
               (game, achievement_id, name, description, points, kind, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            rusqlite::params![game.as_str(), id, name, description, points, kind, now],
        )?;
        tx.commit()?;
        debug!("Created achievement {} ({}) for game {}", id, name, game);
        Ok(())
    }

    /// Unlock achievement `id` for `player`, crediting the definition's
    /// points onto the player's lifetime stats. Developer only.
    ///
    /// The stats row is created with zero defaults if the player has none
    /// yet. If the player already holds the unlock, the call succeeds
    /// without crediting again.
    pub fn unlock_achievement(
        &self,
        caller: &PrincipalId,
        game: &PrincipalId,
        player: &PrincipalId,
        id: u64,
    ) -> Result<(), LedgerError> {
        ensure_representable(id, "achievement-id")?;
        let now = Utc::now().timestamp_millis();

        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        check_developer(&tx, game, caller)?;

        let points: u64 = tx
            .query_row(
                "SELECT points FROM achievement_defs WHERE game = ?1 AND achievement_id = ?2",
                rusqlite::params![game.as_str(), id],
                |r| r.get(0),
            )
            .optional()?
            .ok_or(LedgerError::AchievementNotFound { id })?;

        let inserted = tx.execute(
            r#"INSERT OR IGNORE INTO player_achievements
               (game, player, achievement_id, unlocked, unlocked_at)
               VALUES (?1, ?2, ?3, 1, ?4)"#,
            rusqlite::params![game.as_str(), player.as_str(), id, now],
        )?;

        // Credit points only when the unlock is new; a repeat call must not
        // credit twice.
        if inserted == 1 {
            let current: u64 = tx
                .query_row(
                    "SELECT achievement_points FROM player_stats WHERE game = ?1 AND player = ?2",
                    rusqlite::params![game.as_str(), player.as_str()],
                    |r| r.get(0),
                )
                .optional()?
                .unwrap_or(0);
            let credited = credit_counter(current, points, "achievement-points")?;
            tx.execute(
                r#"INSERT INTO player_stats (game, player, achievement_points)
                   VALUES (?1, ?2, ?3)
                   ON CONFLICT(game, player) DO UPDATE SET achievement_points = ?3"#,
                rusqlite::params![game.as_str(), player.as_str(), credited],
            )?;
            info!(
                "Unlocked achievement {} for player {} (+{} points)",
                id, player, points
            );
        }
        tx.commit()?;
        Ok(())
    }

    /// Unlock status for `(game, player, id)`; `None` until an unlock has
    /// been recorded. No authorization required to call.
    pub fn player_achievement_status(
        &self,
        game: &PrincipalId,
        player: &PrincipalId,
        id: u64,
    ) -> Result<Option<PlayerAchievementStatus>, LedgerError> {
        let conn = self.db.conn();
        let status = conn
            .query_row(
                r#"SELECT unlocked, unlocked_at FROM player_achievements
                   WHERE game = ?1 AND player = ?2 AND achievement_id = ?3"#,
                rusqlite::params![game.as_str(), player.as_str(), id],
                |r| {
                    Ok(PlayerAchievementStatus {
                        unlocked: r.get(0)?,
                        unlocked_at: r.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(status)
    }

    /// A single achievement definition, if present.
    pub fn achievement(
        &self,
        game: &PrincipalId,
        id: u64,
    ) -> Result<Option<AchievementDef>, LedgerError> {
        let conn = self.db.conn();
        let def = conn
            .query_row(
                r#"SELECT achievement_id, name, description, points, kind, created_at
                   FROM achievement_defs WHERE game = ?1 AND achievement_id = ?2"#,
                rusqlite::params![game.as_str(), id],
                row_to_def,
            )
            .optional()?;
        Ok(def)
    }

    /// All achievement definitions for a game, ordered by id.
    pub fn list_achievements(
        &self,
        game: &PrincipalId,
    ) -> Result<Vec<AchievementDef>, LedgerError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            r#"SELECT achievement_id, name, description, points, kind, created_at
               FROM achievement_defs WHERE game = ?1 ORDER BY achievement_id"#,
        )?;
        let defs = stmt
            .query_map([game.as_str()], row_to_def)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(defs)
    }
}

fn row_to_def(r: &rusqlite::Row<'_>) -> rusqlite::Result<AchievementDef> {
    Ok(AchievementDef {
        achievement_id: r.get(0)?,
        name: r.get(1)?,
        description: r.get(2)?,
        points: r.get(3)?,
        kind: r.get(4)?,
        created_at: r.get(5)?,
    })
}
