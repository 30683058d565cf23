//! Session telemetry and cumulative player statistics
//!
//! Each logged session adds its duration to the player's lifetime playtime
//! and bumps the session counter. When the call carries season points and
//! the game has an open season, the delta flows to that season's leaderboard
//! within the same transaction.

use rusqlite::OptionalExtension;
use tracing::debug;

use super::auth::check_developer;
use super::db::LedgerDb;
use super::models::{credit_counter, PlayerStats, PrincipalId};
use super::seasons;
use crate::error::LedgerError;

/// Records sessions and serves lifetime stats
pub struct SessionRecorder {
    db: LedgerDb,
}

impl SessionRecorder {
    pub(crate) fn new(db: LedgerDb) -> Self {
        Self { db }
    }

    /// Log one play session of `duration_secs` for `player`. Developer only.
    ///
    /// `season_points` is forwarded to the game's current season when one is
    /// open, and ignored otherwise. An addition that would overflow any
    /// counter fails the whole call; no counter moves, including the session
    /// count.
    pub fn log_session(
        &self,
        caller: &PrincipalId,
        game: &PrincipalId,
        player: &PrincipalId,
        duration_secs: u64,
        season_points: Option<u64>,
    ) -> Result<(), LedgerError> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        check_developer(&tx, game, caller)?;

        let (playtime, sessions) = tx
            .query_row(
                "SELECT total_playtime, sessions FROM player_stats WHERE game = ?1 AND player = ?2",
                rusqlite::params![game.as_str(), player.as_str()],
                |r| Ok((r.get::<_, u64>(0)?, r.get::<_, u64>(1)?)),
            )
            .optional()?
            .unwrap_or((0, 0));

        let playtime = credit_counter(playtime, duration_secs, "total-playtime")?;
        let sessions = credit_counter(sessions, 1, "sessions")?;

        tx.execute(
            r#"INSERT INTO player_stats (game, player, total_playtime, sessions)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(game, player) DO UPDATE SET total_playtime = ?3, sessions = ?4"#,
            rusqlite::params![game.as_str(), player.as_str(), playtime, sessions],
        )?;

        if let Some(delta) = season_points {
            let current_season: Option<u64> = tx
                .query_row(
                    "SELECT current_season FROM games WHERE game = ?1",
                    [game.as_str()],
                    |r| r.get(0),
                )
                .optional()?
                .flatten();
            if let Some(season_id) = current_season {
                seasons::credit_points(&tx, game, season_id, player, delta)?;
            }
        }

        tx.commit()?;
        debug!(
            "Logged {}s session for player {} in game {}",
            duration_secs, player, game
        );
        Ok(())
    }

    /// Lifetime stats for `(game, player)`; `None` until the player has
    /// logged a session or unlocked an achievement. No authorization
    /// required to call.
    pub fn player_stats(
        &self,
        game: &PrincipalId,
        player: &PrincipalId,
    ) -> Result<Option<PlayerStats>, LedgerError> {
        let conn = self.db.conn();
        let stats = conn
            .query_row(
                r#"SELECT total_playtime, sessions, achievement_points
                   FROM player_stats WHERE game = ?1 AND player = ?2"#,
                rusqlite::params![game.as_str(), player.as_str()],
                |r| {
                    Ok(PlayerStats {
                        total_playtime: r.get(0)?,
                        sessions: r.get(1)?,
                        achievement_points: r.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(stats)
    }
}
