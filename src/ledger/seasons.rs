//! Seasons and capacity-bounded leaderboards
//!
//! Point credits are O(1) upserts; the ranked view is computed at read time
//! by sorting the season's entries (points descending, first-entry order as
//! the tie break) and truncating to the season's capacity. Leaderboard reads
//! are rare next to writes, so the sort cost sits on the read path.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use super::auth::check_developer;
use super::db::LedgerDb;
use super::models::{
    credit_counter, ensure_representable, LeaderboardEntry, PrincipalId, Season, SeasonLeaderboard,
};
use crate::error::LedgerError;

/// Season lifecycle and ranked standings
pub struct SeasonManager {
    db: LedgerDb,
}

impl SeasonManager {
    pub(crate) fn new(db: LedgerDb) -> Self {
        Self { db }
    }

    /// Open season `season_id` for `game` with the given leaderboard
    /// capacity, and make it the target of subsequent session point credits.
    /// Developer only.
    ///
    /// Starting an id that already exists resets that season's standings and
    /// re-arms it as the current season.
    pub fn start_season(
        &self,
        caller: &PrincipalId,
        game: &PrincipalId,
        season_id: u64,
        capacity: u64,
    ) -> Result<(), LedgerError> {
        ensure_representable(season_id, "season-id")?;
        ensure_representable(capacity, "capacity")?;
        let now = Utc::now().timestamp_millis();

        let mut conn = self.db.conn();
        let tx = conn.transaction()?;
        check_developer(&tx, game, caller)?;

        tx.execute(
            r#"INSERT INTO seasons (game, season_id, capacity, started_at)
               VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(game, season_id) DO UPDATE SET capacity = ?3, started_at = ?4"#,
            rusqlite::params![game.as_str(), season_id, capacity, now],
        )?;
        tx.execute(
            "DELETE FROM leaderboard_entries WHERE game = ?1 AND season_id = ?2",
            rusqlite::params![game.as_str(), season_id],
        )?;
        tx.execute(
            "UPDATE games SET current_season = ?2 WHERE game = ?1",
            rusqlite::params![game.as_str(), season_id],
        )?;
        tx.commit()?;
        info!("Started season {} for game {} (capacity {})", season_id, game, capacity);
        Ok(())
    }

    /// Ranked standings for `(game, season_id)`; `None` if the season was
    /// never started. No authorization required to call.
    pub fn leaderboard(
        &self,
        game: &PrincipalId,
        season_id: u64,
    ) -> Result<Option<SeasonLeaderboard>, LedgerError> {
        let conn = self.db.conn();
        let capacity: Option<u64> = conn
            .query_row(
                "SELECT capacity FROM seasons WHERE game = ?1 AND season_id = ?2",
                rusqlite::params![game.as_str(), season_id],
                |r| r.get(0),
            )
            .optional()?;
        let Some(capacity) = capacity else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            r#"SELECT player, points FROM leaderboard_entries
               WHERE game = ?1 AND season_id = ?2
               ORDER BY points DESC, entry_seq ASC
               LIMIT ?3"#,
        )?;
        let top_players = stmt
            .query_map(
                rusqlite::params![game.as_str(), season_id, capacity],
                |r| {
                    Ok(LeaderboardEntry {
                        player: PrincipalId::new(r.get::<_, String>(0)?),
                        points: r.get(1)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(SeasonLeaderboard {
            season_id,
            capacity,
            top_players,
        }))
    }

    /// Season record, if it was ever started.
    pub fn season(
        &self,
        game: &PrincipalId,
        season_id: u64,
    ) -> Result<Option<Season>, LedgerError> {
        let conn = self.db.conn();
        let season = conn
            .query_row(
                "SELECT season_id, capacity, started_at FROM seasons WHERE game = ?1 AND season_id = ?2",
                rusqlite::params![game.as_str(), season_id],
                |r| {
                    Ok(Season {
                        season_id: r.get(0)?,
                        capacity: r.get(1)?,
                        started_at: r.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(season)
    }

    /// Season that point credits currently flow into for `game`.
    pub fn current_season(&self, game: &PrincipalId) -> Result<Option<u64>, LedgerError> {
        let conn = self.db.conn();
        let season: Option<u64> = conn
            .query_row(
                "SELECT current_season FROM games WHERE game = ?1",
                [game.as_str()],
                |r| r.get(0),
            )
            .optional()?
            .flatten();
        Ok(season)
    }
}

/// Add `delta` to a player's season points, creating the entry with a zero
/// default. First insert fixes the entry's tie-break position; later credits
/// keep it. Runs on the caller's transaction so the session write and the
/// credit commit together.
pub(crate) fn credit_points(
    conn: &Connection,
    game: &PrincipalId,
    season_id: u64,
    player: &PrincipalId,
    delta: u64,
) -> Result<(), LedgerError> {
    let current: u64 = conn
        .query_row(
            r#"SELECT points FROM leaderboard_entries
               WHERE game = ?1 AND season_id = ?2 AND player = ?3"#,
            rusqlite::params![game.as_str(), season_id, player.as_str()],
            |r| r.get(0),
        )
        .optional()?
        .unwrap_or(0);
    let points = credit_counter(current, delta, "season-points")?;
    conn.execute(
        r#"INSERT INTO leaderboard_entries (game, season_id, player, points)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(game, season_id, player) DO UPDATE SET points = ?4"#,
        rusqlite::params![game.as_str(), season_id, player.as_str(), points],
    )?;
    Ok(())
}
