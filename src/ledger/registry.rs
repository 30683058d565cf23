//! Game registry - which developers may operate a game
//!
//! Registration is the only owner-gated operation. Games are never deleted
//! and the authorized flag is only ever set, never cleared.

use chrono::Utc;
use rusqlite::OptionalExtension;
use tracing::info;

use super::auth::check_owner;
use super::db::LedgerDb;
use super::models::{GameRecord, PrincipalId};
use crate::error::LedgerError;

/// Owner-gated registry of games
pub struct GameRegistry {
    db: LedgerDb,
    owner: PrincipalId,
}

impl GameRegistry {
    pub(crate) fn new(db: LedgerDb, owner: PrincipalId) -> Self {
        Self { db, owner }
    }

    /// Register a game for `developer`, authorizing them to mutate its state.
    ///
    /// Re-registering an existing game is idempotent: it re-asserts the
    /// authorized flag and preserves everything else, including the current
    /// season pointer.
    pub fn register_game(
        &self,
        caller: &PrincipalId,
        developer: &PrincipalId,
    ) -> Result<(), LedgerError> {
        check_owner(&self.owner, caller)?;
        let now = Utc::now().timestamp_millis();

        let conn = self.db.conn();
        conn.execute(
            r#"INSERT INTO games (game, authorized, registered_at) VALUES (?1, 1, ?2)
               ON CONFLICT(game) DO UPDATE SET authorized = 1"#,
            rusqlite::params![developer.as_str(), now],
        )?;
        info!("Registered game for developer {}", developer);
        Ok(())
    }

    /// Authorization flag for `developer`'s game; false if never registered.
    /// No authorization required to call.
    pub fn is_game_authorized(&self, developer: &PrincipalId) -> Result<bool, LedgerError> {
        let conn = self.db.conn();
        let authorized: Option<bool> = conn
            .query_row(
                "SELECT authorized FROM games WHERE game = ?1",
                [developer.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        Ok(authorized.unwrap_or(false))
    }

    /// Full game record, if registered.
    pub fn game(&self, developer: &PrincipalId) -> Result<Option<GameRecord>, LedgerError> {
        let conn = self.db.conn();
        let record = conn
            .query_row(
                "SELECT authorized, current_season, registered_at FROM games WHERE game = ?1",
                [developer.as_str()],
                |r| {
                    Ok(GameRecord {
                        developer: developer.clone(),
                        authorized: r.get(0)?,
                        current_season: r.get(1)?,
                        registered_at: r.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::GameLedger;
    use tempfile::tempdir;

    fn test_ledger() -> (tempfile::TempDir, GameLedger) {
        let dir = tempdir().unwrap();
        let ledger =
            GameLedger::with_path(PrincipalId::from("deployer"), &dir.path().join("ledger.db"))
                .unwrap();
        (dir, ledger)
    }

    #[test]
    fn test_register_requires_owner() {
        let (_dir, ledger) = test_ledger();
        let dev = PrincipalId::from("wallet_1");

        let result = ledger.registry().register_game(&dev, &dev);
        assert!(
            matches!(result, Err(LedgerError::OwnerOnly)),
            "non-owner registration must fail with owner-only"
        );
        // No record may be created by the failed call
        assert!(ledger.registry().game(&dev).unwrap().is_none());
        assert!(!ledger.registry().is_game_authorized(&dev).unwrap());
    }

    #[test]
    fn test_register_and_check_authorization() {
        let (_dir, ledger) = test_ledger();
        let owner = PrincipalId::from("deployer");
        let dev = PrincipalId::from("wallet_1");

        ledger.registry().register_game(&owner, &dev).unwrap();
        assert!(ledger.registry().is_game_authorized(&dev).unwrap());

        // Stays true across arbitrary subsequent reads
        for _ in 0..3 {
            assert!(ledger.registry().is_game_authorized(&dev).unwrap());
        }
    }

    #[test]
    fn test_reregister_is_idempotent() {
        let (_dir, ledger) = test_ledger();
        let owner = PrincipalId::from("deployer");
        let dev = PrincipalId::from("wallet_1");

        ledger.registry().register_game(&owner, &dev).unwrap();
        ledger.seasons().start_season(&dev, &dev, 1, 100).unwrap();

        // Re-registering keeps the game authorized and does not disturb the
        // current season pointer
        ledger.registry().register_game(&owner, &dev).unwrap();
        let record = ledger.registry().game(&dev).unwrap().unwrap();
        assert!(record.authorized);
        assert_eq!(record.current_season, Some(1));
    }

    #[test]
    fn test_unregistered_game_is_not_authorized() {
        let (_dir, ledger) = test_ledger();
        assert!(!ledger
            .registry()
            .is_game_authorized(&PrincipalId::from("nobody"))
            .unwrap());
    }
}
