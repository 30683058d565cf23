//! Authorization checks for ledger mutations
//!
//! Two gates cover every mutation: game registration requires the contract
//! owner, everything else requires the game's registered developer. A failed
//! check short-circuits before any state is touched.

use rusqlite::{Connection, OptionalExtension};

use super::models::PrincipalId;
use crate::error::LedgerError;

/// Ok iff `caller` is the configured contract owner.
pub(crate) fn check_owner(owner: &PrincipalId, caller: &PrincipalId) -> Result<(), LedgerError> {
    if caller == owner {
        Ok(())
    } else {
        Err(LedgerError::OwnerOnly)
    }
}

/// Ok iff `caller` is the registered developer of `game` and the game is
/// still authorized.
///
/// Games are keyed by their developer principal, so the caller must equal
/// the game key and a games row must exist with the authorized flag set.
pub(crate) fn check_developer(
    conn: &Connection,
    game: &PrincipalId,
    caller: &PrincipalId,
) -> Result<(), LedgerError> {
    if caller != game {
        return Err(LedgerError::NotAuthorized);
    }
    let authorized: Option<bool> = conn
        .query_row(
            "SELECT authorized FROM games WHERE game = ?1",
            [game.as_str()],
            |r| r.get(0),
        )
        .optional()?;
    match authorized {
        Some(true) => Ok(()),
        _ => Err(LedgerError::NotAuthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_owner() {
        let owner = PrincipalId::from("deployer");
        assert!(check_owner(&owner, &PrincipalId::from("deployer")).is_ok());
        assert!(matches!(
            check_owner(&owner, &PrincipalId::from("wallet_1")),
            Err(LedgerError::OwnerOnly)
        ));
    }

    #[test]
    fn test_check_developer_requires_registration() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE games (game TEXT PRIMARY KEY, authorized INTEGER NOT NULL, \
             current_season INTEGER, registered_at INTEGER NOT NULL);",
        )
        .unwrap();
        let dev = PrincipalId::from("wallet_1");

        // Unregistered game
        assert!(matches!(
            check_developer(&conn, &dev, &dev),
            Err(LedgerError::NotAuthorized)
        ));

        conn.execute(
            "INSERT INTO games (game, authorized, registered_at) VALUES (?1, 1, 0)",
            [dev.as_str()],
        )
        .unwrap();
        assert!(check_developer(&conn, &dev, &dev).is_ok());

        // A different caller never passes the gate
        assert!(matches!(
            check_developer(&conn, &dev, &PrincipalId::from("wallet_2")),
            Err(LedgerError::NotAuthorized)
        ));
    }
}
