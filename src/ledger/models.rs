//! Data models for the progression ledger
//!
//! These structures represent the rows stored in and read back from the
//! ledger database. All counters are non-negative and only ever grow;
//! additions past the representable maximum are rejected, never wrapped.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Maximum length of an achievement name
pub const MAX_NAME_LEN: usize = 64;

/// Maximum length of an achievement description
pub const MAX_DESCRIPTION_LEN: usize = 256;

/// Largest value any stored counter may reach (counters live in SQLite
/// INTEGER columns, which are signed 64-bit)
pub const COUNTER_MAX: u64 = i64::MAX as u64;

/// Opaque principal identity, compared by equality only.
///
/// Players, developers, and the contract owner are all principals. A game is
/// keyed by its developer's principal, so `PrincipalId` doubles as the game
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A registered game and its authorization flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// Developer principal the game is keyed by
    pub developer: PrincipalId,
    /// Whether the developer may currently mutate the game's state
    pub authorized: bool,
    /// Season that session point credits currently flow into
    pub current_season: Option<u64>,
    /// Registration time (ms since epoch)
    pub registered_at: i64,
}

/// An achievement definition, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDef {
    pub achievement_id: u64,
    pub name: String,
    pub description: String,
    /// Points credited to a player's lifetime stats on unlock
    pub points: u64,
    /// Opaque category/threshold tag, not interpreted by the ledger
    pub kind: u64,
    /// Creation time (ms since epoch)
    pub created_at: i64,
}

/// A player's unlock record for one achievement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAchievementStatus {
    pub unlocked: bool,
    /// Unlock time (ms since epoch)
    pub unlocked_at: i64,
}

/// Lifetime statistics for one player in one game.
///
/// All three counters are monotonically non-decreasing. The row is created
/// lazily with zero defaults on the first session log or achievement unlock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Accumulated session time in seconds
    pub total_playtime: u64,
    /// Number of sessions logged
    pub sessions: u64,
    /// Points from unlocked achievements
    pub achievement_points: u64,
}

/// A competitive season with a bounded leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub season_id: u64,
    /// Maximum ranked entries retained/returned for this season
    pub capacity: u64,
    /// Start (or most recent restart) time, ms since epoch
    pub started_at: i64,
}

/// One ranked leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: PrincipalId,
    /// Season-scoped points, distinct from lifetime achievement points
    pub points: u64,
}

/// Ranked view of a season, sorted by points descending.
///
/// Ties are broken by earliest entry creation, so the ordering is
/// deterministic and reproducible across reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonLeaderboard {
    pub season_id: u64,
    pub capacity: u64,
    pub top_players: Vec<LeaderboardEntry>,
}

/// Validate a bounded ASCII text field.
pub(crate) fn validate_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), LedgerError> {
    if value.len() > max || !value.is_ascii() {
        return Err(LedgerError::InvalidText { field, max });
    }
    Ok(())
}

/// Add `delta` to a counter, rejecting anything past [`COUNTER_MAX`].
pub(crate) fn credit_counter(
    current: u64,
    delta: u64,
    counter: &'static str,
) -> Result<u64, LedgerError> {
    match current.checked_add(delta) {
        Some(next) if next <= COUNTER_MAX => Ok(next),
        _ => Err(LedgerError::CounterOverflow { counter }),
    }
}

/// Reject raw numeric arguments the INTEGER columns cannot hold.
pub(crate) fn ensure_representable(value: u64, counter: &'static str) -> Result<(), LedgerError> {
    if value > COUNTER_MAX {
        return Err(LedgerError::CounterOverflow { counter });
    }
    Ok(())
}
