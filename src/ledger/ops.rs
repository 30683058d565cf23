//! Closed operation surface for call routing
//!
//! Callers that deliver calls as data (replay tooling, off-ledger indexers)
//! dispatch through [`Operation`] instead of the typed component handles.
//! Both surfaces run the same code and are observationally identical,
//! including error codes. The serde tags use the ledger's external kebab-case
//! naming so serialized calls and replies read the same as the wire contract.

use serde::{Deserialize, Serialize};

use super::models::{PlayerAchievementStatus, PlayerStats, PrincipalId, SeasonLeaderboard};
use super::GameLedger;
use crate::error::LedgerError;

/// One call against the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum Operation {
    RegisterGame {
        developer: PrincipalId,
    },
    IsGameAuthorized {
        developer: PrincipalId,
    },
    CreateAchievement {
        game: PrincipalId,
        id: u64,
        name: String,
        description: String,
        points: u64,
        kind: u64,
    },
    UnlockAchievement {
        game: PrincipalId,
        player: PrincipalId,
        id: u64,
    },
    GetPlayerAchievementStatus {
        game: PrincipalId,
        player: PrincipalId,
        id: u64,
    },
    LogGameSession {
        game: PrincipalId,
        player: PrincipalId,
        duration: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        season_points: Option<u64>,
    },
    GetPlayerStats {
        game: PrincipalId,
        player: PrincipalId,
    },
    StartNewSeason {
        game: PrincipalId,
        season_id: u64,
        capacity: u64,
    },
    GetSeasonLeaderboard {
        game: PrincipalId,
        season_id: u64,
    },
}

/// Successful result of one [`Operation`].
///
/// Mutations acknowledge with `Done`; reads carry the same optional record
/// shapes the typed handles return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum Reply {
    Done,
    Authorized { authorized: bool },
    AchievementStatus { status: Option<PlayerAchievementStatus> },
    Stats { stats: Option<PlayerStats> },
    Leaderboard { leaderboard: Option<SeasonLeaderboard> },
}

impl GameLedger {
    /// Route one operation through the same authorization gates and state
    /// transitions as the typed handles.
    pub fn apply(&self, caller: &PrincipalId, op: Operation) -> Result<Reply, LedgerError> {
        match op {
            Operation::RegisterGame { developer } => {
                self.registry().register_game(caller, &developer)?;
                Ok(Reply::Done)
            }
            Operation::IsGameAuthorized { developer } => Ok(Reply::Authorized {
                authorized: self.registry().is_game_authorized(&developer)?,
            }),
            Operation::CreateAchievement {
                game,
                id,
                name,
                description,
                points,
                kind,
            } => {
                self.achievements()
                    .create_achievement(caller, &game, id, &name, &description, points, kind)?;
                Ok(Reply::Done)
            }
            Operation::UnlockAchievement { game, player, id } => {
                self.achievements().unlock_achievement(caller, &game, &player, id)?;
                Ok(Reply::Done)
            }
            Operation::GetPlayerAchievementStatus { game, player, id } => {
                Ok(Reply::AchievementStatus {
                    status: self.achievements().player_achievement_status(&game, &player, id)?,
                })
            }
            Operation::LogGameSession {
                game,
                player,
                duration,
                season_points,
            } => {
                self.sessions()
                    .log_session(caller, &game, &player, duration, season_points)?;
                Ok(Reply::Done)
            }
            Operation::GetPlayerStats { game, player } => Ok(Reply::Stats {
                stats: self.sessions().player_stats(&game, &player)?,
            }),
            Operation::StartNewSeason {
                game,
                season_id,
                capacity,
            } => {
                self.seasons().start_season(caller, &game, season_id, capacity)?;
                Ok(Reply::Done)
            }
            Operation::GetSeasonLeaderboard { game, season_id } => Ok(Reply::Leaderboard {
                leaderboard: self.seasons().leaderboard(&game, season_id)?,
            }),
        }
    }
}
