//! Error taxonomy for ledger operations
//!
//! Every failure aborts the whole operation with no partial state change.
//! Absence on a read is not an error - reads return `Ok(None)`.

use thiserror::Error;

/// Operational errors surfaced to callers.
///
/// The first six variants form the stable error contract and carry fixed
/// numeric codes (see [`LedgerError::code`]). `Storage` wraps infrastructure
/// failures from the underlying database and has no stable code.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Caller is not the configured contract owner
    #[error("owner-only: caller is not the contract owner")]
    OwnerOnly,

    /// Caller is not the registered, authorized developer for this game
    #[error("not-authorized: caller is not the game's registered developer")]
    NotAuthorized,

    /// No achievement definition exists for the given id
    #[error("achievement-not-found: no definition for achievement {id}")]
    AchievementNotFound { id: u64 },

    /// An achievement definition with this id already exists
    #[error("achievement-exists: achievement {id} is already defined")]
    AchievementExists { id: u64 },

    /// Adding to a counter would exceed the representable maximum
    #[error("counter-overflow: {counter} would exceed the representable maximum")]
    CounterOverflow { counter: &'static str },

    /// A text field is not ASCII or exceeds its length bound
    #[error("invalid-text: {field} must be ASCII and at most {max} characters")]
    InvalidText { field: &'static str, max: usize },

    /// Underlying database failure
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    /// Stable numeric code for the operational error contract.
    ///
    /// Storage failures are infrastructure errors and carry no code.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::OwnerOnly => Some(100),
            Self::NotAuthorized => Some(101),
            Self::AchievementNotFound { .. } => Some(102),
            Self::AchievementExists { .. } => Some(103),
            Self::CounterOverflow { .. } => Some(104),
            Self::InvalidText { .. } => Some(105),
            Self::Storage(_) => None,
        }
    }
}
