//! Error types for the ruleta casino service
//!
//! Player-facing failures (bad tokens, thin balances, missing permissions) are
//! separated from infrastructure failures so the command layer can answer the
//! former with a chat message and escalate only the latter.

use crate::game::classifier::TokenError;
use crate::platform::PlatformError;

/// Root error type for all ruleta operations
#[derive(Debug, thiserror::Error)]
pub enum RuletaError {
    /// Input the player can correct (bad token, bad stake, bad usage)
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// Command reserved for chat administrators
    #[error("Unauthorized: admins only")]
    Unauthorized,

    /// Request conflicts with the chat's current wheel state
    #[error("State conflict: {0}")]
    StateConflict(StateConflictError),

    /// Chat platform collaborator failures
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Storage system errors
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Input validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("bet token '{token}' is not valid: {reason}")]
    InvalidToken { token: String, reason: TokenError },

    #[error("stake '{0}' is not a positive whole number")]
    InvalidStake(String),

    #[error("amount '{0}' is not a positive whole number")]
    InvalidAmount(String),

    #[error("insufficient balance: have {balance}, need {needed}")]
    InsufficientBalance { balance: u64, needed: u64 },

    #[error("expected usage: {0}")]
    BadUsage(&'static str),

    #[error("no transfer target: reply to a player or pass their id")]
    MissingTarget,

    #[error("bots cannot hold chips")]
    BotRecipient,
}

/// Wheel state conflicts
#[derive(Debug, thiserror::Error)]
pub enum StateConflictError {
    #[error("roulette is already running in this chat")]
    AlreadyArmed,

    #[error("roulette is not running in this chat")]
    NotArmed,
}

/// Storage system errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database open failed: {0}")]
    OpenFailed(String),

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("corrupted record at {key}: {reason}")]
    CorruptedRecord { key: String, reason: String },
}

impl From<ValidationError> for RuletaError {
    fn from(e: ValidationError) -> Self {
        RuletaError::Validation(e)
    }
}

impl From<StateConflictError> for RuletaError {
    fn from(e: StateConflictError) -> Self {
        RuletaError::StateConflict(e)
    }
}

impl RuletaError {
    /// True when the error should be echoed back into the chat rather than
    /// bubbled up as an internal failure.
    pub fn is_player_facing(&self) -> bool {
        !matches!(self, RuletaError::Storage(_))
    }
}

/// Convenience type alias for Results
pub type RuletaResult<T> = Result<T, RuletaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RuletaError::Validation(ValidationError::InsufficientBalance {
            balance: 10,
            needed: 50,
        });

        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("have 10"));
        assert!(err.to_string().contains("need 50"));
    }

    #[test]
    fn test_error_conversion() {
        let err: RuletaError = StateConflictError::AlreadyArmed.into();

        match err {
            RuletaError::StateConflict(StateConflictError::AlreadyArmed) => {}
            _ => panic!("Expected state conflict error"),
        }
    }

    #[test]
    fn test_player_facing_split() {
        let user = RuletaError::Unauthorized;
        let infra = RuletaError::Storage(StoreError::WriteFailed("disk".to_string()));

        assert!(user.is_player_facing());
        assert!(!infra.is_player_facing());
    }
}
