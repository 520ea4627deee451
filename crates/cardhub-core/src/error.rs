//! Errors surfaced by hub operations.

use std::path::PathBuf;

use cardhub_model::{CardNumber, Game, LegalityIssue, ModelError};
use cardhub_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    /// A record is missing, or belongs to another user.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// The change would make the deck illegal.
    #[error("{0}")]
    Legality(LegalityIssue),

    #[error("not enough points: balance is {balance}, reward costs {cost}")]
    InsufficientPoints { balance: i64, cost: u32 },

    #[error("reward is not available: {0}")]
    RewardInactive(String),

    #[error("{0} decks cannot be built here")]
    UnsupportedGame(Game),

    #[error("tournament {0} is already finished")]
    TournamentFinished(i64),

    #[error("only staff members can {0}")]
    Forbidden(&'static str),

    #[error("card {0} is not available")]
    CardUnavailable(CardNumber),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Store(StoreError),
}

impl HubError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<StoreError> for HubError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { entity, key } => Self::NotFound { entity, key },
            other => Self::Store(other),
        }
    }
}

impl From<LegalityIssue> for HubError {
    fn from(issue: LegalityIssue) -> Self {
        Self::Legality(issue)
    }
}

/// Failure to read card data from a [`crate::CardSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read card data {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse card data {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, HubError>;
