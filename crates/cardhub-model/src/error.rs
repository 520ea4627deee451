use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cardnumber must not be empty")]
    EmptyCardNumber,
    #[error("invalid banlist status: {0}")]
    InvalidBanStatus(String),
    #[error("invalid deck section: {0}")]
    InvalidSection(String),
    #[error("invalid loyalty kind: {0}")]
    InvalidLoyaltyKind(String),
    #[error("invalid game: {0}")]
    InvalidGame(String),
    #[error("invalid tournament status: {0}")]
    InvalidTournamentStatus(String),
    #[error("pair ban needs two different cards, got {0} twice")]
    SelfPairBan(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
