use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LadderError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("rung at row {row} gap {gap} is outside the ladder")]
    RungOutOfRange { row: usize, gap: usize },
    #[error("lane {lane} already hosts a rung at row {row}")]
    RungCollision { row: usize, lane: usize },
    #[error("grid shape does not match topology")]
    GridMismatch,
    #[error("round has already started")]
    AlreadyStarted,
    #[error("round has not started")]
    RoundNotStarted,
    #[error("round is in progress")]
    RoundInProgress,
}

impl LadderError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}
