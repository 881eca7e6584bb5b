use athena_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotingError {
    #[error("{voter} has already voted on {decision}")]
    AlreadyVoted { decision: String, voter: String },

    #[error("{decision} is not open for voting (status {status})")]
    NotOpen { decision: String, status: String },

    #[error("{voter} has no voting weight for {decision}")]
    Unauthorized { decision: String, voter: String },

    #[error("oracle {0} not found")]
    OracleNotFound(String),

    #[error("arithmetic overflow in vote tally")]
    Overflow,
}

impl VotingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyVoted { .. } | Self::NotOpen { .. } => ErrorKind::State,
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::OracleNotFound(_) => ErrorKind::NotFound,
            Self::Overflow => ErrorKind::Validation,
        }
    }
}
