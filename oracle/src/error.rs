use athena_types::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("skill {0} not found")]
    SkillNotFound(String),

    #[error("oracle {0} not found")]
    OracleNotFound(String),

    #[error("skill {0} is already registered")]
    SkillAlreadyRegistered(String),

    #[error("skill name must not be empty")]
    EmptyName,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("{member} is already an active member of {oracle}")]
    AlreadyMember { oracle: String, member: String },

    #[error("{member} is not an active member of {oracle}")]
    NotMember { oracle: String, member: String },

    #[error("stake below minimum: needed {needed}, provided {provided}")]
    StakeBelowMinimum { needed: u128, provided: u128 },

    #[error("mismatched input lengths: {members} members, {stakes} stakes")]
    LengthMismatch { members: usize, stakes: usize },

    #[error("batch must not be empty")]
    EmptyBatch,

    #[error("{0} appears more than once in the batch")]
    DuplicateInBatch(String),

    #[error("oracle {oracle} still has {members} members")]
    OracleHasMembers { oracle: String, members: u32 },

    #[error("invalid parameter: {0}")]
    InvalidParams(String),

    #[error("arithmetic overflow in stake accounting")]
    Overflow,
}

impl OracleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SkillNotFound(_) | Self::OracleNotFound(_) | Self::NotMember { .. } => {
                ErrorKind::NotFound
            }
            Self::SkillAlreadyRegistered(_)
            | Self::AlreadyMember { .. }
            | Self::OracleHasMembers { .. } => ErrorKind::State,
            Self::EmptyName
            | Self::InvalidAddress(_)
            | Self::StakeBelowMinimum { .. }
            | Self::LengthMismatch { .. }
            | Self::EmptyBatch
            | Self::DuplicateInBatch(_)
            | Self::InvalidParams(_)
            | Self::Overflow => ErrorKind::Validation,
        }
    }
}
