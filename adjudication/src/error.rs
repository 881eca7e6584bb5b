use athena_collaborators::CollaboratorError;
use athena_oracle::OracleError;
use athena_types::{ApplicationId, DisputeId, ErrorKind, JobId, QuestionId};
use athena_voting::VotingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdjudicationError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Voting(#[from] VotingError),

    #[error("{collaborator} failed: {source}")]
    Collaborator {
        collaborator: &'static str,
        #[source]
        source: CollaboratorError,
    },

    #[error("{0} not found")]
    DisputeNotFound(DisputeId),

    #[error("{0} not found")]
    ApplicationNotFound(ApplicationId),

    #[error("{0} not found")]
    QuestionNotFound(QuestionId),

    #[error("job {0} not found")]
    JobNotFound(JobId),

    #[error("{caller} is not a party to {subject}")]
    NotParty { subject: String, caller: String },

    #[error("{caller} is not authorized to {action}")]
    Unauthorized { action: &'static str, caller: String },

    #[error("{caller} is not the owner")]
    NotOwner { caller: String },

    #[error("{caller} did not vote on {dispute}")]
    NotAVoter { dispute: DisputeId, caller: String },

    #[error("cannot {action} {decision} while it is {status}")]
    InvalidStatus {
        decision: String,
        status: String,
        action: &'static str,
    },

    #[error("{0} is already resolved")]
    AlreadyResolved(DisputeId),

    #[error("{0} has no result yet")]
    ResultNotDetermined(DisputeId),

    #[error("funds for {0} were already released")]
    FundsAlreadyReleased(DisputeId),

    #[error("job ledger declined to release funds for {0}")]
    ReleaseDeclined(DisputeId),

    #[error("job {job} already has open {dispute}")]
    DisputeAlreadyOpen { job: JobId, dispute: DisputeId },

    #[error("oracle {0} does not meet the dispute-grade bar")]
    OracleNotDisputeGrade(String),

    #[error("oracle {0} is not active")]
    OracleInactive(String),

    #[error("dispute fee too low: need {required}, attached {attached}")]
    FeeTooLow { required: u128, attached: u128 },

    #[error("{recipient} is not a party to {dispute}")]
    InvalidRecipient { dispute: DisputeId, recipient: String },

    #[error("{who} already claimed the {what} for {dispute}")]
    AlreadyClaimed {
        dispute: DisputeId,
        who: String,
        what: &'static str,
    },

    #[error("a transfer is already in progress")]
    Reentrant,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl AdjudicationError {
    pub(crate) fn collaborator(collaborator: &'static str, source: CollaboratorError) -> Self {
        Self::Collaborator {
            collaborator,
            source,
        }
    }

    /// Map to the engine-wide error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Oracle(e) => e.kind(),
            Self::Voting(e) => e.kind(),
            Self::Collaborator { .. } | Self::ReleaseDeclined(_) => ErrorKind::Collaborator,
            Self::DisputeNotFound(_)
            | Self::ApplicationNotFound(_)
            | Self::QuestionNotFound(_)
            | Self::JobNotFound(_) => ErrorKind::NotFound,
            Self::NotParty { .. }
            | Self::Unauthorized { .. }
            | Self::NotOwner { .. }
            | Self::NotAVoter { .. } => ErrorKind::Authorization,
            Self::InvalidStatus { .. }
            | Self::AlreadyResolved(_)
            | Self::ResultNotDetermined(_)
            | Self::FundsAlreadyReleased(_)
            | Self::DisputeAlreadyOpen { .. }
            | Self::OracleNotDisputeGrade(_)
            | Self::OracleInactive(_)
            | Self::AlreadyClaimed { .. }
            | Self::Reentrant => ErrorKind::State,
            Self::FeeTooLow { .. }
            | Self::InvalidRecipient { .. }
            | Self::InvalidAddress(_)
            | Self::Overflow
            | Self::Snapshot(_) => ErrorKind::Validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_errors_keep_their_kind() {
        let err: AdjudicationError = OracleError::OracleNotFound("welding".into()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: AdjudicationError = VotingError::AlreadyVoted {
            decision: "dispute#1".into(),
            voter: "0xa1".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::State);

        let err = AdjudicationError::collaborator(
            "job ledger",
            CollaboratorError::Unavailable("down".into()),
        );
        assert_eq!(err.kind(), ErrorKind::Collaborator);
    }
}
