//! Identifiers for adjudicated decisions and the jobs they refer to.
//!
//! Decision ids are monotonically increasing counters starting at 1;
//! 0 is reserved as the "does not exist" sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! decision_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// The "does not exist" sentinel.
            pub const NONE: Self = Self(0);
            /// The first id handed out by a fresh counter.
            pub const FIRST: Self = Self(1);

            pub fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub fn raw(&self) -> u64 {
                self.0
            }

            pub fn is_none(&self) -> bool {
                self.0 == 0
            }

            /// The id following this one, or `None` on counter overflow.
            pub fn next(self) -> Option<Self> {
                self.0.checked_add(1).map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::FIRST
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

decision_id!(
    /// Identifies a dispute raised over a job.
    DisputeId,
    "dispute"
);
decision_id!(
    /// Identifies a skill-verification application.
    ApplicationId,
    "application"
);
decision_id!(
    /// Identifies a question put to an oracle.
    QuestionId,
    "question"
);

/// Identifies a job on the external job/escrow ledger.
///
/// Job ids are opaque to the engine (the ledger may encode a chain id in them).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_one() {
        assert_eq!(DisputeId::default(), DisputeId::FIRST);
        assert_eq!(DisputeId::FIRST.raw(), 1);
        assert!(DisputeId::NONE.is_none());
        assert_eq!(ApplicationId::FIRST.next(), Some(ApplicationId::new(2)));
    }

    #[test]
    fn counter_overflow_is_reported() {
        assert_eq!(QuestionId::new(u64::MAX).next(), None);
    }

    #[test]
    fn display_names_the_decision_kind() {
        assert_eq!(DisputeId::new(7).to_string(), "dispute#7");
        assert_eq!(QuestionId::new(2).to_string(), "question#2");
    }
}
