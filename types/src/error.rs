//! Error classification shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The error taxonomy every engine error maps onto.
///
/// Each crate keeps its own error enum; `kind()` on those enums reports one
/// of these so callers can react without matching every variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unknown skill, oracle, dispute, application or question.
    NotFound,
    /// Caller is not a party, not an oracle member, or not governance-eligible.
    Authorization,
    /// Operation is invalid for the current status (includes double voting
    /// and double claiming).
    State,
    /// Fee or stake below minimum, malformed or mismatched inputs.
    Validation,
    /// A mandatory collaborator (escrow ledger, fee token) failed.
    Collaborator,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Authorization => "authorization",
            Self::State => "state",
            Self::Validation => "validation",
            Self::Collaborator => "collaborator",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
