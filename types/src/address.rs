//! Account identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account identity: a job party, an oracle member, a voter, or one of
/// the governance contracts the engine trusts.
///
/// Addresses are case-insensitive hex strings with a `0x` prefix; they are
/// normalised to lowercase on construction so that equality is stable.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all addresses.
    pub const PREFIX: &'static str = "0x";

    /// Create an address from a raw string, normalising to lowercase.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().to_ascii_lowercase())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed: `0x` followed by at least
    /// one hex digit.
    pub fn is_valid(&self) -> bool {
        self.0
            .strip_prefix(Self::PREFIX)
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_hexdigit()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_case_insensitive() {
        assert_eq!(Address::new("0xABcd"), Address::new("0xabcd"));
    }

    #[test]
    fn validity_requires_prefix_and_hex() {
        assert!(Address::new("0x1f").is_valid());
        assert!(!Address::new("0x").is_valid());
        assert!(!Address::new("1f").is_valid());
        assert!(!Address::new("0xzz").is_valid());
    }
}
