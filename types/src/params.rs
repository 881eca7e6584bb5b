//! Engine parameters: the versioned, governance-tunable configuration record.
//!
//! The record is owned by the oracle registry and changed only through
//! governance-authorized setters. Every entry point copies it by value
//! before doing anything else, so a single operation never observes two
//! different configurations.

use serde::{Deserialize, Serialize};

/// All governance-tunable engine parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Bumped by every setter. Starts at 1.
    #[serde(default = "default_version")]
    pub version: u64,

    // ── Oracles ──────────────────────────────────────────────────────────
    /// Members an oracle needs before it is active (and dispute-grade).
    #[serde(default = "default_min_oracle_members")]
    pub min_oracle_members: u32,

    /// Minimum stake (raw units) an active oracle member must keep bonded.
    #[serde(default = "default_min_stake")]
    pub min_stake: u128,

    // ── Disputes ─────────────────────────────────────────────────────────
    /// Flat fee (raw units) collected from whoever raises a dispute.
    #[serde(default = "default_dispute_fee")]
    pub dispute_fee: u128,

    /// Lower bound on the votes a dispute requires.
    #[serde(default = "default_min_dispute_votes")]
    pub min_dispute_votes: u32,

    /// Share of the oracle's members (basis points) a dispute requires.
    #[serde(default = "default_dispute_quorum_bps")]
    pub dispute_quorum_bps: u32,

    /// Platform fee split off escrow releases (basis points, 500 = 5%).
    #[serde(default = "default_platform_fee_bps")]
    pub platform_fee_bps: u32,

    // ── Voting ───────────────────────────────────────────────────────────
    /// Nominal voting period for every decision. Informational only: the
    /// engine exposes deadlines but does not close votes on its own.
    #[serde(default = "default_voting_period_secs")]
    pub voting_period_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_version() -> u64 {
    1
}

fn default_min_oracle_members() -> u32 {
    20
}

fn default_min_stake() -> u128 {
    100_000
}

fn default_dispute_fee() -> u128 {
    50_000
}

fn default_min_dispute_votes() -> u32 {
    3
}

fn default_dispute_quorum_bps() -> u32 {
    6000
}

fn default_platform_fee_bps() -> u32 {
    500
}

fn default_voting_period_secs() -> u64 {
    3 * 24 * 3600
}

impl EngineParams {
    /// Upper bound for any basis-point parameter.
    pub const MAX_BPS: u32 = 10_000;

    /// Whether every field is inside its admissible range.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_oracle_members == 0 {
            return Err("min_oracle_members must be at least 1".into());
        }
        if self.min_stake == 0 {
            return Err("min_stake must be non-zero".into());
        }
        if self.dispute_quorum_bps > Self::MAX_BPS {
            return Err(format!(
                "dispute_quorum_bps {} exceeds {}",
                self.dispute_quorum_bps,
                Self::MAX_BPS
            ));
        }
        if self.platform_fee_bps > Self::MAX_BPS {
            return Err(format!(
                "platform_fee_bps {} exceeds {}",
                self.platform_fee_bps,
                Self::MAX_BPS
            ));
        }
        Ok(())
    }

    /// Advance the version after a field was changed.
    pub fn bump_version(&mut self) {
        self.version = self.version.saturating_add(1);
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            version: default_version(),
            min_oracle_members: default_min_oracle_members(),
            min_stake: default_min_stake(),
            dispute_fee: default_dispute_fee(),
            min_dispute_votes: default_min_dispute_votes(),
            dispute_quorum_bps: default_dispute_quorum_bps(),
            platform_fee_bps: default_platform_fee_bps(),
            voting_period_secs: default_voting_period_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let params = EngineParams::default();
        assert_eq!(params.version, 1);
        assert_eq!(params.min_oracle_members, 20);
        assert_eq!(params.min_stake, 100_000);
        assert_eq!(params.min_dispute_votes, 3);
        assert_eq!(params.dispute_quorum_bps, 6000);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let params: EngineParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, EngineParams::default());
    }

    #[test]
    fn out_of_range_bps_rejected() {
        let params = EngineParams {
            platform_fee_bps: 10_001,
            ..EngineParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_members_rejected() {
        let params = EngineParams {
            min_oracle_members: 0,
            ..EngineParams::default()
        };
        assert!(params.validate().is_err());
    }
}
