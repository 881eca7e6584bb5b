//! Oracle registry: owns skills, oracles, membership and stake, and the
//! engine parameters.
//!
//! Every mutating operation validates its inputs completely before touching
//! state, so a failed call leaves the registry unchanged. Activation is
//! re-evaluated after every membership or stake change and flips only when
//! the member count crosses `min_oracle_members`.
//!
//! Authorization is not checked here; callers gate access before invoking
//! any mutating method.

use crate::error::OracleError;
use crate::member::OracleMember;
use crate::policy::{ActivationBarPolicy, DisputeGradePolicy};
use crate::skill::{Oracle, OracleDetails, Skill};
use athena_types::{Address, EngineParams, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Events emitted by the registry for the engine to forward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleEvent {
    SkillRegistered {
        name: String,
        required_stake: u128,
    },
    MemberAdded {
        oracle: String,
        member: Address,
        stake: u128,
    },
    MemberRemoved {
        oracle: String,
        member: Address,
        stake: u128,
        /// Whether the membership slot was purged as well.
        purged: bool,
    },
    MemberStakeUpdated {
        oracle: String,
        member: Address,
        old_stake: u128,
        new_stake: u128,
    },
    StakeSlashed {
        oracle: String,
        member: Address,
        slashed: u128,
        remaining: u128,
        forced_out: bool,
    },
    OracleActivated {
        oracle: String,
        member_count: u32,
    },
    OracleDeactivated {
        oracle: String,
        member_count: u32,
    },
    OraclesRemoved {
        names: Vec<String>,
    },
    MembersCompacted {
        oracle: String,
        purged: usize,
    },
    ParamsUpdated {
        version: u64,
        field: String,
    },
}

/// Result of a stake penalty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakePenalty {
    /// Amount actually removed (a penalty larger than the stake is capped).
    pub slashed: u128,
    /// Stake left after the penalty.
    pub remaining: u128,
    /// Whether the member fell below the minimum and was removed.
    pub forced_out: bool,
}

/// The serializable part of the registry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegistryState {
    pub params: EngineParams,
    pub skills: BTreeMap<String, Skill>,
    pub oracles: BTreeMap<String, Oracle>,
}

pub struct OracleRegistry {
    state: RegistryState,
    policy: Box<dyn DisputeGradePolicy>,
    pending_events: Vec<OracleEvent>,
}

impl Default for OracleRegistry {
    fn default() -> Self {
        Self::new(EngineParams::default())
    }
}

impl OracleRegistry {
    pub fn new(params: EngineParams) -> Self {
        Self::from_state(
            RegistryState {
                params,
                ..RegistryState::default()
            },
            Box::new(ActivationBarPolicy),
        )
    }

    /// Rebuild a registry from persisted state.
    pub fn from_state(state: RegistryState, policy: Box<dyn DisputeGradePolicy>) -> Self {
        Self {
            state,
            policy,
            pending_events: Vec::new(),
        }
    }

    /// Swap the dispute-grade policy.
    pub fn set_dispute_grade_policy(&mut self, policy: Box<dyn DisputeGradePolicy>) {
        debug!(policy = policy.name(), "dispute-grade policy replaced");
        self.policy = policy;
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Current parameters, by value.
    pub fn params(&self) -> EngineParams {
        self.state.params.clone()
    }

    pub fn drain_events(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Skills ──────────────────────────────────────────────────────────

    /// Register a skill and create its (inactive) oracle.
    pub fn register_skill(
        &mut self,
        name: &str,
        evidence_ref: &str,
        required_stake: u128,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        let params = self.params();
        let name = name.trim();
        if name.is_empty() {
            return Err(OracleError::EmptyName);
        }
        if self.state.skills.contains_key(name) {
            return Err(OracleError::SkillAlreadyRegistered(name.to_string()));
        }
        if required_stake < params.min_stake {
            return Err(OracleError::StakeBelowMinimum {
                needed: params.min_stake,
                provided: required_stake,
            });
        }

        self.state.skills.insert(
            name.to_string(),
            Skill {
                name: name.to_string(),
                evidence_ref: evidence_ref.to_string(),
                required_stake,
                registered_at: now,
            },
        );
        self.state
            .oracles
            .insert(name.to_string(), Oracle::new(name));

        info!(skill = name, required_stake, "skill registered");
        self.pending_events.push(OracleEvent::SkillRegistered {
            name: name.to_string(),
            required_stake,
        });
        Ok(())
    }

    /// Remove skills whose oracles have no members. Either every name is
    /// removed or none is.
    pub fn remove_oracles(&mut self, names: &[String]) -> Result<(), OracleError> {
        if names.is_empty() {
            return Err(OracleError::EmptyBatch);
        }
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(OracleError::DuplicateInBatch(name.clone()));
            }
            let oracle = self.oracle(name)?;
            if oracle.member_count > 0 {
                return Err(OracleError::OracleHasMembers {
                    oracle: name.clone(),
                    members: oracle.member_count,
                });
            }
        }

        for name in names {
            self.state.oracles.remove(name);
            self.state.skills.remove(name);
        }
        info!(count = names.len(), "oracles removed");
        self.pending_events.push(OracleEvent::OraclesRemoved {
            names: names.to_vec(),
        });
        Ok(())
    }

    // ── Membership ──────────────────────────────────────────────────────

    /// Add one member with the given stake.
    pub fn add_member(
        &mut self,
        oracle: &str,
        member: &Address,
        stake: u128,
        now: Timestamp,
    ) -> Result<(), OracleError> {
        self.add_members(oracle, std::slice::from_ref(member), &[stake], now)
    }

    /// Add several members at once. All entries are validated before any is
    /// applied.
    pub fn add_members(
        &mut self,
        oracle: &str,
        members: &[Address],
        stakes: &[u128],
        now: Timestamp,
    ) -> Result<(), OracleError> {
        if members.len() != stakes.len() {
            return Err(OracleError::LengthMismatch {
                members: members.len(),
                stakes: stakes.len(),
            });
        }
        if members.is_empty() {
            return Err(OracleError::EmptyBatch);
        }
        let floor = self.stake_floor(oracle)?;
        let target = self.oracle(oracle)?;

        let mut seen = HashSet::new();
        let mut added_stake: u128 = 0;
        for (member, stake) in members.iter().zip(stakes) {
            if !member.is_valid() {
                return Err(OracleError::InvalidAddress(member.to_string()));
            }
            if !seen.insert(member) {
                return Err(OracleError::DuplicateInBatch(member.to_string()));
            }
            if target.members.is_active_member(member) {
                return Err(OracleError::AlreadyMember {
                    oracle: oracle.to_string(),
                    member: member.to_string(),
                });
            }
            if *stake < floor {
                return Err(OracleError::StakeBelowMinimum {
                    needed: floor,
                    provided: *stake,
                });
            }
            added_stake = added_stake
                .checked_add(*stake)
                .ok_or(OracleError::Overflow)?;
        }
        let total_staked = target
            .total_staked
            .checked_add(added_stake)
            .ok_or(OracleError::Overflow)?;
        let added = u32::try_from(members.len()).map_err(|_| OracleError::Overflow)?;
        let member_count = target
            .member_count
            .checked_add(added)
            .ok_or(OracleError::Overflow)?;

        let target = self.oracle_mut(oracle)?;
        for (member, stake) in members.iter().zip(stakes) {
            target.members.activate(member, *stake, now);
        }
        target.total_staked = total_staked;
        target.member_count = member_count;

        for (member, stake) in members.iter().zip(stakes) {
            debug!(oracle, %member, stake, "oracle member added");
            self.pending_events.push(OracleEvent::MemberAdded {
                oracle: oracle.to_string(),
                member: member.clone(),
                stake: *stake,
            });
        }
        self.reevaluate(oracle);
        Ok(())
    }

    /// Remove a member: clear the active flag and purge the membership slot.
    pub fn remove_member(&mut self, oracle: &str, member: &Address) -> Result<u128, OracleError> {
        let stake = self.deactivate_member(oracle, member)?;
        let purged = self.oracle_mut(oracle)?.members.purge(member);

        info!(oracle, %member, stake, "oracle member removed");
        self.pending_events.push(OracleEvent::MemberRemoved {
            oracle: oracle.to_string(),
            member: member.clone(),
            stake,
            purged,
        });
        self.reevaluate(oracle);
        Ok(stake)
    }

    /// Replace an active member's stake.
    pub fn update_member_stake(
        &mut self,
        oracle: &str,
        member: &Address,
        new_stake: u128,
    ) -> Result<(), OracleError> {
        let floor = self.stake_floor(oracle)?;
        let target = self.oracle(oracle)?;
        let old_stake = target
            .members
            .active(member)
            .map(|m| m.staked_amount)
            .ok_or_else(|| OracleError::NotMember {
                oracle: oracle.to_string(),
                member: member.to_string(),
            })?;
        if new_stake < floor {
            return Err(OracleError::StakeBelowMinimum {
                needed: floor,
                provided: new_stake,
            });
        }
        let total_staked = target
            .total_staked
            .checked_sub(old_stake)
            .and_then(|t| t.checked_add(new_stake))
            .ok_or(OracleError::Overflow)?;

        let target = self.oracle_mut(oracle)?;
        target.members.set_stake(member, new_stake);
        target.total_staked = total_staked;

        debug!(oracle, %member, old_stake, new_stake, "oracle member stake updated");
        self.pending_events.push(OracleEvent::MemberStakeUpdated {
            oracle: oracle.to_string(),
            member: member.clone(),
            old_stake,
            new_stake,
        });
        self.reevaluate(oracle);
        Ok(())
    }

    /// Slash an active member's stake. A member left below the minimum is
    /// removed (flag cleared, slot kept until compaction).
    pub fn remove_stake(
        &mut self,
        oracle: &str,
        member: &Address,
        penalty: u128,
    ) -> Result<StakePenalty, OracleError> {
        if penalty == 0 {
            return Err(OracleError::InvalidParams("penalty must be non-zero".into()));
        }
        let floor = self.stake_floor(oracle)?;
        let target = self.oracle(oracle)?;
        let stake = target
            .members
            .active(member)
            .map(|m| m.staked_amount)
            .ok_or_else(|| OracleError::NotMember {
                oracle: oracle.to_string(),
                member: member.to_string(),
            })?;

        let slashed = penalty.min(stake);
        let remaining = stake - slashed;
        let forced_out = remaining < floor;

        let target = self.oracle_mut(oracle)?;
        if forced_out {
            target.members.set_stake(member, remaining);
            target.members.deactivate(member);
            target.total_staked = target.total_staked.saturating_sub(stake);
            target.member_count = target.member_count.saturating_sub(1);
        } else {
            target.members.set_stake(member, remaining);
            target.total_staked = target.total_staked.saturating_sub(slashed);
        }

        info!(oracle, %member, slashed, remaining, forced_out, "oracle member stake slashed");
        self.pending_events.push(OracleEvent::StakeSlashed {
            oracle: oracle.to_string(),
            member: member.clone(),
            slashed,
            remaining,
            forced_out,
        });
        self.reevaluate(oracle);
        Ok(StakePenalty {
            slashed,
            remaining,
            forced_out,
        })
    }

    /// Purge the slots of every removed member. Returns the number purged.
    pub fn compact_members(&mut self, oracle: &str) -> Result<usize, OracleError> {
        let purged = self.oracle_mut(oracle)?.members.compact();
        if purged > 0 {
            debug!(oracle, purged, "membership list compacted");
            self.pending_events.push(OracleEvent::MembersCompacted {
                oracle: oracle.to_string(),
                purged,
            });
        }
        Ok(purged)
    }

    // ── Parameters ──────────────────────────────────────────────────────

    /// Change the activation threshold and re-evaluate every oracle.
    pub fn set_min_oracle_members(&mut self, value: u32) -> Result<(), OracleError> {
        self.update_params("min_oracle_members", |p| p.min_oracle_members = value)?;
        let names: Vec<String> = self.state.oracles.keys().cloned().collect();
        for name in names {
            self.reevaluate(&name);
        }
        Ok(())
    }

    /// Raise or lower the global minimum stake. Active members left below
    /// their oracle's new floor are removed the way a slash removes them:
    /// flag cleared, slot kept until compaction.
    pub fn set_min_stake(&mut self, value: u128) -> Result<(), OracleError> {
        self.update_params("min_stake", |p| p.min_stake = value)?;
        let names: Vec<String> = self.state.oracles.keys().cloned().collect();
        for name in names {
            let floor = self.stake_floor(&name)?;
            let short: Vec<(Address, u128)> = self
                .oracle(&name)?
                .members
                .iter_active()
                .filter(|m| m.staked_amount < floor)
                .map(|m| (m.address.clone(), m.staked_amount))
                .collect();
            for (member, stake) in short {
                self.deactivate_member(&name, &member)?;
                info!(oracle = %name, %member, stake, floor, "member below raised minimum stake removed");
                self.pending_events.push(OracleEvent::MemberRemoved {
                    oracle: name.clone(),
                    member,
                    stake,
                    purged: false,
                });
            }
            self.reevaluate(&name);
        }
        Ok(())
    }

    pub fn set_dispute_fee(&mut self, value: u128) -> Result<(), OracleError> {
        self.update_params("dispute_fee", |p| p.dispute_fee = value)
    }

    pub fn set_voting_period(&mut self, secs: u64) -> Result<(), OracleError> {
        self.update_params("voting_period_secs", |p| p.voting_period_secs = secs)
    }

    pub fn set_platform_fee_bps(&mut self, bps: u32) -> Result<(), OracleError> {
        self.update_params("platform_fee_bps", |p| p.platform_fee_bps = bps)
    }

    pub fn set_dispute_quorum(&mut self, min_votes: u32, quorum_bps: u32) -> Result<(), OracleError> {
        self.update_params("dispute_quorum", |p| {
            p.min_dispute_votes = min_votes;
            p.dispute_quorum_bps = quorum_bps;
        })
    }

    fn update_params(
        &mut self,
        field: &str,
        apply: impl FnOnce(&mut EngineParams),
    ) -> Result<(), OracleError> {
        let mut next = self.params();
        apply(&mut next);
        next.validate().map_err(OracleError::InvalidParams)?;
        next.bump_version();
        self.state.params = next;

        info!(field, version = self.state.params.version, "engine parameters updated");
        self.pending_events.push(OracleEvent::ParamsUpdated {
            version: self.state.params.version,
            field: field.to_string(),
        });
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn skill(&self, name: &str) -> Result<&Skill, OracleError> {
        self.state
            .skills
            .get(name)
            .ok_or_else(|| OracleError::SkillNotFound(name.to_string()))
    }

    pub fn oracle(&self, name: &str) -> Result<&Oracle, OracleError> {
        self.state
            .oracles
            .get(name)
            .ok_or_else(|| OracleError::OracleNotFound(name.to_string()))
    }

    pub fn oracle_names(&self) -> Vec<&str> {
        self.state.oracles.keys().map(String::as_str).collect()
    }

    pub fn is_oracle_member(&self, oracle: &str, member: &Address) -> bool {
        self.state
            .oracles
            .get(oracle)
            .is_some_and(|o| o.members.is_active_member(member))
    }

    pub fn is_oracle_active(&self, oracle: &str) -> bool {
        self.state.oracles.get(oracle).is_some_and(|o| o.is_active)
    }

    pub fn member_count(&self, oracle: &str) -> u32 {
        self.state
            .oracles
            .get(oracle)
            .map(|o| o.member_count)
            .unwrap_or(0)
    }

    /// Stake of an active member; 0 for anyone else.
    pub fn member_stake(&self, oracle: &str, member: &Address) -> u128 {
        self.state
            .oracles
            .get(oracle)
            .and_then(|o| o.members.active(member))
            .map(|m| m.staked_amount)
            .unwrap_or(0)
    }

    /// Whether the oracle exists and passes the dispute-grade policy.
    pub fn validate_oracle_for_disputes(&self, oracle: &str) -> bool {
        let params = self.params();
        self.state
            .oracles
            .get(oracle)
            .is_some_and(|o| self.policy.is_dispute_grade(o, &params))
    }

    pub fn active_members(&self, oracle: &str) -> Result<Vec<&OracleMember>, OracleError> {
        Ok(self.oracle(oracle)?.members.iter_active().collect())
    }

    /// Raw membership slot count, including unpurged removed members.
    pub fn membership_slots(&self, oracle: &str) -> Result<usize, OracleError> {
        Ok(self.oracle(oracle)?.members.slot_count())
    }

    pub fn oracle_details(&self, oracle: &str) -> Result<OracleDetails, OracleError> {
        let skill = self.skill(oracle)?;
        let o = self.oracle(oracle)?;
        Ok(OracleDetails {
            name: o.name.clone(),
            evidence_ref: skill.evidence_ref.clone(),
            required_stake: skill.required_stake,
            is_active: o.is_active,
            total_staked: o.total_staked,
            member_count: o.member_count,
            members: o.members.iter_active().map(|m| m.address.clone()).collect(),
        })
    }

    /// Check the stake and activation invariants of every oracle.
    pub fn audit(&self) -> Result<(), String> {
        let min_members = self.state.params.min_oracle_members;
        for oracle in self.state.oracles.values() {
            let active: Vec<_> = oracle.members.iter_active().collect();
            let staked: u128 = active.iter().map(|m| m.staked_amount).sum();
            if staked != oracle.total_staked {
                return Err(format!(
                    "{}: total_staked {} != sum of active stakes {}",
                    oracle.name, oracle.total_staked, staked
                ));
            }
            let floor = self
                .state
                .skills
                .get(&oracle.name)
                .map_or(0, |s| s.required_stake)
                .max(self.state.params.min_stake);
            if let Some(m) = active.iter().find(|m| m.staked_amount < floor) {
                return Err(format!(
                    "{}: active member {} staked {} below floor {}",
                    oracle.name, m.address, m.staked_amount, floor
                ));
            }
            if active.len() != oracle.member_count as usize {
                return Err(format!(
                    "{}: member_count {} != active members {}",
                    oracle.name,
                    oracle.member_count,
                    active.len()
                ));
            }
            if oracle.is_active != (oracle.member_count >= min_members) {
                return Err(format!(
                    "{}: is_active {} with {} members (minimum {})",
                    oracle.name, oracle.is_active, oracle.member_count, min_members
                ));
            }
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn oracle_mut(&mut self, name: &str) -> Result<&mut Oracle, OracleError> {
        self.state
            .oracles
            .get_mut(name)
            .ok_or_else(|| OracleError::OracleNotFound(name.to_string()))
    }

    /// The minimum stake a member of this oracle must hold: the global
    /// minimum or the skill's own requirement, whichever is higher.
    fn stake_floor(&self, oracle: &str) -> Result<u128, OracleError> {
        let skill = self.skill(oracle)?;
        Ok(skill.required_stake.max(self.state.params.min_stake))
    }

    fn deactivate_member(&mut self, oracle: &str, member: &Address) -> Result<u128, OracleError> {
        let target = self.oracle_mut(oracle)?;
        let stake = target
            .members
            .deactivate(member)
            .ok_or_else(|| OracleError::NotMember {
                oracle: oracle.to_string(),
                member: member.to_string(),
            })?;
        target.total_staked = target.total_staked.saturating_sub(stake);
        target.member_count = target.member_count.saturating_sub(1);
        Ok(stake)
    }

    /// Flip `is_active` if the member count crossed the threshold.
    fn reevaluate(&mut self, name: &str) {
        let min_members = self.state.params.min_oracle_members;
        let Some(oracle) = self.state.oracles.get_mut(name) else {
            return;
        };
        let should_be_active = oracle.member_count >= min_members;
        if should_be_active == oracle.is_active {
            return;
        }
        oracle.is_active = should_be_active;
        let member_count = oracle.member_count;
        if should_be_active {
            info!(oracle = name, member_count, "oracle activated");
            self.pending_events.push(OracleEvent::OracleActivated {
                oracle: name.to_string(),
                member_count,
            });
        } else {
            info!(oracle = name, member_count, "oracle deactivated");
            self.pending_events.push(OracleEvent::OracleDeactivated {
                oracle: name.to_string(),
                member_count,
            });
        }
    }
}
