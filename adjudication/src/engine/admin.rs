//! Registry administration, parameter setters and authority wiring.

use super::AthenaEngine;
use crate::authority::Capability;
use crate::events::AthenaEvent;
use crate::AdjudicationError;
use athena_oracle::{DisputeGradePolicy, StakePenalty};
use athena_types::Address;
use tracing::{info, warn};

impl AthenaEngine {
    // ── Skills and oracles ──────────────────────────────────────────────

    pub fn register_skill(
        &mut self,
        caller: &Address,
        name: &str,
        evidence_ref: &str,
        required_stake: u128,
    ) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        let now = self.now();
        self.registry
            .register_skill(name, evidence_ref, required_stake, now)?;
        self.forward_registry_events();
        Ok(())
    }

    pub fn remove_oracles(
        &mut self,
        caller: &Address,
        names: &[String],
    ) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        self.registry.remove_oracles(names)?;
        self.forward_registry_events();
        Ok(())
    }

    pub fn add_oracle_member(
        &mut self,
        caller: &Address,
        oracle: &str,
        member: &Address,
        stake: u128,
    ) -> Result<(), AdjudicationError> {
        self.add_oracle_members(caller, oracle, std::slice::from_ref(member), &[stake])
    }

    pub fn add_oracle_members(
        &mut self,
        caller: &Address,
        oracle: &str,
        members: &[Address],
        stakes: &[u128],
    ) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        let now = self.now();
        self.registry.add_members(oracle, members, stakes, now)?;
        self.forward_registry_events();
        Ok(())
    }

    /// Remove a member and purge its slot. Returns the stake it held.
    pub fn remove_oracle_member(
        &mut self,
        caller: &Address,
        oracle: &str,
        member: &Address,
    ) -> Result<u128, AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        let stake = self.registry.remove_member(oracle, member)?;
        self.forward_registry_events();
        Ok(stake)
    }

    pub fn update_member_stake(
        &mut self,
        caller: &Address,
        oracle: &str,
        member: &Address,
        new_stake: u128,
    ) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        self.registry.update_member_stake(oracle, member, new_stake)?;
        self.forward_registry_events();
        Ok(())
    }

    pub fn remove_stake(
        &mut self,
        caller: &Address,
        oracle: &str,
        member: &Address,
        penalty: u128,
    ) -> Result<StakePenalty, AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        let outcome = self.registry.remove_stake(oracle, member, penalty)?;
        self.forward_registry_events();
        Ok(outcome)
    }

    /// Slash a member reported as malicious. Open to anyone who may resolve
    /// disputes.
    pub fn report_malicious_member(
        &mut self,
        caller: &Address,
        oracle: &str,
        member: &Address,
        penalty: u128,
    ) -> Result<StakePenalty, AdjudicationError> {
        self.require(Capability::Resolve, caller)?;
        let outcome = self.registry.remove_stake(oracle, member, penalty)?;
        self.forward_registry_events();

        warn!(oracle, %member, reporter = %caller, slashed = outcome.slashed, "malicious oracle member reported");
        self.pending_events.push(AthenaEvent::MaliciousMemberReported {
            oracle: oracle.to_string(),
            member: member.clone(),
            reporter: caller.clone(),
            slashed: outcome.slashed,
            forced_out: outcome.forced_out,
        });
        Ok(outcome)
    }

    pub fn compact_members(
        &mut self,
        caller: &Address,
        oracle: &str,
    ) -> Result<usize, AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        let purged = self.registry.compact_members(oracle)?;
        self.forward_registry_events();
        Ok(purged)
    }

    // ── Parameters ──────────────────────────────────────────────────────

    pub fn set_min_oracle_members(
        &mut self,
        caller: &Address,
        value: u32,
    ) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        self.registry.set_min_oracle_members(value)?;
        self.forward_registry_events();
        Ok(())
    }

    pub fn set_min_stake(&mut self, caller: &Address, value: u128) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        self.registry.set_min_stake(value)?;
        self.forward_registry_events();
        Ok(())
    }

    pub fn set_dispute_fee(&mut self, caller: &Address, value: u128) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        self.registry.set_dispute_fee(value)?;
        self.forward_registry_events();
        Ok(())
    }

    pub fn set_voting_period(&mut self, caller: &Address, secs: u64) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        self.registry.set_voting_period(secs)?;
        self.forward_registry_events();
        Ok(())
    }

    pub fn set_platform_fee_bps(
        &mut self,
        caller: &Address,
        bps: u32,
    ) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        self.registry.set_platform_fee_bps(bps)?;
        self.forward_registry_events();
        Ok(())
    }

    pub fn set_dispute_quorum(
        &mut self,
        caller: &Address,
        min_votes: u32,
        quorum_bps: u32,
    ) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        self.registry.set_dispute_quorum(min_votes, quorum_bps)?;
        self.forward_registry_events();
        Ok(())
    }

    /// Replace the check behind `validate_oracle_for_disputes`.
    pub fn set_dispute_grade_policy(
        &mut self,
        caller: &Address,
        policy: Box<dyn DisputeGradePolicy>,
    ) -> Result<(), AdjudicationError> {
        self.require(Capability::Administer, caller)?;
        self.registry.set_dispute_grade_policy(policy);
        Ok(())
    }

    // ── Authority (owner only) ──────────────────────────────────────────

    pub fn set_governance_contract(
        &mut self,
        caller: &Address,
        contract: Option<Address>,
    ) -> Result<(), AdjudicationError> {
        self.require_owner(caller)?;
        validate_optional(&contract)?;
        self.authority.governance_contract = contract.clone();
        self.authority_changed("governance-contract", contract);
        Ok(())
    }

    pub fn set_legacy_dao(
        &mut self,
        caller: &Address,
        dao: Option<Address>,
    ) -> Result<(), AdjudicationError> {
        self.require_owner(caller)?;
        validate_optional(&dao)?;
        self.authority.legacy_dao = dao.clone();
        self.authority_changed("legacy-dao", dao);
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: &Address,
    ) -> Result<(), AdjudicationError> {
        self.require_owner(caller)?;
        if !new_owner.is_valid() {
            return Err(AdjudicationError::InvalidAddress(new_owner.to_string()));
        }
        self.authority.owner = new_owner.clone();
        self.authority_changed("owner", Some(new_owner.clone()));
        Ok(())
    }

    fn authority_changed(&mut self, role: &str, address: Option<Address>) {
        info!(role, address = ?address, "authority changed");
        self.pending_events.push(AthenaEvent::AuthorityChanged {
            role: role.to_string(),
            address,
        });
    }
}

fn validate_optional(address: &Option<Address>) -> Result<(), AdjudicationError> {
    match address {
        Some(a) if !a.is_valid() => Err(AdjudicationError::InvalidAddress(a.to_string())),
        _ => Ok(()),
    }
}
