//! Oracle membership records and the ordered membership list.
//!
//! Removing a member is two separate steps: clearing the member's `is_active`
//! flag (soft delete) and purging the address from the ordered slot list
//! (swap-with-last-and-shrink). Some removal paths do both, some only clear
//! the flag; [`MembershipList::compact`] purges every inactive slot.

use athena_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One identity's membership in one oracle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleMember {
    pub address: Address,
    pub staked_amount: u128,
    pub is_active: bool,
    pub joined_at: Timestamp,
}

/// Ordered membership slots plus the per-address records behind them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MembershipList {
    slots: Vec<Address>,
    records: BTreeMap<Address, OracleMember>,
}

impl MembershipList {
    /// Look up a record, active or not.
    pub fn get(&self, address: &Address) -> Option<&OracleMember> {
        self.records.get(address)
    }

    /// Look up an active member.
    pub fn active(&self, address: &Address) -> Option<&OracleMember> {
        self.records.get(address).filter(|m| m.is_active)
    }

    pub fn is_active_member(&self, address: &Address) -> bool {
        self.active(address).is_some()
    }

    /// Activate a member with the given stake. A previously removed member
    /// whose slot was never purged gets the same slot back.
    pub fn activate(&mut self, address: &Address, stake: u128, now: Timestamp) {
        let had_slot = self.slots.contains(address);
        self.records.insert(
            address.clone(),
            OracleMember {
                address: address.clone(),
                staked_amount: stake,
                is_active: true,
                joined_at: now,
            },
        );
        if !had_slot {
            self.slots.push(address.clone());
        }
    }

    /// Set an active member's stake. Returns the previous stake.
    pub fn set_stake(&mut self, address: &Address, stake: u128) -> Option<u128> {
        let member = self.records.get_mut(address).filter(|m| m.is_active)?;
        let old = member.staked_amount;
        member.staked_amount = stake;
        Some(old)
    }

    /// Clear the active flag, keeping the slot. Returns the stake the member
    /// held, or `None` if the address was not an active member.
    pub fn deactivate(&mut self, address: &Address) -> Option<u128> {
        let member = self.records.get_mut(address).filter(|m| m.is_active)?;
        member.is_active = false;
        Some(member.staked_amount)
    }

    /// Purge an inactive address from the slot list by swapping the last
    /// slot into its place. Active members are never purged.
    pub fn purge(&mut self, address: &Address) -> bool {
        if self.is_active_member(address) {
            return false;
        }
        match self.slots.iter().position(|a| a == address) {
            Some(index) => {
                self.slots.swap_remove(index);
                self.records.remove(address);
                true
            }
            None => false,
        }
    }

    /// Purge every inactive slot. Returns how many slots were purged.
    pub fn compact(&mut self) -> usize {
        let mut purged = 0;
        let mut index = 0;
        while index < self.slots.len() {
            let inactive = !self.is_active_member(&self.slots[index]);
            if inactive {
                let address = self.slots.swap_remove(index);
                self.records.remove(&address);
                purged += 1;
            } else {
                index += 1;
            }
        }
        purged
    }

    /// Active members in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = &OracleMember> {
        self.slots
            .iter()
            .filter_map(|a| self.records.get(a))
            .filter(|m| m.is_active)
    }

    /// Raw slot count, including slots of removed-but-unpurged members.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Address] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::new(format!("0x{:040x}", n))
    }

    fn list_with(n: u8) -> MembershipList {
        let mut list = MembershipList::default();
        for i in 1..=n {
            list.activate(&addr(i), 100, Timestamp::new(0));
        }
        list
    }

    #[test]
    fn deactivate_keeps_slot() {
        let mut list = list_with(3);
        assert_eq!(list.deactivate(&addr(2)), Some(100));
        assert_eq!(list.slot_count(), 3);
        assert!(!list.is_active_member(&addr(2)));
        assert_eq!(list.iter_active().count(), 2);
    }

    #[test]
    fn deactivate_twice_is_noop() {
        let mut list = list_with(1);
        assert!(list.deactivate(&addr(1)).is_some());
        assert!(list.deactivate(&addr(1)).is_none());
    }

    #[test]
    fn purge_swaps_last_into_place() {
        let mut list = list_with(4);
        list.deactivate(&addr(1));
        assert!(list.purge(&addr(1)));
        assert_eq!(list.slots(), &[addr(4), addr(2), addr(3)]);
        assert!(list.get(&addr(1)).is_none());
    }

    #[test]
    fn purge_refuses_active_members() {
        let mut list = list_with(2);
        assert!(!list.purge(&addr(1)));
        assert_eq!(list.slot_count(), 2);
    }

    #[test]
    fn compact_purges_every_inactive_slot() {
        let mut list = list_with(5);
        list.deactivate(&addr(1));
        list.deactivate(&addr(3));
        list.deactivate(&addr(5));
        assert_eq!(list.compact(), 3);
        assert_eq!(list.slot_count(), 2);
        let active: Vec<_> = list.iter_active().map(|m| m.address.clone()).collect();
        assert_eq!(active.len(), 2);
        assert!(active.contains(&addr(2)));
        assert!(active.contains(&addr(4)));
    }

    #[test]
    fn reactivation_reuses_unpurged_slot() {
        let mut list = list_with(2);
        list.deactivate(&addr(1));
        list.activate(&addr(1), 500, Timestamp::new(10));
        assert_eq!(list.slot_count(), 2);
        assert_eq!(list.active(&addr(1)).map(|m| m.staked_amount), Some(500));
    }
}
