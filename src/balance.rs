//! Per-member balance model and the roster-ordered balance table.
//!
//! Maintains the invariant: `net == paid - owes` once a balance is closed.

use crate::member::MemberId;
use crate::money::Money;
use log::warn;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// A member's position across a batch of expenses.
///
/// # Invariants
///
/// - `paid` and `owes` only ever grow while expenses are applied
/// - `net == paid - owes` after [`Balance::close`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Balance {
    /// Total the member paid out.
    pub paid: Money,

    /// Total the member owes for their shares.
    pub owes: Money,

    /// `paid - owes`. Positive means the member is owed money.
    pub net: Money,
}

impl Balance {
    /// Creates a balance with all totals at zero.
    pub fn new() -> Self {
        Balance::default()
    }

    /// Creates a closed balance from its two totals.
    pub fn from_totals(paid: Money, owes: Money) -> Self {
        Balance {
            paid,
            owes,
            net: paid - owes,
        }
    }

    /// Credits a payment.
    ///
    /// Non-positive amounts are ignored, and so is a payment that would
    /// push `paid` past the largest representable amount.
    pub fn credit(&mut self, amount: Money) -> bool {
        if !amount.is_positive() {
            return false;
        }
        match self.paid.checked_add(amount) {
            Some(paid) => {
                self.paid = paid;
                true
            }
            None => {
                warn!("Payment of {} overflows paid total {}; ignored", amount, self.paid);
                false
            }
        }
    }

    /// Charges an owed share. Same rules as [`Balance::credit`].
    pub fn charge(&mut self, amount: Money) -> bool {
        if !amount.is_positive() {
            return false;
        }
        match self.owes.checked_add(amount) {
            Some(owes) => {
                self.owes = owes;
                true
            }
            None => {
                warn!("Share of {} overflows owed total {}; ignored", amount, self.owes);
                false
            }
        }
    }

    /// Recomputes `net` from the accumulated totals.
    pub fn close(&mut self) {
        self.net = self.paid - self.owes;
    }

    /// Verifies the invariant: `net == paid - owes`.
    #[cfg(debug_assertions)]
    pub fn check_invariant(&self) -> bool {
        self.net == self.paid - self.owes
    }
}

/// Balances keyed by member, iterated in roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    entries: Vec<(MemberId, Balance)>,
    index: HashMap<MemberId, usize>,
}

impl Balances {
    /// Creates zeroed balances for every roster member.
    ///
    /// A member listed twice keeps its first position.
    pub fn from_roster(members: &[MemberId]) -> Self {
        members
            .iter()
            .map(|m| (m.clone(), Balance::new()))
            .collect()
    }

    pub fn get(&self, member: &str) -> Option<&Balance> {
        self.index.get(member).map(|&i| &self.entries[i].1)
    }

    pub(crate) fn get_mut(&mut self, member: &MemberId) -> Option<&mut Balance> {
        match self.index.get(member) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.index.contains_key(member)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &Balance)> {
        self.entries.iter().map(|(m, b)| (m, b))
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberId> {
        self.entries.iter().map(|(m, _)| m)
    }

    pub(crate) fn close_all(&mut self) {
        for (_, balance) in &mut self.entries {
            balance.close();
        }
    }

    pub fn total_paid(&self) -> Money {
        self.entries.iter().map(|(_, b)| b.paid).sum()
    }

    pub fn total_owed(&self) -> Money {
        self.entries.iter().map(|(_, b)| b.owes).sum()
    }

    pub fn net_sum(&self) -> Money {
        self.entries.iter().map(|(_, b)| b.net).sum()
    }
}

impl FromIterator<(MemberId, Balance)> for Balances {
    fn from_iter<I: IntoIterator<Item = (MemberId, Balance)>>(iter: I) -> Self {
        let mut balances = Balances::default();
        for (member, balance) in iter {
            if balances.index.contains_key(&member) {
                continue;
            }
            balances.index.insert(member.clone(), balances.entries.len());
            balances.entries.push((member, balance));
        }
        balances
    }
}

impl Serialize for Balances {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (member, balance) in &self.entries {
            map.serialize_entry(member, balance)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::roster;
    use std::str::FromStr;

    #[test]
    fn test_new_balance_is_zero() {
        let balance = Balance::new();
        assert_eq!(balance.paid, Money::ZERO);
        assert_eq!(balance.owes, Money::ZERO);
        assert_eq!(balance.net, Money::ZERO);
    }

    #[test]
    fn test_credit_and_charge_then_close() {
        let mut balance = Balance::new();
        assert!(balance.credit(Money::from_major(100)));
        assert!(balance.charge(Money::from_major(30)));
        balance.close();

        assert_eq!(balance.net, Money::from_major(70));
        assert!(balance.check_invariant());
    }

    #[test]
    fn test_non_positive_amounts_are_ignored() {
        let mut balance = Balance::new();
        assert!(!balance.credit(Money::ZERO));
        assert!(!balance.credit(Money::from_major(-10)));
        assert!(!balance.charge(Money::from_major(-10)));
        balance.close();

        assert_eq!(balance, Balance::new());
    }

    #[test]
    fn test_overflowing_credit_keeps_prior_total() {
        let huge = Money::from_str("50000000000000000000000000000").unwrap();
        let mut balance = Balance::new();

        assert!(balance.credit(huge));
        assert!(!balance.credit(huge));
        assert!(balance.charge(huge));
        assert!(!balance.charge(huge));
        balance.close();

        assert_eq!(balance.paid, huge);
        assert_eq!(balance.owes, huge);
        assert_eq!(balance.net, Money::ZERO);
    }

    #[test]
    fn test_balances_keep_roster_order_and_skip_duplicates() {
        let balances = Balances::from_roster(&roster(["Carol", "Alice", "Carol", "Bob"]));
        let order: Vec<&str> = balances.members().map(MemberId::as_str).collect();
        assert_eq!(order, vec!["Carol", "Alice", "Bob"]);
        assert_eq!(balances.len(), 3);
    }

    #[test]
    fn test_lookup_unknown_member() {
        let balances = Balances::from_roster(&roster(["Alice"]));
        assert!(balances.get("Alice").is_some());
        assert!(balances.get("Mallory").is_none());
        assert!(!balances.contains(&MemberId::from("Mallory")));
    }

    #[test]
    fn test_totals() {
        let balances: Balances = [
            (MemberId::from("A"), Balance::from_totals(Money::from_major(90), Money::from_major(30))),
            (MemberId::from("B"), Balance::from_totals(Money::ZERO, Money::from_major(60))),
        ]
        .into_iter()
        .collect();

        assert_eq!(balances.total_paid(), Money::from_major(90));
        assert_eq!(balances.total_owed(), Money::from_major(90));
        assert_eq!(balances.net_sum(), Money::ZERO);
    }
}
