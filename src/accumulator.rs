//! Balance accumulation over a batch of expenses.
//!
//! Folds expenses into per-member paid/owes totals. References to members
//! outside the roster are tolerated and contribute nothing.

use crate::balance::Balances;
use crate::expense::{Allocation, ExpenseRecord, PaymentSource};
use crate::member::MemberId;
use crate::money::Money;
use log::debug;

/// Accumulates balances for a fixed roster.
///
/// Expenses may be applied in any order; totals only depend on the set of
/// expenses applied. Call [`BalanceAccumulator::finish`] to obtain closed
/// balances with `net` filled in.
pub struct BalanceAccumulator {
    balances: Balances,

    /// Number of expenses applied so far, used to tag log lines.
    applied: usize,
}

impl BalanceAccumulator {
    /// Creates an accumulator with zeroed balances for every member.
    pub fn new(members: &[MemberId]) -> Self {
        BalanceAccumulator {
            balances: Balances::from_roster(members),
            applied: 0,
        }
    }

    /// Applies a single expense.
    pub fn apply(&mut self, expense: &ExpenseRecord) {
        self.applied += 1;
        let seq = self.applied;

        // Joint sponsor shares stand on their own, whatever the amount.
        self.attribute_paid(expense, seq);

        if !expense.amount.is_positive() {
            debug!(
                "Expense {}: Non-positive amount {}, nothing owed",
                seq, expense.amount
            );
            return;
        }

        self.attribute_owes(expense, seq);
    }

    fn attribute_paid(&mut self, expense: &ExpenseRecord, seq: usize) {
        match &expense.payment {
            PaymentSource::JointSponsors(shares) => {
                for (sponsor, share) in shares {
                    if !share.is_positive() {
                        continue;
                    }
                    self.credit(sponsor, *share, seq);
                }
            }
            PaymentSource::SinglePayer(payer) => {
                if expense.amount.is_positive() {
                    self.credit(payer, expense.amount, seq);
                }
            }
        }
    }

    fn attribute_owes(&mut self, expense: &ExpenseRecord, seq: usize) {
        let (beneficiaries, split) = match &expense.allocation {
            Allocation::Gift { .. } => return,
            Allocation::Shared {
                beneficiaries,
                split,
            } => (beneficiaries, split),
        };

        if beneficiaries.is_empty() {
            debug!("Expense {}: No beneficiaries, nothing owed", seq);
            return;
        }

        for (beneficiary, share) in split.shares(expense.amount, beneficiaries) {
            match self.balances.get_mut(beneficiary) {
                Some(balance) => {
                    balance.charge(share);
                }
                None => debug!(
                    "Expense {}: Beneficiary {} not in roster, ignoring share {}",
                    seq, beneficiary, share
                ),
            }
        }
    }

    fn credit(&mut self, member: &MemberId, amount: Money, seq: usize) {
        match self.balances.get_mut(member) {
            Some(balance) => {
                balance.credit(amount);
            }
            None => debug!(
                "Expense {}: Payer {} not in roster, ignoring {}",
                seq, member, amount
            ),
        }
    }

    /// Closes every balance and returns the table.
    pub fn finish(mut self) -> Balances {
        self.balances.close_all();
        self.balances
    }
}

/// Computes balances for `members` over `expenses` from scratch.
pub fn compute_balances(members: &[MemberId], expenses: &[ExpenseRecord]) -> Balances {
    let mut accumulator = BalanceAccumulator::new(members);
    for expense in expenses {
        accumulator.apply(expense);
    }
    accumulator.finish()
}
