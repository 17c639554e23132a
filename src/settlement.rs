//! Settlement planning.
//!
//! Greedy largest-first matching of debtors against creditors. Produces a
//! short list of transfers that brings every net balance back to zero.

use crate::balance::Balances;
use crate::member::MemberId;
use crate::money::Money;
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Threshold below which a net balance or remaining amount counts as settled.
pub const SETTLEMENT_EPSILON: Money = Money::EPSILON;

/// A directed payment instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,

    /// Rounded to cents.
    pub amount: Money,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} owes {} {}", self.from, self.to, self.amount)
    }
}

/// A creditor or debtor with the amount still to be matched.
struct Position<'a> {
    member: &'a MemberId,
    remaining: Money,
}

/// Largest remaining amount first, ties broken by member id.
fn by_remaining_desc(a: &Position<'_>, b: &Position<'_>) -> Ordering {
    b.remaining
        .cmp(&a.remaining)
        .then_with(|| a.member.cmp(b.member))
}

/// Computes the transfers that settle `balances`.
///
/// Only the emitted amounts are rounded; remaining amounts keep full
/// precision so partial settlements do not accumulate rounding error.
pub fn compute_settlements(balances: &Balances) -> Vec<Transfer> {
    let mut creditors: Vec<Position<'_>> = balances
        .iter()
        .filter(|(_, b)| b.net > SETTLEMENT_EPSILON)
        .map(|(member, b)| Position {
            member,
            remaining: b.net,
        })
        .collect();

    let mut debtors: Vec<Position<'_>> = balances
        .iter()
        .filter(|(_, b)| b.net < -SETTLEMENT_EPSILON)
        .map(|(member, b)| Position {
            member,
            remaining: b.net.abs(),
        })
        .collect();

    creditors.sort_by(by_remaining_desc);
    debtors.sort_by(by_remaining_desc);

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < creditors.len() && j < debtors.len() {
        let creditor = &mut creditors[i];
        let debtor = &mut debtors[j];

        let settle_amount = creditor.remaining.min(debtor.remaining);

        if settle_amount > SETTLEMENT_EPSILON {
            let transfer = Transfer {
                from: debtor.member.clone(),
                to: creditor.member.clone(),
                amount: settle_amount.round_cents(),
            };
            debug!("Settlement {}: {}", transfers.len() + 1, transfer);
            transfers.push(transfer);
        }

        creditor.remaining -= settle_amount;
        debtor.remaining -= settle_amount;

        if creditor.remaining < SETTLEMENT_EPSILON {
            i += 1;
        }
        if debtor.remaining < SETTLEMENT_EPSILON {
            j += 1;
        }
    }

    transfers
}
