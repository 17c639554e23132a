//! Trip summary and consistency audit.
//!
//! Bundles the balances and settlement plan for one trip and checks the
//! accounting identities that should hold between them.

use crate::accumulator::compute_balances;
use crate::balance::Balances;
use crate::expense::ExpenseRecord;
use crate::member::MemberId;
use crate::money::Money;
use crate::settlement::{compute_settlements, Transfer};
use rust_decimal::Decimal;
use serde::Serialize;

/// Rounding slack allowed per emitted transfer (half a cent).
const HALF_CENT: Money = Money::new(Decimal::from_parts(5, 0, 0, false, 3));

/// Balances and settlement plan for one trip.
#[derive(Debug, Clone, Serialize)]
pub struct TripSummary {
    pub total_expenses: Money,
    pub balances: Balances,
    pub settlements: Vec<Transfer>,
}

impl TripSummary {
    /// Computes balances and the settlement plan from scratch.
    pub fn compute(members: &[MemberId], expenses: &[ExpenseRecord]) -> Self {
        let balances = compute_balances(members, expenses);
        let settlements = compute_settlements(&balances);
        TripSummary {
            total_expenses: expenses.iter().map(|e| e.amount).sum(),
            balances,
            settlements,
        }
    }

    /// Collects the figures needed to cross-check the summary.
    pub fn audit(&self) -> Audit {
        let total_owed = self.balances.total_owed();
        Audit {
            total_expenses: self.total_expenses,
            total_paid: self.balances.total_paid(),
            total_owed,
            net_sum: self.balances.net_sum(),
            unallocated: self.total_expenses - total_owed,
            settlement_total: self.settlements.iter().map(|t| t.amount).sum(),
            outstanding_debt: self
                .balances
                .iter()
                .filter(|(_, b)| b.net < -Money::EPSILON)
                .map(|(_, b)| b.net.abs())
                .sum(),
            transfer_count: self.settlements.len(),
        }
    }
}

/// Accounting figures for a trip summary.
///
/// `outstanding_debt` counts only balances the planner treats as debts.
/// `unallocated` is the part of the spending nobody owes: gifts, expenses
/// without beneficiaries and percentage splits short of 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Audit {
    pub total_expenses: Money,
    pub total_paid: Money,
    pub total_owed: Money,
    pub net_sum: Money,
    pub unallocated: Money,
    pub settlement_total: Money,
    pub outstanding_debt: Money,
    pub transfer_count: usize,
}

impl Audit {
    /// Everything spent was credited to somebody.
    pub fn paid_matches_expenses(&self) -> bool {
        self.total_paid.approx_eq(self.total_expenses, Money::EPSILON)
    }

    /// Net balances sum to zero.
    pub fn is_zero_sum(&self) -> bool {
        self.net_sum.abs() < Money::EPSILON
    }

    /// Net balances sum to exactly the unallocated spending.
    pub fn net_matches_unallocated(&self) -> bool {
        self.net_sum.approx_eq(self.unallocated, Money::EPSILON)
    }

    /// The plan pays off every debt, up to cent rounding per transfer.
    pub fn settlements_cover_debt(&self) -> bool {
        let per_transfer = HALF_CENT.amount() * Decimal::from(self.transfer_count as u64);
        let slack = Money::EPSILON + Money::new(per_transfer);
        self.settlement_total.approx_eq(self.outstanding_debt, slack)
    }

    pub fn is_consistent(&self) -> bool {
        self.paid_matches_expenses() && self.net_matches_unallocated() && self.settlements_cover_debt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::roster;
    use crate::sample::sample_trip;
    use crate::split::SplitPolicy;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_sample_trip_summary() {
        let (members, expenses) = sample_trip();
        let summary = TripSummary::compute(&members, &expenses);

        assert_eq!(summary.total_expenses, Money::from_major(15100));
        let plan: Vec<String> = summary.settlements.iter().map(Transfer::to_string).collect();
        assert_eq!(
            plan,
            vec![
                "Charlie owes Alice 2666.67",
                "Diana owes Alice 2500.00",
                "Bob owes Alice 1466.67",
            ]
        );
    }

    #[test]
    fn test_sample_trip_audit_is_consistent() {
        let (members, expenses) = sample_trip();
        let audit = TripSummary::compute(&members, &expenses).audit();

        assert_eq!(audit.total_paid, Money::from_major(15100));
        assert_eq!(audit.total_owed, Money::from_major(14600));
        assert_eq!(audit.unallocated, Money::from_major(500));
        assert_eq!(audit.settlement_total, money("6633.34"));
        assert!(audit.outstanding_debt.approx_eq(money("6633.3333"), money("0.0001")));
        assert_eq!(audit.transfer_count, 3);

        assert!(audit.paid_matches_expenses());
        assert!(audit.net_matches_unallocated());
        assert!(!audit.is_zero_sum());
        assert!(audit.settlements_cover_debt());
        assert!(audit.is_consistent());
    }

    #[test]
    fn test_fully_allocated_trip_is_zero_sum() {
        let members = roster(["A", "B", "C"]);
        let expenses = vec![
            ExpenseRecord::shared(Money::from_major(100), "A", ["A", "B", "C"], SplitPolicy::Equal),
            ExpenseRecord::shared(
                Money::from_major(45),
                "C",
                ["A", "B"],
                SplitPolicy::weight([("A", Decimal::from(2))]),
            ),
        ];
        let audit = TripSummary::compute(&members, &expenses).audit();

        assert!(audit.is_zero_sum());
        assert!(audit.unallocated.approx_eq(Money::ZERO, Money::EPSILON));
        assert!(audit.is_consistent());
    }

    #[test]
    fn test_over_allocated_percentages_are_flagged() {
        let members = roster(["A", "B"]);
        let expenses = vec![ExpenseRecord::shared(
            Money::from_major(100),
            "A",
            ["A", "B"],
            SplitPolicy::percentage([("A", Decimal::from(70)), ("B", Decimal::from(70))]),
        )];
        let audit = TripSummary::compute(&members, &expenses).audit();

        assert_eq!(audit.unallocated, Money::from_major(-40));
        assert!(audit.net_matches_unallocated());
        assert!(!audit.settlements_cover_debt());
        assert!(!audit.is_consistent());
    }

    #[test]
    fn test_unknown_payer_breaks_paid_check() {
        let members = roster(["A", "B"]);
        let expenses = vec![ExpenseRecord::shared(
            Money::from_major(10),
            "Ghost",
            ["A", "B"],
            SplitPolicy::Equal,
        )];
        let audit = TripSummary::compute(&members, &expenses).audit();
        assert!(!audit.paid_matches_expenses());
    }
}
