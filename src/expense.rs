//! Expense models: the flat input shape and the typed record.

use crate::member::MemberId;
use crate::money::Money;
use crate::split::{SplitPolicy, SplitType};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Raw expense as supplied by persistence, import, or entry forms.
///
/// Optional fields follow the shape those collaborators use. Convert with
/// [`ExpenseInput::into_record`] before handing it to the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseInput {
    /// Default payer, used when no joint sponsor has a positive share.
    pub paid_by: MemberId,

    pub amount: Money,

    #[serde(default)]
    pub beneficiaries: Vec<MemberId>,

    #[serde(default)]
    pub is_gift: bool,

    /// Informational only; never enters the balance math.
    #[serde(default)]
    pub gift_to: Vec<MemberId>,

    #[serde(default)]
    pub joint_sponsor_shares: Option<BTreeMap<MemberId, Money>>,

    /// Defaults to an equal split when absent.
    #[serde(default)]
    pub split_type: Option<SplitType>,

    #[serde(default)]
    pub split_data: Option<BTreeMap<MemberId, Decimal>>,
}

impl ExpenseInput {
    /// Converts the flat input into a typed record.
    ///
    /// Never fails: missing or inconsistent optional data resolves through
    /// the default rules of [`PaymentSource::resolve`] and
    /// [`SplitPolicy::from_parts`].
    pub fn into_record(self) -> ExpenseRecord {
        let payment = PaymentSource::resolve(self.paid_by, self.joint_sponsor_shares);
        let allocation = if self.is_gift {
            Allocation::Gift {
                recipients: self.gift_to.into_iter().collect(),
            }
        } else {
            Allocation::Shared {
                beneficiaries: self.beneficiaries.into_iter().collect(),
                split: SplitPolicy::from_parts(self.split_type.unwrap_or_default(), self.split_data),
            }
        };

        ExpenseRecord {
            amount: self.amount,
            payment,
            allocation,
        }
    }
}

impl From<ExpenseInput> for ExpenseRecord {
    fn from(input: ExpenseInput) -> Self {
        input.into_record()
    }
}

/// Who is credited with having paid for an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentSource {
    /// One member paid the full amount.
    SinglePayer(MemberId),

    /// Several sponsors each paid their listed share.
    JointSponsors(BTreeMap<MemberId, Money>),
}

impl PaymentSource {
    /// Picks joint sponsors when at least one share is positive, otherwise
    /// falls back to the single payer.
    pub fn resolve(paid_by: MemberId, shares: Option<BTreeMap<MemberId, Money>>) -> Self {
        match shares {
            Some(shares) if shares.values().any(Money::is_positive) => {
                PaymentSource::JointSponsors(shares)
            }
            _ => PaymentSource::SinglePayer(paid_by),
        }
    }
}

/// Who bears the cost of an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// Nobody owes anything. Recipients are kept for display.
    Gift { recipients: BTreeSet<MemberId> },

    /// Beneficiaries owe according to the split policy.
    Shared {
        beneficiaries: BTreeSet<MemberId>,
        split: SplitPolicy,
    },
}

/// An immutable spending event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub amount: Money,
    pub payment: PaymentSource,
    pub allocation: Allocation,
}

impl ExpenseRecord {
    pub fn new(amount: Money, payment: PaymentSource, allocation: Allocation) -> Self {
        ExpenseRecord {
            amount,
            payment,
            allocation,
        }
    }

    /// A shared expense paid in full by `paid_by`.
    pub fn shared<I, M>(
        amount: Money,
        paid_by: impl Into<MemberId>,
        beneficiaries: I,
        split: SplitPolicy,
    ) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        ExpenseRecord {
            amount,
            payment: PaymentSource::SinglePayer(paid_by.into()),
            allocation: Allocation::Shared {
                beneficiaries: beneficiaries.into_iter().map(Into::into).collect(),
                split,
            },
        }
    }

    /// A gift paid by `paid_by` for `recipients`.
    pub fn gift<I, M>(amount: Money, paid_by: impl Into<MemberId>, recipients: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        ExpenseRecord {
            amount,
            payment: PaymentSource::SinglePayer(paid_by.into()),
            allocation: Allocation::Gift {
                recipients: recipients.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Replaces a single payer with joint sponsors.
    ///
    /// Has no effect when no share is positive.
    pub fn with_joint_sponsors<I, M>(mut self, shares: I) -> Self
    where
        I: IntoIterator<Item = (M, Money)>,
        M: Into<MemberId>,
    {
        let shares: BTreeMap<MemberId, Money> =
            shares.into_iter().map(|(m, s)| (m.into(), s)).collect();
        if shares.values().any(Money::is_positive) {
            self.payment = PaymentSource::JointSponsors(shares);
        }
        self
    }

    pub fn is_gift(&self) -> bool {
        matches!(self.allocation, Allocation::Gift { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(paid_by: &str, amount: i64) -> ExpenseInput {
        ExpenseInput {
            paid_by: paid_by.into(),
            amount: Money::from_major(amount),
            beneficiaries: vec!["A".into(), "B".into()],
            is_gift: false,
            gift_to: Vec::new(),
            joint_sponsor_shares: None,
            split_type: None,
            split_data: None,
        }
    }

    #[test]
    fn test_missing_split_type_defaults_to_equal() {
        let record = input("A", 100).into_record();
        match record.allocation {
            Allocation::Shared { split, beneficiaries } => {
                assert_eq!(split, SplitPolicy::Equal);
                assert_eq!(beneficiaries.len(), 2);
            }
            _ => panic!("Expected Shared"),
        }
        assert_eq!(record.payment, PaymentSource::SinglePayer("A".into()));
    }

    #[test]
    fn test_joint_shares_without_positive_entry_fall_back_to_payer() {
        let mut raw = input("A", 100);
        raw.joint_sponsor_shares = Some(
            [("A".into(), Money::ZERO), ("B".into(), Money::from_major(-5))]
                .into_iter()
                .collect(),
        );

        let record = raw.into_record();
        assert_eq!(record.payment, PaymentSource::SinglePayer("A".into()));
    }

    #[test]
    fn test_joint_shares_override_payer() {
        let mut raw = input("A", 2600);
        raw.joint_sponsor_shares = Some(
            [
                ("A".into(), Money::from_major(1600)),
                ("B".into(), Money::from_major(1000)),
            ]
            .into_iter()
            .collect(),
        );

        match raw.into_record().payment {
            PaymentSource::JointSponsors(shares) => assert_eq!(shares.len(), 2),
            _ => panic!("Expected JointSponsors"),
        }
    }

    #[test]
    fn test_gift_ignores_beneficiaries_and_split() {
        let mut raw = input("C", 500);
        raw.is_gift = true;
        raw.gift_to = vec!["D".into()];
        raw.split_type = Some(SplitType::Weight);

        let record = raw.into_record();
        assert!(record.is_gift());
        match record.allocation {
            Allocation::Gift { recipients } => {
                assert!(recipients.contains(&MemberId::from("D")));
            }
            _ => panic!("Expected Gift"),
        }
    }

    #[test]
    fn test_duplicate_beneficiaries_collapse() {
        let record = ExpenseRecord::shared(
            Money::from_major(90),
            "A",
            ["A", "B", "B"],
            SplitPolicy::Equal,
        );
        match record.allocation {
            Allocation::Shared { beneficiaries, .. } => assert_eq!(beneficiaries.len(), 2),
            _ => panic!("Expected Shared"),
        }
    }

    #[test]
    fn test_with_joint_sponsors_ignores_all_zero_shares() {
        let record = ExpenseRecord::shared(Money::from_major(10), "A", ["A"], SplitPolicy::Equal)
            .with_joint_sponsors([("B", Money::ZERO)]);
        assert_eq!(record.payment, PaymentSource::SinglePayer("A".into()));
    }
}
