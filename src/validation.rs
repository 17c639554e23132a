//! Boundary checks for expenses before they are recorded.
//!
//! The balance engine tolerates incomplete data; these rules are what the
//! entry forms enforce. Nothing in the engine calls them.

use crate::error::ValidationError;
use crate::expense::{Allocation, ExpenseRecord, PaymentSource};
use crate::member::MemberId;
use crate::money::Money;
use crate::split::SplitPolicy;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Maximum distance of a percentage total from 100.
pub const PERCENTAGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// An expense that failed validation, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseIssue {
    pub index: usize,
    pub error: ValidationError,
}

/// Checks a single expense against the entry rules.
///
/// Returns the first violation found.
pub fn validate_expense(
    expense: &ExpenseRecord,
    members: &[MemberId],
) -> Result<(), ValidationError> {
    if !expense.amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount(expense.amount));
    }

    match &expense.payment {
        PaymentSource::SinglePayer(payer) => require_member("Payer", payer, members)?,
        PaymentSource::JointSponsors(shares) => validate_sponsors(shares, expense.amount, members)?,
    }

    match &expense.allocation {
        Allocation::Gift { recipients } => {
            if recipients.is_empty() {
                return Err(ValidationError::NoGiftRecipients);
            }
            require_all("Gift recipient", recipients, members)
        }
        Allocation::Shared {
            beneficiaries,
            split,
        } => {
            if beneficiaries.is_empty() {
                return Err(ValidationError::NoBeneficiaries);
            }
            require_all("Beneficiary", beneficiaries, members)?;
            validate_split(split, beneficiaries)
        }
    }
}

/// Validates every expense and collects all failures.
pub fn find_issues(members: &[MemberId], expenses: &[ExpenseRecord]) -> Vec<ExpenseIssue> {
    expenses
        .iter()
        .enumerate()
        .filter_map(|(index, expense)| {
            validate_expense(expense, members)
                .err()
                .map(|error| ExpenseIssue { index, error })
        })
        .collect()
}

fn validate_sponsors(
    shares: &BTreeMap<MemberId, Money>,
    amount: Money,
    members: &[MemberId],
) -> Result<(), ValidationError> {
    for (sponsor, share) in shares {
        require_member("Sponsor", sponsor, members)?;
        if !share.is_positive() {
            return Err(ValidationError::NonPositiveSponsorShare {
                member: sponsor.clone(),
                share: *share,
            });
        }
    }

    let total: Money = shares.values().sum();
    if !total.approx_eq(amount, Money::EPSILON) {
        return Err(ValidationError::SponsorSharesMismatch {
            shares: total,
            amount,
        });
    }
    Ok(())
}

fn validate_split(
    split: &SplitPolicy,
    beneficiaries: &BTreeSet<MemberId>,
) -> Result<(), ValidationError> {
    match split {
        SplitPolicy::Equal => Ok(()),
        SplitPolicy::Percentage(data) => {
            let total: Decimal = beneficiaries
                .iter()
                .map(|b| data.get(b).copied().unwrap_or(Decimal::ZERO))
                .sum();
            if (total - Decimal::ONE_HUNDRED).abs() < PERCENTAGE_TOLERANCE {
                Ok(())
            } else {
                Err(ValidationError::PercentageTotal { total })
            }
        }
        SplitPolicy::Weight(data) => {
            for beneficiary in beneficiaries {
                if let Some(weight) = data.get(beneficiary) {
                    if *weight <= Decimal::ZERO {
                        return Err(ValidationError::NonPositiveWeight {
                            member: beneficiary.clone(),
                            weight: *weight,
                        });
                    }
                }
            }
            Ok(())
        }
    }
}

fn require_member(
    role: &'static str,
    member: &MemberId,
    members: &[MemberId],
) -> Result<(), ValidationError> {
    if members.contains(member) {
        Ok(())
    } else {
        Err(ValidationError::UnknownMember {
            role,
            member: member.clone(),
        })
    }
}

fn require_all(
    role: &'static str,
    group: &BTreeSet<MemberId>,
    members: &[MemberId],
) -> Result<(), ValidationError> {
    group
        .iter()
        .try_for_each(|member| require_member(role, member, members))
}
