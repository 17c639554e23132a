//! Split policies for shared expenses.
//!
//! A policy turns an expense amount and a beneficiary set into the amount
//! each beneficiary owes. The defaulting rules for incomplete split data
//! are kept as named constants so they can be exercised on their own.

use crate::member::MemberId;
use crate::money::Money;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Weight used for a beneficiary with no (or a non-positive) weight entry.
///
/// Under a weight split every beneficiary always owes something.
pub const DEFAULT_WEIGHT: Decimal = Decimal::ONE;

/// Percentage used for a beneficiary with no (or a non-positive) entry.
///
/// Such beneficiaries owe nothing, even if the listed percentages then
/// fall short of 100.
pub const UNLISTED_PERCENTAGE: Decimal = Decimal::ZERO;

/// Split type tag as supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    #[default]
    Equal,
    Percentage,
    Weight,
}

/// How a shared expense is divided among its beneficiaries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SplitPolicy {
    /// Every beneficiary owes `amount / count`.
    #[default]
    Equal,

    /// Beneficiary owes `amount * p / 100` for its listed percentage `p`.
    Percentage(BTreeMap<MemberId, Decimal>),

    /// Beneficiary owes `amount * w / total_weight`.
    Weight(BTreeMap<MemberId, Decimal>),
}

impl SplitPolicy {
    /// Builds a policy from a type tag and its (possibly absent) data.
    pub fn from_parts(split_type: SplitType, data: Option<BTreeMap<MemberId, Decimal>>) -> Self {
        let data = data.unwrap_or_default();
        match split_type {
            SplitType::Equal => SplitPolicy::Equal,
            SplitType::Percentage => SplitPolicy::Percentage(data),
            SplitType::Weight => SplitPolicy::Weight(data),
        }
    }

    pub fn percentage<I, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (M, Decimal)>,
        M: Into<MemberId>,
    {
        SplitPolicy::Percentage(entries.into_iter().map(|(m, p)| (m.into(), p)).collect())
    }

    pub fn weight<I, M>(entries: I) -> Self
    where
        I: IntoIterator<Item = (M, Decimal)>,
        M: Into<MemberId>,
    {
        SplitPolicy::Weight(entries.into_iter().map(|(m, w)| (m.into(), w)).collect())
    }

    pub fn split_type(&self) -> SplitType {
        match self {
            SplitPolicy::Equal => SplitType::Equal,
            SplitPolicy::Percentage(_) => SplitType::Percentage,
            SplitPolicy::Weight(_) => SplitType::Weight,
        }
    }

    /// Effective percentage for a member under a percentage split.
    pub fn percentage_of(data: &BTreeMap<MemberId, Decimal>, member: &MemberId) -> Decimal {
        match data.get(member) {
            Some(p) if *p > Decimal::ZERO => *p,
            _ => UNLISTED_PERCENTAGE,
        }
    }

    /// Effective weight for a member under a weight split.
    pub fn weight_of(data: &BTreeMap<MemberId, Decimal>, member: &MemberId) -> Decimal {
        match data.get(member) {
            Some(w) if *w > Decimal::ZERO => *w,
            _ => DEFAULT_WEIGHT,
        }
    }

    /// Computes what each beneficiary owes for `amount`.
    ///
    /// Beneficiaries that owe nothing are left out. Roster membership is
    /// not checked here: an unknown beneficiary still counts towards the
    /// divisor of an equal or weight split.
    pub fn shares<'a>(
        &self,
        amount: Money,
        beneficiaries: &'a BTreeSet<MemberId>,
    ) -> Vec<(&'a MemberId, Money)> {
        if beneficiaries.is_empty() || !amount.is_positive() {
            return Vec::new();
        }

        match self {
            SplitPolicy::Equal => {
                let share = amount.split_evenly(beneficiaries.len());
                beneficiaries.iter().map(|b| (b, share)).collect()
            }
            SplitPolicy::Percentage(data) => beneficiaries
                .iter()
                .filter_map(|b| {
                    let pct = Self::percentage_of(data, b);
                    if pct > Decimal::ZERO {
                        Some((b, amount.portion(pct, Decimal::ONE_HUNDRED)))
                    } else {
                        debug!("No positive percentage for {}; owes nothing", b);
                        None
                    }
                })
                .collect(),
            SplitPolicy::Weight(data) => {
                let total_weight = beneficiaries
                    .iter()
                    .map(|b| Self::weight_of(data, b))
                    .fold(Decimal::ZERO, |total, w| total.saturating_add(w));
                beneficiaries
                    .iter()
                    .map(|b| (b, amount.portion(Self::weight_of(data, b), total_weight)))
                    .collect()
            }
        }
    }
}
