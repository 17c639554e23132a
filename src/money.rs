//! Currency amounts with full decimal precision.
//!
//! Uses `rust_decimal` internally so that shares such as `100 / 3` do not
//! pick up binary floating-point error. Values are never rescaled while
//! accumulating; rounding to cents happens only at output boundaries.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A currency amount.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use trip_ledger::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Number of decimal places used for rounded output.
    pub const CENTS_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// One cent. Balances within this distance of zero count as settled.
    pub const EPSILON: Self = Money(Decimal::from_parts(1, 0, 0, false, 2));

    /// Wraps a raw decimal without changing its scale.
    pub const fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Creates a whole-unit amount.
    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Creates an amount from minor units (cents).
    pub fn from_minor(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::CENTS_SCALE))
    }

    /// The underlying decimal value.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` for amounts strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Rounds to whole cents, half away from zero.
    pub fn round_cents(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(Self::CENTS_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Divides the amount into `parts` equal shares.
    ///
    /// Returns zero when `parts` is zero.
    pub fn split_evenly(&self, parts: usize) -> Self {
        if parts == 0 {
            return Money::ZERO;
        }
        self.portion(Decimal::ONE, Decimal::from(parts as u64))
    }

    /// Computes `self * numerator / denominator`.
    ///
    /// Multiplication happens first to keep the result exact for
    /// percentage and weight shares. When that product does not fit, the
    /// ratio is taken first instead; a result that still does not fit
    /// saturates. A zero denominator yields zero.
    pub fn portion(&self, numerator: Decimal, denominator: Decimal) -> Self {
        if denominator.is_zero() {
            return Money::ZERO;
        }
        self.0
            .checked_mul(numerator)
            .and_then(|scaled| scaled.checked_div(denominator))
            .or_else(|| {
                numerator
                    .checked_div(denominator)
                    .and_then(|ratio| self.0.checked_mul(ratio))
            })
            .map(Money)
            .unwrap_or_else(|| {
                let ratio = numerator.checked_div(denominator).unwrap_or(numerator);
                Money(self.0.saturating_mul(ratio))
            })
    }

    /// Adds `rhs`, returning `None` when the sum does not fit.
    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Returns `true` if the two amounts differ by less than `tolerance`.
    pub fn approx_eq(&self, other: Money, tolerance: Money) -> bool {
        (*self - other).abs() < tolerance
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_cents().0)
    }
}

/// Arithmetic saturates at the bounds of `Decimal` instead of panicking.
impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}
