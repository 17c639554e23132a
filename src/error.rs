//! Error types for expense validation and the command-line tool.

use crate::member::MemberId;
use crate::money::Money;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for command-line operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Rule violations found when checking an expense before it is recorded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Amount is zero or negative
    #[error("Amount must be greater than 0, got {0}")]
    NonPositiveAmount(Money),

    /// Payer, sponsor, beneficiary or gift recipient is not on the roster
    #[error("{role} {member} is not a trip member")]
    UnknownMember { role: &'static str, member: MemberId },

    /// Joint sponsor listed with a zero or negative share
    #[error("Sponsor {member} must contribute a positive share, got {share}")]
    NonPositiveSponsorShare { member: MemberId, share: Money },

    /// Joint sponsor shares do not add up to the expense amount
    #[error("Sponsor shares total {shares} but the expense amount is {amount}")]
    SponsorSharesMismatch { shares: Money, amount: Money },

    /// Shared expense without anybody to share it
    #[error("Select at least one beneficiary")]
    NoBeneficiaries,

    /// Gift without a recipient
    #[error("Select at least one gift recipient")]
    NoGiftRecipients,

    /// Percentage split that does not total 100
    #[error("Percentages total {total}% (should equal 100%)")]
    PercentageTotal { total: Decimal },

    /// Weight split entry that is zero or negative
    #[error("Weight for {member} must be positive, got {weight}")]
    NonPositiveWeight { member: MemberId, weight: Decimal },
}

/// Errors that can occur while running the command-line tool.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to write the report
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Expense rejected by validation
    #[error("Invalid expense #{index}: {source}")]
    InvalidExpense {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// One or more audit checks failed
    #[error("Self-check failed: {0}")]
    CheckFailed(String),

    /// Missing command argument
    #[error("Missing command. Usage: trip-ledger self-check")]
    MissingCommand,

    /// Unrecognised command argument
    #[error("Unknown command '{0}'. Usage: trip-ledger self-check")]
    UnknownCommand(String),
}
