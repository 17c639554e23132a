//! # Trip Ledger
//!
//! Balance and settlement engine for expenses shared across the members of
//! a trip.
//!
//! ## Design Principles
//!
//! - **Decimal arithmetic**: Amounts use `rust_decimal` at full precision
//! - **Round at the edges**: Only emitted transfers and display are rounded to cents
//! - **Tolerant core**: Unknown members and incomplete split data never fail a computation
//! - **Deterministic output**: Balances follow roster order; settlement ties break by member id
//!
//! ## Example
//!
//! ```
//! use trip_ledger::{compute_balances, compute_settlements, roster, ExpenseRecord, Money, SplitPolicy};
//!
//! let members = roster(["Alice", "Bob"]);
//! let expenses = vec![ExpenseRecord::shared(
//!     Money::from_major(100),
//!     "Alice",
//!     ["Alice", "Bob"],
//!     SplitPolicy::Equal,
//! )];
//!
//! let balances = compute_balances(&members, &expenses);
//! let transfers = compute_settlements(&balances);
//! assert_eq!(transfers[0].to_string(), "Bob owes Alice 50.00");
//! ```

pub mod accumulator;
pub mod balance;
pub mod error;
pub mod expense;
pub mod member;
pub mod money;
pub mod sample;
pub mod settlement;
pub mod split;
pub mod summary;
pub mod validation;

pub use accumulator::{compute_balances, BalanceAccumulator};
pub use balance::{Balance, Balances};
pub use error::{LedgerError, Result, ValidationError};
pub use expense::{Allocation, ExpenseInput, ExpenseRecord, PaymentSource};
pub use member::{roster, MemberId};
pub use money::Money;
pub use settlement::{compute_settlements, Transfer, SETTLEMENT_EPSILON};
pub use split::{SplitPolicy, SplitType, DEFAULT_WEIGHT, UNLISTED_PERCENTAGE};
pub use summary::{Audit, TripSummary};
pub use validation::{find_issues, validate_expense, ExpenseIssue};
