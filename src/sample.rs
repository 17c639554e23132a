//! Reference trip used by the self-check and tests.
//!
//! Four members, one expense of each kind: an equal split, a split among a
//! subset, a joint treat with two sponsors, and a gift.

use crate::expense::ExpenseRecord;
use crate::member::{roster, MemberId};
use crate::money::Money;
use crate::split::SplitPolicy;

pub fn sample_trip() -> (Vec<MemberId>, Vec<ExpenseRecord>) {
    let members = roster(["Alice", "Bob", "Charlie", "Diana"]);

    let expenses = vec![
        // Hotel booking
        ExpenseRecord::shared(
            Money::from_major(10000),
            "Alice",
            ["Alice", "Bob", "Charlie", "Diana"],
            SplitPolicy::Equal,
        ),
        // Lunch for three
        ExpenseRecord::shared(
            Money::from_major(2000),
            "Bob",
            ["Alice", "Bob", "Charlie"],
            SplitPolicy::Equal,
        ),
        // Joint treat
        ExpenseRecord::shared(
            Money::from_major(2600),
            "Alice",
            ["Alice", "Bob"],
            SplitPolicy::Equal,
        )
        .with_joint_sponsors([
            ("Alice", Money::from_major(1600)),
            ("Bob", Money::from_major(1000)),
        ]),
        ExpenseRecord::gift(Money::from_major(500), "Charlie", ["Diana"]),
    ];

    (members, expenses)
}
