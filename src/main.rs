//! Trip Ledger CLI
//!
//! Runs the reference trip through validation, balance accumulation,
//! settlement planning and the consistency audit, and prints the report.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- self-check
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use log::info;
use std::env;
use std::io::{self, Write};
use std::process;
use trip_ledger::sample::sample_trip;
use trip_ledger::{find_issues, Audit, LedgerError, Result, TripSummary};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let command = env::args().nth(1).ok_or(LedgerError::MissingCommand)?;
    match command.as_str() {
        "self-check" => self_check(),
        other => Err(LedgerError::UnknownCommand(other.to_string())),
    }
}

fn self_check() -> Result<()> {
    let (members, expenses) = sample_trip();

    if let Some(issue) = find_issues(&members, &expenses).into_iter().next() {
        return Err(LedgerError::InvalidExpense {
            index: issue.index,
            source: issue.error,
        });
    }

    info!(
        "Checking {} expenses across {} members",
        expenses.len(),
        members.len()
    );
    let summary = TripSummary::compute(&members, &expenses);
    let audit = summary.audit();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &summary, &audit)?;
    out.flush()?;

    if audit.is_consistent() {
        Ok(())
    } else {
        Err(LedgerError::CheckFailed(format!("{:?}", audit)))
    }
}

fn write_report<W: Write>(out: &mut W, summary: &TripSummary, audit: &Audit) -> io::Result<()> {
    writeln!(out, "Member balances:")?;
    for (member, balance) in summary.balances.iter() {
        writeln!(
            out,
            "{}: paid {}, owes {}, net {}",
            member, balance.paid, balance.owes, balance.net
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Settlement plan:")?;
    if summary.settlements.is_empty() {
        writeln!(out, "Everyone is settled up.")?;
    }
    for (n, transfer) in summary.settlements.iter().enumerate() {
        writeln!(out, "{}. {}", n + 1, transfer)?;
    }

    writeln!(out)?;
    writeln!(out, "Checks:")?;
    writeln!(
        out,
        "total paid {} vs total expenses {}: {}",
        audit.total_paid,
        audit.total_expenses,
        status(audit.paid_matches_expenses())
    )?;
    writeln!(
        out,
        "net sum {} vs unallocated {}: {}",
        audit.net_sum,
        audit.unallocated,
        status(audit.net_matches_unallocated())
    )?;
    writeln!(
        out,
        "settlements {} vs outstanding debt {}: {}",
        audit.settlement_total,
        audit.outstanding_debt,
        status(audit.settlements_cover_debt())
    )?;
    Ok(())
}

fn status(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "FAILED"
    }
}
