//! End-of-run summary

use crate::services::ledger::StoreSummary;
use std::fmt::Write as _;

pub const STARTUP_BANNER: &str = "Store Payment Simulation Starting...";
pub const COMPLETION_BANNER: &str = "Store Payment Simulation Completed!";

/// Render the transaction summary block, including the completion banner
pub fn format_summary(summary: &StoreSummary, sample_size: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "\n----- TRANSACTION SUMMARY -----");
    let _ = writeln!(out, "Total transactions: {}", summary.total_transactions());

    for cashier in &summary.cashiers {
        let _ = writeln!(out, "Cashier {} processed {} customers", cashier.id, cashier.customers_served);
    }

    let _ = writeln!(out, "\nSample of Transactions:");
    for transaction in summary.sample(sample_size) {
        let _ = writeln!(out, "{}", transaction);
    }

    let _ = writeln!(out, "\n{}", COMPLETION_BANNER);
    out
}
