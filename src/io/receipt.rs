//! Receipt formatting and output sinks
//!
//! Cashiers format text outside the ledger lock and hand it to a
//! `ReceiptSink`. Each call carries a complete block, so a sink that writes
//! the block in one go keeps receipts from interleaving mid-block even though
//! the order between cashiers is arbitrary.

use crate::domain::types::{CashierId, Customer, Rupiah};
use parking_lot::Mutex;
use std::fmt::Write as _;
use std::io::{self, Write};
use tracing::warn;

/// Destination for per-customer output
pub trait ReceiptSink: Send + Sync {
    fn emit(&self, text: &str);
}

/// Writes each block to stdout under the stdout lock
pub struct StdoutSink;

impl ReceiptSink for StdoutSink {
    fn emit(&self, text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!(error = %e, "receipt_write_failed");
        }
    }
}

/// Discards everything (quiet runs)
pub struct NullSink;

impl ReceiptSink for NullSink {
    fn emit(&self, _text: &str) {}
}

/// Collects blocks in memory
#[derive(Default)]
pub struct MemorySink {
    blocks: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All blocks emitted so far, in emission order
    pub fn blocks(&self) -> Vec<String> {
        self.blocks.lock().clone()
    }
}

impl ReceiptSink for MemorySink {
    fn emit(&self, text: &str) {
        self.blocks.lock().push(text.to_string());
    }
}

/// Line announcing that a cashier has started on a customer
pub fn format_serving_line(cashier: CashierId, customer: &Customer, service_units: u64) -> String {
    format!(
        "Cashier {} serving customer {} (Queue #{}) with {} products. Processing time: {} seconds\n",
        cashier,
        customer.name,
        customer.queue_num,
        customer.item_count(),
        service_units
    )
}

/// Receipt block for a served customer
pub fn format_receipt(customer: &Customer, cashier: CashierId) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "\n----- RECEIPT -----");
    let _ = writeln!(out, "Cashier: {}", cashier);
    let _ = writeln!(out, "Customer: {} (Queue #{})", customer.name, customer.queue_num);
    let _ = writeln!(out, "Products:");
    for product in &customer.products {
        let _ = writeln!(out, "  - {}: {}", product.name, Rupiah(product.price));
    }
    let _ = writeln!(out, "Total: {}", Rupiah(customer.total_price));
    let _ = writeln!(out, "-----------------\n");
    out
}
