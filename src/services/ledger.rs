//! Transaction ledger - shared log of completed checkouts
//!
//! Every cashier appends here. A single mutex guards the transaction list and
//! the per-cashier counters together, so numbering a transaction, appending it
//! and bumping the cashier's count happen as one step. Only that mutation runs
//! under the lock; service delays and receipt formatting stay outside.
//!
//! Append order follows lock acquisition, not queue order.

use crate::domain::types::{Cashier, CashierId, Customer, Transaction};
use crate::infra::error::CheckoutError;
use parking_lot::Mutex;

struct LedgerState {
    transactions: Vec<Transaction>,
    /// Customers served, indexed by `CashierId::index()`
    served: Vec<u64>,
}

/// Mutex-protected, append-only transaction log
pub struct Ledger {
    state: Mutex<LedgerState>,
}

/// Final ledger contents, read after all cashiers have finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSummary {
    pub transactions: Vec<Transaction>,
    pub cashiers: Vec<Cashier>,
}

impl StoreSummary {
    pub fn total_transactions(&self) -> usize {
        self.transactions.len()
    }

    /// First `n` transactions in ledger order (fewer if fewer exist)
    pub fn sample(&self, n: usize) -> &[Transaction] {
        &self.transactions[..n.min(self.transactions.len())]
    }
}

impl Ledger {
    /// Create an empty ledger with counters for `cashier_count` cashiers
    pub fn new(cashier_count: usize) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                transactions: Vec::new(),
                served: vec![0; cashier_count],
            }),
        }
    }

    pub fn cashier_count(&self) -> usize {
        self.state.lock().served.len()
    }

    /// Record a checkout by `cashier` for `customer`
    ///
    /// Assigns the next transaction number, appends, and increments the
    /// cashier's counter atomically. An unknown cashier leaves the ledger
    /// untouched.
    pub fn record(&self, cashier: CashierId, customer: &Customer) -> Result<Transaction, CheckoutError> {
        // Only the number is assigned under the lock
        let mut entry = Transaction {
            number: 0,
            cashier_id: cashier,
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            item_count: customer.item_count(),
            total_price: customer.total_price,
        };
        let mut recorded = entry.clone();

        let number = {
            let mut state = self.state.lock();
            let counter = state
                .served
                .get_mut(cashier.index())
                .ok_or(CheckoutError::UnknownCashier(cashier))?;
            *counter += 1;

            let number = state.transactions.len() + 1;
            entry.number = number;
            state.transactions.push(entry);
            number
        };

        recorded.number = number;
        Ok(recorded)
    }

    pub fn len(&self) -> usize {
        self.state.lock().transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out the full ledger state
    pub fn snapshot(&self) -> StoreSummary {
        let state = self.state.lock();
        StoreSummary {
            transactions: state.transactions.clone(),
            cashiers: state
                .served
                .iter()
                .enumerate()
                .map(|(i, &customers_served)| Cashier {
                    id: CashierId(i as u32 + 1),
                    customers_served,
                })
                .collect(),
        }
    }
}
