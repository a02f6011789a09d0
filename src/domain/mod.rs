//! Domain models - core store checkout types
//!
//! This module contains the canonical data types used throughout the system:
//! - `Product` - immutable catalog entry (name + price)
//! - `Customer` - shopper with a queue position and a pre-priced basket
//! - `Cashier` - cashier identity plus served-customer count
//! - `Transaction` - one completed checkout as recorded in the ledger

pub mod types;

// Re-export commonly used types at module level
pub use types::{Basket, Cashier, CashierId, Customer, CustomerId, Product, Rupiah, Transaction};
