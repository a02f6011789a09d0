//! Services - checkout logic and shared state
//!
//! This module contains the core business logic services:
//! - `catalog` - Product catalog and customer generation
//! - `dispatch` - Single-producer, multi-consumer customer hand-off
//! - `cashier` - Cashier worker loop and simulated service
//! - `ledger` - Mutex-protected transaction log and per-cashier counters
//! - `checkout` - Store aggregate and the dispatch/drain/summary phases

pub mod cashier;
pub mod catalog;
pub mod checkout;
pub mod dispatch;
pub mod ledger;

// Re-export commonly used types
pub use cashier::{CashierWorker, ServiceTime};
pub use checkout::{Checkout, CheckoutReport, Store};
pub use dispatch::{dispatch_channel, Dispatch, DispatchChannel, DispatchReceiver};
pub use ledger::{Ledger, StoreSummary};
