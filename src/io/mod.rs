//! IO modules - console output
//!
//! This module contains everything the simulation prints:
//! - `receipt` - Receipt and "serving" line formatting plus output sinks
//! - `summary` - End-of-run transaction summary and banners

pub mod receipt;
pub mod summary;

// Re-export commonly used types
pub use receipt::{format_receipt, format_serving_line, MemorySink, NullSink, ReceiptSink, StdoutSink};
pub use summary::{format_summary, COMPLETION_BANNER, STARTUP_BANNER};
