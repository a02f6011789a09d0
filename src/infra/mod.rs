//! Infrastructure - configuration, errors, and metrics
//!
//! This module contains infrastructure concerns:
//! - `config` - Simulation configuration (TOML loading, defaults, validation)
//! - `error` - Typed failure modes of a checkout run
//! - `metrics` - Lock-free metrics collection

pub mod config;
pub mod error;
pub mod metrics;

// Re-export commonly used types
pub use config::Config;
pub use error::CheckoutError;
pub use metrics::Metrics;
