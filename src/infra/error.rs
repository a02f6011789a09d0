//! Typed errors for a checkout run

use crate::domain::types::CashierId;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("dispatch channel is closed")]
    ChannelClosed,

    #[error("unknown cashier {0}")]
    UnknownCashier(CashierId),

    #[error("cashier worker failed: {0}")]
    WorkerFailed(String),

    #[error("drain did not finish within {0:?}")]
    DrainTimeout(Duration),
}
