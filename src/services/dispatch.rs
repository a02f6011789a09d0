//! Dispatch channel - hands customers from the producer to the cashier pool
//!
//! A single unbounded queue feeds every cashier. The receiving half is shared
//! behind an async mutex, so whichever idle cashier gets the lock takes the
//! next customer. Each customer therefore reaches exactly one cashier, and
//! after `close()` the receivers drain whatever is still queued before
//! reporting end-of-stream.

use crate::domain::types::Customer;
use crate::infra::error::CheckoutError;
use crate::infra::metrics::Metrics;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;
use tracing::debug;

/// A customer in flight between the producer and a cashier
#[derive(Debug)]
pub struct Dispatch {
    pub customer: Arc<Customer>,
    /// When the customer was enqueued (for queue delay measurement)
    pub enqueued_at: Instant,
}

/// Producer half of the dispatch channel
pub struct DispatchChannel {
    tx: Option<mpsc::UnboundedSender<Dispatch>>,
    metrics: Arc<Metrics>,
}

/// Consumer half, cloned once per cashier
#[derive(Clone)]
pub struct DispatchReceiver {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Dispatch>>>,
}

/// Create a dispatch channel
///
/// Returns the producer (for the dispatcher) and a receiver to clone into each
/// cashier worker.
pub fn dispatch_channel(metrics: Arc<Metrics>) -> (DispatchChannel, DispatchReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        DispatchChannel { tx: Some(tx), metrics },
        DispatchReceiver { rx: Arc::new(Mutex::new(rx)) },
    )
}

impl DispatchChannel {
    /// Queue a customer for the next free cashier
    ///
    /// Never blocks: the queue has unbounded slack.
    pub fn send(&self, customer: Arc<Customer>) -> Result<(), CheckoutError> {
        let tx = self.tx.as_ref().ok_or(CheckoutError::ChannelClosed)?;
        let queue_num = customer.queue_num;
        tx.send(Dispatch { customer, enqueued_at: Instant::now() })
            .map_err(|_| CheckoutError::ChannelClosed)?;
        self.metrics.record_dispatched();
        debug!(queue_num = %queue_num, "customer_dispatched");
        Ok(())
    }

    /// Signal that no more customers will be sent
    ///
    /// Receivers still drain everything queued before this call.
    pub fn close(&mut self) {
        if self.tx.take().is_some() {
            debug!("dispatch_closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

impl DispatchReceiver {
    /// Wait for the next customer
    ///
    /// Returns `None` once the channel is closed and fully drained.
    pub async fn receive(&self) -> Option<Dispatch> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Basket, CustomerId};
    use std::collections::HashSet;

    fn customer(id: u32) -> Arc<Customer> {
        Arc::new(Customer::new(CustomerId(id), format!("Customer {}", id), id, Basket::new()))
    }

    #[tokio::test]
    async fn test_close_drains_pending_items() {
        let (mut channel, receiver) = dispatch_channel(Arc::new(Metrics::new()));
        for id in 1..=3 {
            channel.send(customer(id)).unwrap();
        }
        channel.close();

        let mut received = Vec::new();
        while let Some(dispatch) = receiver.receive().await {
            received.push(dispatch.customer.queue_num);
        }
        assert_eq!(received, vec![1, 2, 3]);
        assert!(receiver.receive().await.is_none());
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (mut channel, _receiver) = dispatch_channel(Arc::new(Metrics::new()));
        channel.close();
        assert!(channel.is_closed());
        assert!(matches!(channel.send(customer(1)), Err(CheckoutError::ChannelClosed)));
    }

    #[tokio::test]
    async fn test_send_counts_dispatched() {
        let metrics = Arc::new(Metrics::new());
        let (channel, _receiver) = dispatch_channel(metrics.clone());
        channel.send(customer(1)).unwrap();
        channel.send(customer(2)).unwrap();
        assert_eq!(metrics.customers_dispatched(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_customer_delivered_exactly_once() {
        let (mut channel, receiver) = dispatch_channel(Arc::new(Metrics::new()));

        let mut consumers = Vec::new();
        for _ in 0..4 {
            let rx = receiver.clone();
            consumers.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                while let Some(dispatch) = rx.receive().await {
                    seen.push(dispatch.customer.id);
                    tokio::task::yield_now().await;
                }
                seen
            }));
        }

        for id in 1..=200 {
            channel.send(customer(id)).unwrap();
        }
        channel.close();

        let mut all = Vec::new();
        for consumer in consumers {
            all.extend(consumer.await.unwrap());
        }
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(all.len(), 200);
        assert_eq!(unique.len(), 200);
    }
}
