//! Cashier worker - serves customers pulled from the dispatch channel
//!
//! Each worker owns one cashier. It takes one customer at a time, waits out a
//! random service time, prints the receipt and then records the transaction
//! in the shared ledger. Workers run in parallel; a single worker is strictly
//! sequential.

use crate::domain::types::{CashierId, Transaction};
use crate::infra::error::CheckoutError;
use crate::infra::metrics::Metrics;
use crate::io::receipt::{format_receipt, format_serving_line, ReceiptSink};
use crate::services::dispatch::{Dispatch, DispatchReceiver};
use crate::services::ledger::Ledger;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

/// Range of simulated service times
#[derive(Debug, Clone, Copy)]
pub struct ServiceTime {
    pub min_units: u64,
    pub max_units: u64,
    /// Wall-clock length of one unit
    pub unit: Duration,
}

impl ServiceTime {
    /// Draw a service time in units from `min_units..=max_units`
    pub fn sample_units<R: Rng>(&self, rng: &mut R) -> u64 {
        debug_assert!(
            self.min_units <= self.max_units,
            "service time range {}..={} is empty",
            self.min_units,
            self.max_units
        );
        rng.gen_range(self.min_units..=self.max_units)
    }

    pub fn duration(&self, units: u64) -> Duration {
        self.unit.saturating_mul(u32::try_from(units).unwrap_or(u32::MAX))
    }
}

/// Worker that serves customers for one cashier
pub struct CashierWorker {
    id: CashierId,
    /// Shared receiver for dispatched customers
    rx: DispatchReceiver,
    ledger: Arc<Ledger>,
    /// Holds a token for every customer being served
    in_flight: TaskTracker,
    metrics: Arc<Metrics>,
    sink: Arc<dyn ReceiptSink>,
    service_time: ServiceTime,
    rng: StdRng,
}

impl CashierWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CashierId,
        rx: DispatchReceiver,
        ledger: Arc<Ledger>,
        in_flight: TaskTracker,
        metrics: Arc<Metrics>,
        sink: Arc<dyn ReceiptSink>,
        service_time: ServiceTime,
        rng: StdRng,
    ) -> Self {
        Self { id, rx, ledger, in_flight, metrics, sink, service_time, rng }
    }

    pub fn id(&self) -> CashierId {
        self.id
    }

    /// Run the worker until the channel is closed and drained
    ///
    /// Returns the number of customers this worker served.
    pub async fn run(mut self) -> Result<u64, CheckoutError> {
        info!(cashier_id = %self.id, "cashier_started");
        let mut served = 0u64;

        while let Some(dispatch) = self.rx.receive().await {
            // Released when this customer's transaction is recorded
            let _token = self.in_flight.token();
            self.serve(dispatch).await?;
            served += 1;
        }

        info!(cashier_id = %self.id, served = %served, "cashier_stopped");
        Ok(served)
    }

    /// Serve one customer
    async fn serve(&mut self, dispatch: Dispatch) -> Result<Transaction, CheckoutError> {
        let Dispatch { customer, enqueued_at } = dispatch;

        let queue_delay_ms = enqueued_at.elapsed().as_millis() as u64;
        self.metrics.record_queue_delay(queue_delay_ms);

        let units = self.service_time.sample_units(&mut self.rng);
        let service = self.service_time.duration(units);
        self.sink.emit(&format_serving_line(self.id, &customer, units));
        debug!(
            cashier_id = %self.id,
            queue_num = %customer.queue_num,
            queue_delay_ms = %queue_delay_ms,
            service_units = %units,
            "customer_pickup"
        );

        tokio::time::sleep(service).await;

        self.sink.emit(&format_receipt(&customer, self.id));

        let transaction = self.ledger.record(self.id, &customer)?;
        self.metrics.record_served(customer.item_count(), service.as_millis() as u64);

        info!(
            cashier_id = %self.id,
            transaction = %transaction.number,
            queue_num = %customer.queue_num,
            items = %transaction.item_count,
            total = %transaction.total_price,
            "customer_served"
        );
        Ok(transaction)
    }
}
