//! Checkout orchestration - dispatch, drain and summary phases
//!
//! A run moves through three strictly ordered phases:
//! 1. Dispatch: every customer is pushed into the channel, then it is closed.
//! 2. Drain: wait until every cashier has left its receive loop (worker join
//!    set) and every in-flight checkout has been recorded (task tracker).
//! 3. Summary: snapshot the ledger. Nothing mutates it any more.

use crate::domain::types::{CashierId, Customer, Product};
use crate::infra::config::Config;
use crate::infra::error::CheckoutError;
use crate::infra::metrics::{Metrics, MetricsSummary};
use crate::io::receipt::ReceiptSink;
use crate::services::cashier::{CashierWorker, ServiceTime};
use crate::services::catalog::{generate_catalog, generate_customers, seeded_rng};
use crate::services::dispatch::{dispatch_channel, DispatchChannel};
use crate::services::ledger::{Ledger, StoreSummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::task::TaskTracker;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Aggregate root: catalog, customers and the ledger
///
/// Fully populated before any cashier starts. The catalog and customers are
/// read-only from then on; only the ledger is mutated.
pub struct Store {
    products: Vec<Product>,
    customers: Vec<Arc<Customer>>,
    ledger: Arc<Ledger>,
}

impl Store {
    /// Generate the catalog and customer list described by `config`
    pub fn initialize(config: &Config) -> Result<Self, CheckoutError> {
        let products = generate_catalog(config);
        let mut rng = seeded_rng(config.seed(), 0);
        let customers = generate_customers(
            config.customer_count(),
            &products,
            config.min_basket_size()..=config.max_basket_size(),
            &mut rng,
        )?;
        Ok(Self::from_parts(products, customers, config.cashier_count()))
    }

    /// Assemble a store from pre-built parts
    pub fn from_parts(products: Vec<Product>, customers: Vec<Customer>, cashier_count: usize) -> Self {
        Self {
            products,
            customers: customers.into_iter().map(Arc::new).collect(),
            ledger: Arc::new(Ledger::new(cashier_count)),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn customers(&self) -> &[Arc<Customer>] {
        &self.customers
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }
}

/// Result of a completed run
#[derive(Debug)]
pub struct CheckoutReport {
    pub summary: StoreSummary,
    pub metrics: MetricsSummary,
    /// Time from first dispatch to end of drain
    pub elapsed: Duration,
}

/// One simulation run over a populated store
pub struct Checkout {
    config: Config,
    store: Store,
    metrics: Arc<Metrics>,
    sink: Arc<dyn ReceiptSink>,
    run_id: Uuid,
}

impl Checkout {
    /// Validate `config` and build a freshly generated store
    pub fn new(config: Config, sink: Arc<dyn ReceiptSink>) -> Result<Self, CheckoutError> {
        config.validate()?;
        let store = Store::initialize(&config)?;
        Self::with_store(config, store, sink)
    }

    /// Run against an existing store
    pub fn with_store(
        config: Config,
        store: Store,
        sink: Arc<dyn ReceiptSink>,
    ) -> Result<Self, CheckoutError> {
        config.validate()?;
        if store.ledger.cashier_count() != config.cashier_count() {
            return Err(CheckoutError::InvalidConfig(format!(
                "store has {} cashier counters but config asks for {}",
                store.ledger.cashier_count(),
                config.cashier_count()
            )));
        }
        Ok(Self { config, store, metrics: Arc::new(Metrics::new()), sink, run_id: Uuid::now_v7() })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Run all phases to completion
    pub async fn run(self) -> Result<CheckoutReport, CheckoutError> {
        let span = tracing::info_span!("checkout", run_id = %self.run_id);
        self.run_phases().instrument(span).await
    }

    async fn run_phases(self) -> Result<CheckoutReport, CheckoutError> {
        info!(
            customers = %self.store.customers.len(),
            cashiers = %self.config.cashier_count(),
            products = %self.store.products.len(),
            "checkout_started"
        );

        let started = Instant::now();
        let in_flight = TaskTracker::new();
        let (mut channel, receiver) = dispatch_channel(self.metrics.clone());

        let service_time = ServiceTime {
            min_units: self.config.min_service_units(),
            max_units: self.config.max_service_units(),
            unit: self.config.service_unit(),
        };

        let mut workers = JoinSet::new();
        for i in 0..self.config.cashier_count() {
            let id = CashierId(i as u32 + 1);
            let worker = CashierWorker::new(
                id,
                receiver.clone(),
                self.store.ledger.clone(),
                in_flight.clone(),
                self.metrics.clone(),
                self.sink.clone(),
                service_time,
                seeded_rng(self.config.seed(), u64::from(id.0)),
            );
            workers.spawn(worker.run().in_current_span());
        }
        // Workers hold the only receivers from here on
        drop(receiver);

        let dispatched = self.dispatch_all(&channel);
        channel.close();

        self.drain(&mut workers, &in_flight).await?;
        dispatched?;

        let elapsed = started.elapsed();
        let summary = self.store.ledger.snapshot();
        let metrics = self.metrics.report();
        metrics.log();
        info!(
            transactions = %summary.total_transactions(),
            elapsed_ms = %elapsed.as_millis(),
            "drain_complete"
        );

        Ok(CheckoutReport { summary, metrics, elapsed })
    }

    /// Dispatch phase: push every customer in queue order
    fn dispatch_all(&self, channel: &DispatchChannel) -> Result<(), CheckoutError> {
        for customer in &self.store.customers {
            if let Err(e) = channel.send(customer.clone()) {
                warn!(queue_num = %customer.queue_num, error = %e, "dispatch_failed");
                return Err(e);
            }
        }
        info!(dispatched = %self.metrics.customers_dispatched(), "dispatch_complete");
        Ok(())
    }

    /// Drain phase: join every worker, then wait for in-flight checkouts
    async fn drain(
        &self,
        workers: &mut JoinSet<Result<u64, CheckoutError>>,
        in_flight: &TaskTracker,
    ) -> Result<(), CheckoutError> {
        let wait = async {
            while let Some(joined) = workers.join_next().await {
                match joined {
                    Ok(Ok(_served)) => {}
                    Ok(Err(e)) => return Err(e),
                    Err(e) => return Err(CheckoutError::WorkerFailed(e.to_string())),
                }
            }
            in_flight.close();
            in_flight.wait().await;
            Ok(())
        };

        match self.config.drain_timeout() {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| CheckoutError::DrainTimeout(limit))?,
            None => wait.await,
        }
    }
}
