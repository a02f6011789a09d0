//! Lock-free metrics collection and end-of-run reporting
//!
//! Uses atomics for hot-path operations so cashiers never contend on a lock
//! just to count. The ledger mutex stays the only serialization point.
//!
//! NOTE: All atomics use Relaxed ordering intentionally—these are statistical
//! counters only. Do NOT use these atomics for coordination or logic decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Queue delay bucket boundaries (milliseconds)
/// Buckets: ≤10, ≤50, ≤100, ≤500, ≤1000, ≤5000, ≤10000, ≤30000, ≤60000, ≤120000, >120000
const BUCKET_BOUNDS: [u64; 10] = [10, 50, 100, 500, 1000, 5000, 10000, 30000, 60000, 120000];
const NUM_BUCKETS: usize = 11;

/// Compute bucket index for a delay value using binary search
#[inline]
fn bucket_index(delay_ms: u64) -> usize {
    BUCKET_BOUNDS.partition_point(|&bound| bound < delay_ms)
}

/// Update an atomic max value using compare-and-swap loop
#[inline]
fn update_atomic_max(atomic_max: &AtomicU64, new_value: u64) {
    let mut current_max = atomic_max.load(Ordering::Relaxed);
    while new_value > current_max {
        match atomic_max.compare_exchange_weak(
            current_max,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

/// Load all bucket values
#[inline]
fn load_buckets(buckets: &[AtomicU64; NUM_BUCKETS]) -> [u64; NUM_BUCKETS] {
    std::array::from_fn(|i| buckets[i].load(Ordering::Relaxed))
}

/// Compute percentile from histogram buckets
/// Returns the upper bound of the bucket containing the percentile
fn percentile_from_buckets(buckets: &[u64; NUM_BUCKETS], percentile: f64) -> u64 {
    let total: u64 = buckets.iter().sum();
    if total == 0 {
        return 0;
    }

    let target = ((total as f64 * percentile).ceil() as u64).max(1);
    let mut cumulative = 0u64;

    // Last bucket reports 2x the previous bound
    const BUCKET_UPPER_BOUNDS: [u64; NUM_BUCKETS] =
        [10, 50, 100, 500, 1000, 5000, 10000, 30000, 60000, 120000, 240000];

    for (i, &count) in buckets.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return BUCKET_UPPER_BOUNDS[i];
        }
    }
    BUCKET_UPPER_BOUNDS[NUM_BUCKETS - 1]
}

/// Lock-free metrics collector shared by the dispatcher and all cashiers
pub struct Metrics {
    /// Customers pushed into the dispatch channel
    customers_dispatched: AtomicU64,
    /// Customers whose transaction was recorded
    customers_served: AtomicU64,
    /// Items scanned across all baskets
    items_scanned: AtomicU64,
    /// Sum of simulated service times (ms)
    service_ms_sum: AtomicU64,
    /// Longest simulated service time (ms)
    service_ms_max: AtomicU64,
    /// Queue delay histogram (time from dispatch to cashier pickup)
    queue_delay_buckets: [AtomicU64; NUM_BUCKETS],
    /// Sum of queue delays (ms)
    queue_delay_sum_ms: AtomicU64,
    /// Max queue delay (ms)
    queue_delay_max_ms: AtomicU64,
    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            customers_dispatched: AtomicU64::new(0),
            customers_served: AtomicU64::new(0),
            items_scanned: AtomicU64::new(0),
            service_ms_sum: AtomicU64::new(0),
            service_ms_max: AtomicU64::new(0),
            queue_delay_buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            queue_delay_sum_ms: AtomicU64::new(0),
            queue_delay_max_ms: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record a customer handed to the dispatch channel (lock-free)
    #[inline]
    pub fn record_dispatched(&self) {
        self.customers_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the time a customer waited between dispatch and pickup (lock-free)
    #[inline]
    pub fn record_queue_delay(&self, delay_ms: u64) {
        self.queue_delay_sum_ms.fetch_add(delay_ms, Ordering::Relaxed);
        self.queue_delay_buckets[bucket_index(delay_ms)].fetch_add(1, Ordering::Relaxed);
        update_atomic_max(&self.queue_delay_max_ms, delay_ms);
    }

    /// Record a completed checkout (lock-free)
    #[inline]
    pub fn record_served(&self, items: usize, service_ms: u64) {
        self.customers_served.fetch_add(1, Ordering::Relaxed);
        self.items_scanned.fetch_add(items as u64, Ordering::Relaxed);
        self.service_ms_sum.fetch_add(service_ms, Ordering::Relaxed);
        update_atomic_max(&self.service_ms_max, service_ms);
    }

    #[inline]
    pub fn customers_dispatched(&self) -> u64 {
        self.customers_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn customers_served(&self) -> u64 {
        self.customers_served.load(Ordering::Relaxed)
    }

    /// Snapshot all counters
    pub fn report(&self) -> MetricsSummary {
        let served = self.customers_served();
        let service_sum = self.service_ms_sum.load(Ordering::Relaxed);
        let delay_sum = self.queue_delay_sum_ms.load(Ordering::Relaxed);
        let queue_delay_buckets = load_buckets(&self.queue_delay_buckets);
        let picked_up: u64 = queue_delay_buckets.iter().sum();
        let elapsed = self.started_at.elapsed().as_secs_f64();

        MetricsSummary {
            customers_dispatched: self.customers_dispatched(),
            customers_served: served,
            items_scanned: self.items_scanned.load(Ordering::Relaxed),
            service_avg_ms: if served > 0 { service_sum / served } else { 0 },
            service_max_ms: self.service_ms_max.load(Ordering::Relaxed),
            queue_delay_avg_ms: if picked_up > 0 { delay_sum / picked_up } else { 0 },
            queue_delay_max_ms: self.queue_delay_max_ms.load(Ordering::Relaxed),
            queue_delay_p99_ms: percentile_from_buckets(&queue_delay_buckets, 0.99),
            queue_delay_buckets,
            customers_per_sec: if elapsed > 0.0 { served as f64 / elapsed } else { 0.0 },
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct MetricsSummary {
    pub customers_dispatched: u64,
    pub customers_served: u64,
    pub items_scanned: u64,
    pub service_avg_ms: u64,
    pub service_max_ms: u64,
    /// Queue delay histogram buckets
    /// Bounds: ≤10, ≤50, ≤100, ≤500, ≤1000, ≤5000, ≤10000, ≤30000, ≤60000, ≤120000, >120000 ms
    pub queue_delay_buckets: [u64; NUM_BUCKETS],
    pub queue_delay_avg_ms: u64,
    pub queue_delay_max_ms: u64,
    pub queue_delay_p99_ms: u64,
    pub customers_per_sec: f64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            dispatched = %self.customers_dispatched,
            served = %self.customers_served,
            items = %self.items_scanned,
            service_avg_ms = %self.service_avg_ms,
            service_max_ms = %self.service_max_ms,
            queue_delay_avg_ms = %self.queue_delay_avg_ms,
            queue_delay_p99_ms = %self.queue_delay_p99_ms,
            customers_per_sec = format!("{:.2}", self.customers_per_sec),
            "metrics"
        );
    }
}
