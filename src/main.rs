//! checkout-sim - concurrent store checkout simulation
//!
//! Generates a queue of customers with random baskets, serves them through a
//! fixed pool of cashiers running in parallel, and prints every receipt
//! followed by a transaction summary.
//!
//! Module structure:
//! - `domain/` - Core types (Product, Customer, Cashier, Transaction)
//! - `io/` - Console output (receipts, summary)
//! - `services/` - Business logic (Catalog, Dispatch, Cashier, Ledger, Checkout)
//! - `infra/` - Infrastructure (Config, Errors, Metrics)

use checkout_sim::infra::Config;
use checkout_sim::io::{format_summary, NullSink, ReceiptSink, StdoutSink, STARTUP_BANNER};
use checkout_sim::services::Checkout;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Store checkout simulation
#[derive(Parser, Debug)]
#[command(name = "checkout-sim", version, about)]
struct Args {
    /// Path to TOML configuration file (defaults apply if it does not exist)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the number of customers
    #[arg(long)]
    customers: Option<usize>,

    /// Override the number of cashiers
    #[arg(long)]
    cashiers: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Suppress per-customer receipts (summary is still printed)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logs go to stderr so stdout carries only the store output.
    // Default: WARN, use RUST_LOG=info for per-customer events
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = Config::resolve_config_path(args.config.as_deref());
    let mut config = Config::load_from_path(&config_path);
    if let Some(customers) = args.customers {
        config = config.with_customer_count(customers);
    }
    if let Some(cashiers) = args.cashiers {
        config = config.with_cashier_count(cashiers);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.quiet {
        config = config.with_print_receipts(false);
    }

    info!(
        git_hash = env!("GIT_HASH"),
        config_file = %config.config_file(),
        customers = %config.customer_count(),
        cashiers = %config.cashier_count(),
        service_unit_ms = %config.service_unit().as_millis(),
        seed = ?config.seed(),
        "config_loaded"
    );

    let sink: Arc<dyn ReceiptSink> =
        if config.print_receipts() { Arc::new(StdoutSink) } else { Arc::new(NullSink) };

    println!("{}", STARTUP_BANNER);

    let sample_size = config.sample_size();
    let checkout = Checkout::new(config, sink)?;
    let report = checkout.run().await?;

    print!("{}", format_summary(&report.summary, sample_size));
    Ok(())
}
