//! Integration tests for a full checkout run

use checkout_sim::domain::{CustomerId, Transaction};
use checkout_sim::infra::Config;
use checkout_sim::io::{format_summary, MemorySink, NullSink};
use checkout_sim::services::{Checkout, Store};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

fn test_config(customers: usize, cashiers: usize) -> Config {
    Config::default()
        .with_customer_count(customers)
        .with_cashier_count(cashiers)
        .with_service_unit_ms(1000)
        .with_print_receipts(false)
        .with_seed(2024)
}

/// Every customer maps to exactly one transaction with matching basket data
fn assert_bijection(store: &Store, transactions: &[Transaction]) {
    let by_customer: HashMap<CustomerId, &Transaction> =
        transactions.iter().map(|t| (t.customer_id, t)).collect();
    assert_eq!(by_customer.len(), transactions.len(), "customer recorded twice");
    assert_eq!(by_customer.len(), store.customers().len());

    for customer in store.customers() {
        let tx = by_customer.get(&customer.id).expect("customer missing from ledger");
        assert_eq!(tx.item_count, customer.item_count());
        assert_eq!(tx.total_price, customer.total_price);
        assert_eq!(tx.customer_name, customer.name);
    }
}

#[tokio::test(start_paused = true)]
async fn test_every_customer_recorded_exactly_once() {
    for round in 0..3u64 {
        let config = test_config(60, 4).with_seed(100 + round);
        let checkout = Checkout::new(config.clone(), Arc::new(NullSink)).unwrap();
        // Same seed rebuilds the same store for comparison
        let expected = Store::initialize(&config).unwrap();

        let report = checkout.run().await.unwrap();
        let summary = &report.summary;

        assert_eq!(summary.total_transactions(), 60);
        let served: u64 = summary.cashiers.iter().map(|c| c.customers_served).sum();
        assert_eq!(served, 60);

        let numbers: HashSet<usize> = summary.transactions.iter().map(|t| t.number).collect();
        assert_eq!(numbers.len(), 60);
        assert!(numbers.iter().all(|&n| (1..=60).contains(&n)));

        assert_bijection(&expected, &summary.transactions);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unique_numbers_on_multi_thread_runtime() {
    let config = test_config(80, 6).with_service_unit_ms(1).with_service_units(0, 2);
    let report = Checkout::new(config, Arc::new(NullSink)).unwrap().run().await.unwrap();

    let numbers: HashSet<usize> = report.summary.transactions.iter().map(|t| t.number).collect();
    assert_eq!(numbers.len(), 80);
    assert_eq!(report.summary.cashiers.iter().map(|c| c.customers_served).sum::<u64>(), 80);
}

#[tokio::test(start_paused = true)]
async fn test_single_customer_single_cashier() {
    let sink = Arc::new(MemorySink::new());
    let config = test_config(1, 1);
    let report = Checkout::new(config, sink.clone()).unwrap().run().await.unwrap();

    assert_eq!(report.summary.total_transactions(), 1);
    assert_eq!(report.summary.cashiers.len(), 1);
    assert_eq!(report.summary.cashiers[0].customers_served, 1);
    assert_eq!(report.summary.sample(5).len(), 1);

    let text = format_summary(&report.summary, 5);
    assert!(text.contains("Total transactions: 1\n"));
    assert!(text.contains("Cashier 1 processed 1 customers\n"));
    assert_eq!(text.lines().filter(|l| l.starts_with("Transaction #1: ")).count(), 1);

    // Serving line followed by the receipt
    let blocks = sink.blocks();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].starts_with("Cashier 1 serving customer "));
    assert!(blocks[1].contains("----- RECEIPT -----"));
}

#[tokio::test(start_paused = true)]
async fn test_cashiers_serve_in_parallel() {
    let config = test_config(10, 5).with_service_units(2, 2);
    let unit = config.service_unit();
    let report = Checkout::new(config, Arc::new(NullSink)).unwrap().run().await.unwrap();

    assert_eq!(report.summary.total_transactions(), 10);
    assert!(report.summary.cashiers.iter().all(|c| c.customers_served > 0));
    assert_eq!(report.summary.cashiers.iter().map(|c| c.customers_served).sum::<u64>(), 10);

    // Two rounds of 2 units each, far below 10 sequential checkouts
    let fixed = unit * 2;
    assert!(report.elapsed >= fixed * 2);
    assert!(report.elapsed < fixed * 10);
}

#[tokio::test(start_paused = true)]
async fn test_no_customers_does_not_deadlock() {
    let config = test_config(0, 5);
    let run = Checkout::new(config, Arc::new(NullSink)).unwrap().run();
    let report = tokio::time::timeout(Duration::from_secs(5), run).await.unwrap().unwrap();

    assert_eq!(report.summary.total_transactions(), 0);
    assert_eq!(report.summary.cashiers.len(), 5);
    assert!(report.summary.cashiers.iter().all(|c| c.customers_served == 0));

    let text = format_summary(&report.summary, 5);
    assert!(text.contains("Total transactions: 0\n"));
    assert!(!text.contains("Transaction #"));
    assert!(text.ends_with("Store Payment Simulation Completed!\n"));
}

#[test]
fn test_seeded_store_is_reproducible() {
    let config = test_config(25, 2).with_seed(77);
    let a = Store::initialize(&config).unwrap();
    let b = Store::initialize(&config).unwrap();

    assert_eq!(a.products(), b.products());
    let customers_a: Vec<_> = a.customers().iter().map(|c| (**c).clone()).collect();
    let customers_b: Vec<_> = b.customers().iter().map(|c| (**c).clone()).collect();
    assert_eq!(customers_a, customers_b);
}
