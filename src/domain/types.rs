//! Shared types for the checkout simulation

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use smallvec::SmallVec;
use std::fmt;

/// Newtype wrapper for customer IDs to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CustomerId(pub u32);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for cashier IDs (1-based, matches the printed number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CashierId(pub u32);

impl CashierId {
    /// Position of this cashier in zero-based storage
    #[inline]
    pub fn index(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }
}

impl fmt::Display for CashierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money amount rendered as `Rp<amount>` with two decimals, half away from zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rupiah(pub Decimal);

impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "Rp{:.2}", rounded)
    }
}

/// Catalog entry. Equality is by value only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: Decimal,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self { name: name.into(), price }
    }
}

/// Basket contents; baskets hold at most a handful of items so they stay inline
pub type Basket = SmallVec<[Product; 4]>;

/// A shopper waiting in line
///
/// Built once by the generator and shared read-only (via `Arc`) with whichever
/// cashier ends up serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Position in the queue, assigned at generation time
    pub queue_num: u32,
    pub products: Basket,
    /// Sum of `products` prices
    pub total_price: Decimal,
}

impl Customer {
    /// Build a customer, computing the basket total
    pub fn new(id: CustomerId, name: impl Into<String>, queue_num: u32, products: Basket) -> Self {
        let total_price = products.iter().map(|p| p.price).sum();
        Self { id, name: name.into(), queue_num, products, total_price }
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.products.len()
    }
}

/// Cashier identity plus the number of customers served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cashier {
    pub id: CashierId,
    pub customers_served: u64,
}

impl Cashier {
    pub fn new(id: CashierId) -> Self {
        Self { id, customers_served: 0 }
    }
}

/// One completed checkout
///
/// `number` is 1-based and unique within a ledger. Display renders the
/// human-readable description line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub number: usize,
    pub cashier_id: CashierId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub item_count: usize,
    pub total_price: Decimal,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction #{}: Customer {} bought {} products for {}",
            self.number,
            self.customer_name,
            self.item_count,
            Rupiah(self.total_price)
        )
    }
}
