//! Product catalog and customer generation
//!
//! Produces the fixed store catalog and the up-front customer list. All
//! randomness flows through a caller-supplied `StdRng`, so a seeded run
//! rebuilds exactly the same customers and baskets.

use crate::domain::types::{Basket, Customer, CustomerId, Product};
use crate::infra::config::Config;
use crate::infra::error::CheckoutError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::ops::RangeInclusive;

const DEFAULT_PRODUCTS: &[(&str, i64)] = &[
    ("Mie Instan", 15000),
    ("Kopi Bubuk", 12500),
    ("Roti", 8000),
    ("Telur", 25000),
    ("Shampoo", 20000),
    ("Gula", 10000),
    ("Minyak Goreng", 30000),
    ("Garam", 5000),
    ("Sabun", 7500),
    ("Pasta gigi", 15000),
];

const FIRST_NAMES: &[&str] = &[
    "Ayu", "Budi", "Citra", "Dewi", "Eko", "Fajar", "Gita", "Hadi", "Indah", "Joko", "Kartika",
    "Lestari", "Maya", "Nanda", "Oki", "Putri", "Rizky", "Sari", "Teguh", "Wulan",
];

const LAST_NAMES: &[&str] = &[
    "Santoso", "Wijaya", "Saputra", "Hidayat", "Kusuma", "Pratama", "Halim", "Gunawan",
    "Setiawan", "Nugroho", "Siregar", "Lubis", "Purnomo", "Utami", "Rahman",
];

/// Build an RNG for one randomness stream
///
/// With a seed, each stream gets its own reproducible sequence; without one
/// every stream draws from OS entropy.
pub fn seeded_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

/// The built-in store catalog
pub fn default_catalog() -> Vec<Product> {
    DEFAULT_PRODUCTS
        .iter()
        .map(|&(name, price)| Product::new(name, Decimal::from(price)))
        .collect()
}

/// Catalog for a run: the configured products, or the built-in list
pub fn generate_catalog(config: &Config) -> Vec<Product> {
    match config.products() {
        Some(products) => products.to_vec(),
        None => default_catalog(),
    }
}

/// Random "First Last" display name
pub fn random_name<R: Rng>(rng: &mut R) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{} {}", first, last)
}

/// Generate `count` customers with random baskets drawn from `catalog`
///
/// Customer IDs and queue numbers are both `1..=count` in generation order.
/// Items are picked uniformly with replacement.
pub fn generate_customers<R: Rng>(
    count: usize,
    catalog: &[Product],
    basket_size: RangeInclusive<usize>,
    rng: &mut R,
) -> Result<Vec<Customer>, CheckoutError> {
    if count > 0 && catalog.is_empty() {
        return Err(CheckoutError::InvalidConfig("cannot fill baskets from an empty catalog".into()));
    }
    if basket_size.is_empty() {
        return Err(CheckoutError::InvalidConfig(format!(
            "basket size range {:?} is empty",
            basket_size
        )));
    }

    let mut customers = Vec::with_capacity(count);
    for i in 0..count {
        let num_products = rng.gen_range(basket_size.clone());
        let mut basket = Basket::with_capacity(num_products);
        for _ in 0..num_products {
            if let Some(product) = catalog.choose(rng) {
                basket.push(product.clone());
            }
        }

        let position = (i + 1) as u32;
        customers.push(Customer::new(CustomerId(position), random_name(rng), position, basket));
    }

    Ok(customers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog[0], Product::new("Mie Instan", Decimal::from(15000)));
        assert!(catalog.iter().all(|p| !p.price.is_sign_negative()));
    }

    #[test]
    fn test_generate_catalog_prefers_config() {
        let products = vec![Product::new("Air Mineral", Decimal::from(3000))];
        let config = Config::default().with_products(products.clone());
        assert_eq!(generate_catalog(&config), products);
        assert_eq!(generate_catalog(&Config::default()).len(), 10);
    }

    #[test]
    fn test_generate_customers_shape() {
        let catalog = default_catalog();
        let mut rng = seeded_rng(Some(7), 0);
        let customers = generate_customers(50, &catalog, 1..=4, &mut rng).unwrap();

        assert_eq!(customers.len(), 50);
        for (i, customer) in customers.iter().enumerate() {
            assert_eq!(customer.id, CustomerId(i as u32 + 1));
            assert_eq!(customer.queue_num, i as u32 + 1);
            assert!((1..=4).contains(&customer.item_count()));
            assert!(customer.products.iter().all(|p| catalog.contains(p)));
            let sum: Decimal = customer.products.iter().map(|p| p.price).sum();
            assert_eq!(customer.total_price, sum);
            assert!(!customer.name.is_empty());
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let catalog = default_catalog();
        let a = generate_customers(30, &catalog, 1..=4, &mut seeded_rng(Some(42), 0)).unwrap();
        let b = generate_customers(30, &catalog, 1..=4, &mut seeded_rng(Some(42), 0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_customers_with_empty_catalog() {
        let customers = generate_customers(0, &[], 1..=4, &mut seeded_rng(Some(1), 0)).unwrap();
        assert!(customers.is_empty());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = generate_customers(3, &[], 1..=4, &mut seeded_rng(Some(1), 0));
        assert!(matches!(result, Err(CheckoutError::InvalidConfig(_))));
    }

    #[test]
    fn test_fixed_basket_size() {
        let catalog = default_catalog();
        let customers = generate_customers(20, &catalog, 2..=2, &mut seeded_rng(Some(3), 0)).unwrap();
        assert!(customers.iter().all(|c| c.item_count() == 2));
    }
}
