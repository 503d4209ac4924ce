//! Simulated cross-store price comparison.
//!
//! There is no real store integration: offers are drawn from a random source
//! around the product's own price. The source is injected so that a seed
//! reproduces the same offers.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use crate::models::{Availability, PriceComparison, Product};

pub const STORES: [&str; 5] = ["Amazon", "eBay", "Walmart", "Target", "Best Buy"];

const MIN_OFFERS: usize = 3;
const MIN_MULTIPLIER: f64 = 0.85;
const MAX_MULTIPLIER: f64 = 1.15;
const IN_STOCK_PROBABILITY: f64 = 0.8;
const MAX_DELIVERY_DAYS: u32 = 7;

/// Generates 3 to 5 offers from distinct stores, cheapest first.
pub fn compare_prices<R: Rng>(product: &Product, rng: &mut R) -> Vec<PriceComparison> {
    let count = rng.gen_range(MIN_OFFERS..=STORES.len());
    let stores: Vec<&str> = STORES.choose_multiple(rng, count).copied().collect();

    let mut offers: Vec<PriceComparison> = stores
        .into_iter()
        .map(|store| offer(product, store, rng))
        .collect();

    offers.sort_by(|a, b| a.price.total_cmp(&b.price));
    offers
}

fn offer<R: Rng>(product: &Product, store: &str, rng: &mut R) -> PriceComparison {
    let price = product.price * rng.gen_range(MIN_MULTIPLIER..=MAX_MULTIPLIER);

    let availability = if rng.gen_bool(IN_STOCK_PROBABILITY) {
        Availability::InStock
    } else {
        Availability::OutOfStock
    };

    let days = rng.gen_range(1..=MAX_DELIVERY_DAYS);
    let delivery_time = if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    };

    PriceComparison {
        id: Builder::from_random_bytes(rng.gen()).into_uuid(),
        store: store.to_string(),
        price,
        currency: product.currency.clone(),
        availability,
        delivery_time: Some(delivery_time),
        url: store_url(store, &product.id),
    }
}

fn store_url(store: &str, product_id: &str) -> String {
    let host: String = store
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    format!("https://{}.com/product/{}", host, product_id)
}

/// Owns the random source used for comparisons.
pub struct PriceComparator {
    rng: StdRng,
}

impl PriceComparator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn compare(&mut self, product: &Product) -> Vec<PriceComparison> {
        compare_prices(product, &mut self.rng)
    }
}

impl Default for PriceComparator {
    fn default() -> Self {
        Self::new()
    }
}
