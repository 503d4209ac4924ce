use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl Availability {
    pub fn label(&self) -> &'static str {
        match self {
            Availability::InStock => "In Stock",
            Availability::OutOfStock => "Out of Stock",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub currency: String,
    pub image_url: String,
    pub category: String,
    pub brand: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub availability: Availability,
    pub store: String,
}

impl Product {
    /// Whole-percent discount off the original price.
    /// Only present when the original price strictly exceeds the current one.
    pub fn discount(&self) -> Option<u32> {
        let original = self.original_price?;
        if original <= self.price {
            return None;
        }
        Some((((original - self.price) / original) * 100.0).floor() as u32)
    }

    pub fn formatted_price(&self) -> String {
        format_amount(self.price, &self.currency)
    }

    pub fn formatted_original_price(&self) -> Option<String> {
        self.original_price
            .map(|original| format_amount(original, &self.currency))
    }
}

/// One store's offer for a product, generated per detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceComparison {
    pub id: Uuid,
    pub store: String,
    pub price: f64,
    pub currency: String,
    pub availability: Availability,
    pub delivery_time: Option<String>,
    pub url: String,
}

impl PriceComparison {
    pub fn formatted_price(&self) -> String {
        format_amount(self.price, &self.currency)
    }
}

fn format_amount(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::product;

    #[test]
    fn test_discount_absent_without_original_price() {
        let item = product("1", 20.0);
        assert_eq!(item.discount(), None);
    }

    #[test]
    fn test_discount_absent_when_original_not_higher() {
        let mut item = product("1", 20.0);
        item.original_price = Some(20.0);
        assert_eq!(item.discount(), None);

        item.original_price = Some(15.0);
        assert_eq!(item.discount(), None);
    }

    #[test]
    fn test_discount_floors_percentage() {
        let mut item = product("1", 75.0);
        item.original_price = Some(100.0);
        assert_eq!(item.discount(), Some(25));

        // 1/3 off is 33.33..%
        item.price = 20.0;
        item.original_price = Some(30.0);
        assert_eq!(item.discount(), Some(33));
    }

    #[test]
    fn test_discount_stays_below_hundred_for_priced_items() {
        for (price, original) in [(0.01, 1000.0), (9.99, 10.0), (1.0, 1.5), (499.0, 999.99)] {
            let mut item = product("1", price);
            item.original_price = Some(original);
            let discount = item.discount().unwrap();
            assert!(discount < 100, "{} off {} gave {}", price, original, discount);
            let expected = (((original - price) / original) * 100.0).floor() as u32;
            assert_eq!(discount, expected);
        }
    }

    #[test]
    fn test_formatted_prices() {
        let mut item = product("1", 9.5);
        assert_eq!(item.formatted_price(), "9.50 USD");
        assert_eq!(item.formatted_original_price(), None);

        item.original_price = Some(12.0);
        assert_eq!(item.formatted_original_price().as_deref(), Some("12.00 USD"));
    }

    #[test]
    fn test_availability_serializes_as_label() {
        let json = serde_json::to_string(&Availability::OutOfStock).unwrap();
        assert_eq!(json, "\"Out of Stock\"");
        assert_eq!(Availability::InStock.to_string(), "In Stock");
    }
}
