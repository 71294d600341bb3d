//! Price arithmetic over book collections.
//!
//! Every result is rounded to cents.
use thiserror::Error;

use crate::book::Book;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("Price must be a valid number")]
    InvalidPrice,

    #[error("Price cannot be negative")]
    NegativePrice,

    #[error("Discount must be a valid number")]
    InvalidDiscount,

    #[error("Discount must be between 0 and 100")]
    DiscountOutOfRange,
}

/// Anything carrying an optional decimal price string.
pub trait Priced {
    fn price(&self) -> Option<&str>;
}

impl Priced for Book {
    fn price(&self) -> Option<&str> {
        Some(&self.price)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Missing or unparseable prices count as zero.
pub fn calculate_total_price<P: Priced>(items: &[P]) -> f64 {
    let total: f64 = items
        .iter()
        .filter_map(|item| item.price())
        .filter_map(|price| price.trim().parse::<f64>().ok())
        .filter(|price| price.is_finite())
        .sum();

    round_cents(total)
}

pub fn apply_discount(price: f64, discount_percent: f64) -> Result<f64, PricingError> {
    if !price.is_finite() {
        return Err(PricingError::InvalidPrice);
    }
    if price < 0.0 {
        return Err(PricingError::NegativePrice);
    }
    if !discount_percent.is_finite() {
        return Err(PricingError::InvalidDiscount);
    }
    if !(0.0..=100.0).contains(&discount_percent) {
        return Err(PricingError::DiscountOutOfRange);
    }

    Ok(round_cents(price * (1.0 - discount_percent / 100.0)))
}

pub fn calculate_average_price<P: Priced>(items: &[P]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }

    round_cents(calculate_total_price(items) / items.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(Option<&'static str>);

    impl Priced for Item {
        fn price(&self) -> Option<&str> {
            self.0
        }
    }

    fn sample() -> Vec<Item> {
        vec![Item(Some("29.99")), Item(Some("22.00")), Item(Some("15.50"))]
    }

    #[test]
    fn test_apply_discount() {
        assert_eq!(apply_discount(100.0, 10.0), Ok(90.0));
        assert_eq!(apply_discount(29.99, 0.0), Ok(29.99));
        assert_eq!(apply_discount(50.0, 100.0), Ok(0.0));
        assert_eq!(apply_discount(100.0, 12.5), Ok(87.5));
    }

    #[test]
    fn test_apply_discount_rejects_bad_input() {
        assert_eq!(apply_discount(-10.0, 10.0), Err(PricingError::NegativePrice));
        assert_eq!(apply_discount(100.0, 150.0), Err(PricingError::DiscountOutOfRange));
        assert_eq!(apply_discount(100.0, -10.0), Err(PricingError::DiscountOutOfRange));
        assert_eq!(apply_discount(f64::NAN, 10.0), Err(PricingError::InvalidPrice));
        assert_eq!(apply_discount(10.0, f64::NAN), Err(PricingError::InvalidDiscount));
    }

    #[test]
    fn test_total_price() {
        assert_eq!(calculate_total_price(&sample()), 67.49);
        assert_eq!(calculate_total_price::<Item>(&[]), 0.0);
        assert_eq!(calculate_total_price(&[Item(Some("25.00"))]), 25.0);
    }

    #[test]
    fn test_total_price_skips_missing() {
        let items = [Item(Some("10.00")), Item(None), Item(Some("oops")), Item(Some("20.00"))];

        assert_eq!(calculate_total_price(&items), 30.0);
    }

    #[test]
    fn test_average_price() {
        assert_eq!(calculate_average_price(&sample()), 22.5);
        assert_eq!(calculate_average_price::<Item>(&[]), 0.0);
    }
}
