use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const BUNDLED_CATALOG: &str = include_str!("../../assets/catalog.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: u64,
}

pub fn bundled_catalog() -> Result<Vec<Product>> {
    serde_json::from_str(BUNDLED_CATALOG).context("parse bundled catalog")
}

/// In-memory cart for the native storefront. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: BTreeMap<String, u32>,
}

impl Cart {
    pub fn add(&mut self, product_id: &str) {
        *self.lines.entry(product_id.to_string()).or_insert(0) += 1;
    }

    pub fn remove_one(&mut self, product_id: &str) {
        if let Some(qty) = self.lines.get_mut(product_id) {
            *qty -= 1;
            if *qty == 0 {
                self.lines.remove(product_id);
            }
        }
    }

    pub fn quantity(&self, product_id: &str) -> u32 {
        self.lines.get(product_id).copied().unwrap_or(0)
    }

    pub fn item_count(&self) -> u32 {
        self.lines.values().sum()
    }

    pub fn total_cents(&self, catalog: &[Product]) -> u64 {
        catalog
            .iter()
            .map(|p| p.price_cents * u64::from(self.quantity(&p.id)))
            .sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

pub fn format_price(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_parses() {
        let catalog = bundled_catalog().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.iter().all(|p| !p.id.is_empty() && p.price_cents > 0));
    }

    #[test]
    fn cart_totals_follow_quantities() {
        let catalog = vec![
            Product {
                id: "a".into(),
                name: "A".into(),
                description: String::new(),
                price_cents: 250,
            },
            Product {
                id: "b".into(),
                name: "B".into(),
                description: String::new(),
                price_cents: 1000,
            },
        ];
        let mut cart = Cart::default();
        cart.add("a");
        cart.add("a");
        cart.add("b");
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total_cents(&catalog), 1500);

        cart.remove_one("b");
        cart.remove_one("b");
        assert_eq!(cart.quantity("b"), 0);
        assert_eq!(cart.total_cents(&catalog), 500);
        assert_eq!(format_price(cart.total_cents(&catalog)), "$5.00");
    }
}
