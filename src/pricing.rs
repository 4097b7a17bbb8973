//! # Pricing
//!
//! Computes what a served order is charged. Exactly one rule applies per order,
//! checked in this order:
//!
//! 1. no items: `0.0`
//! 2. exactly three items: the first cheapest item is free
//! 3. at least one item carries the marked topping: marked items at full price,
//!    every other item at 90%
//! 4. otherwise: the plain sum
//!
//! An order of three items that also carries the marked topping gets rule 2 only.

use crate::model::Item;
use serde::{Deserialize, Serialize};

/// Topping that triggers the discount on the other items when none is configured.
pub const DEFAULT_MARKED_TOPPING: &str = "pineapple";

const MARKED_TOPPING_RATE: f64 = 0.9;

/// The discount rule chosen for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingRule {
    Empty,
    ThreeItems,
    MarkedTopping,
    FullPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingEngine {
    marked_topping: String,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MARKED_TOPPING)
    }
}

impl PricingEngine {
    pub fn new(marked_topping: impl Into<String>) -> Self {
        Self {
            marked_topping: marked_topping.into(),
        }
    }

    /// Which rule applies to `items`.
    pub fn rule_for(&self, items: &[Item]) -> PricingRule {
        if items.is_empty() {
            PricingRule::Empty
        } else if items.len() == 3 {
            PricingRule::ThreeItems
        } else if items.iter().any(|i| i.has_topping(&self.marked_topping)) {
            PricingRule::MarkedTopping
        } else {
            PricingRule::FullPrice
        }
    }

    /// Total charge for `items`.
    pub fn price(&self, items: &[Item]) -> f64 {
        match self.rule_for(items) {
            PricingRule::Empty => 0.0,
            PricingRule::ThreeItems => {
                let total: f64 = items.iter().map(|i| i.price).sum();
                total - first_cheapest(items).map_or(0.0, |i| i.price)
            }
            PricingRule::MarkedTopping => items
                .iter()
                .map(|i| {
                    if i.has_topping(&self.marked_topping) {
                        i.price
                    } else {
                        i.price * MARKED_TOPPING_RATE
                    }
                })
                .sum(),
            PricingRule::FullPrice => items.iter().map(|i| i.price).sum(),
        }
    }
}

/// The cheapest item; on ties, the one that was added first.
fn first_cheapest(items: &[Item]) -> Option<&Item> {
    items.iter().fold(None, |cheapest: Option<&Item>, item| match cheapest {
        Some(c) if c.price <= item.price => Some(c),
        _ => Some(item),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemId;

    fn plain(id: u32, price: f64) -> Item {
        Item::new(ItemId(id), price, Vec::<String>::new())
    }

    fn marked(id: u32, price: f64) -> Item {
        Item::new(ItemId(id), price, ["pineapple", "ham"])
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_order_is_free() {
        let engine = PricingEngine::default();
        assert_eq!(engine.rule_for(&[]), PricingRule::Empty);
        assert_close(engine.price(&[]), 0.0);
    }

    #[test]
    fn test_three_items_drop_the_cheapest() {
        let engine = PricingEngine::default();
        let items = [plain(1, 10.0), plain(2, 8.0), plain(3, 12.0)];
        assert_close(engine.price(&items), 22.0);
    }

    #[test]
    fn test_three_items_tie_discounts_first_cheapest() {
        let items = [plain(1, 5.0), plain(2, 5.0), plain(3, 9.0)];
        assert_eq!(first_cheapest(&items).map(|i| i.id), Some(ItemId(1)));
        assert_close(PricingEngine::default().price(&items), 14.0);
    }

    #[test]
    fn test_marked_topping_discounts_the_others() {
        let engine = PricingEngine::default();
        let items = [marked(1, 10.0), plain(2, 10.0)];
        assert_eq!(engine.rule_for(&items), PricingRule::MarkedTopping);
        assert_close(engine.price(&items), 19.0);
    }

    #[test]
    fn test_three_item_rule_wins_over_marked_topping() {
        let engine = PricingEngine::default();
        let items = [marked(1, 10.0), plain(2, 10.0), plain(3, 10.0)];
        assert_eq!(engine.rule_for(&items), PricingRule::ThreeItems);
        assert_close(engine.price(&items), 20.0);
    }

    #[test]
    fn test_full_price_without_discount() {
        let engine = PricingEngine::default();
        let items = [plain(1, 7.5), plain(2, 4.0)];
        assert_eq!(engine.rule_for(&items), PricingRule::FullPrice);
        assert_close(engine.price(&items), 11.5);
    }

    #[test]
    fn test_marked_topping_is_configurable() {
        let engine = PricingEngine::new("anchovy");
        let items = [Item::new(ItemId(1), 10.0, ["anchovy"]), marked(2, 10.0)];
        assert_close(engine.price(&items), 19.0);
        assert_close(PricingEngine::default().price(&items), 19.0);

        let only_pineapple = [marked(1, 10.0), plain(2, 10.0)];
        assert_close(engine.price(&only_pineapple), 20.0);
    }
}
