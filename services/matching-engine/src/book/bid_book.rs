//! Bid (buy-side) order book
//!
//! Buy orders grouped into price levels, iterated highest price first.
//! BTreeMap keys keep level iteration deterministic.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Order;

use super::price_level::PriceLevel;

/// Bid (buy) side of a book
///
/// The highest price is the best bid. Within a level, orders are FIFO.
#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    /// Create a new empty bid book
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resting buy order at its price level
    pub fn insert(&mut self, price: Price, order: Order) {
        self.levels.entry(price).or_default().push_back(order);
    }

    /// Remove an order, returning it if it was resting at `price`
    pub fn remove(&mut self, order_id: &OrderId, price: Price) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id);
        if removed.is_some() && level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    /// Best (highest) bid price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Peek at the highest-priority resting buy order
    pub fn front(&self) -> Option<&Order> {
        self.levels.values().next_back().and_then(PriceLevel::front)
    }

    /// Mutable access to the highest-priority resting buy order
    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.levels.values_mut().next_back().and_then(PriceLevel::front_mut)
    }

    /// Remove and return the highest-priority resting buy order
    pub fn pop_front(&mut self) -> Option<Order> {
        let price = self.best_price()?;
        let level = self.levels.get_mut(&price)?;
        let order = level.pop_front();
        if level.is_empty() {
            self.levels.remove(&price);
        }
        order
    }

    /// Iterate resting orders in priority order (price DESC, arrival ASC)
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().rev().flat_map(PriceLevel::iter)
    }

    /// Total number of resting orders
    pub fn order_count(&self) -> usize {
        self.levels.values().map(PriceLevel::len).sum()
    }

    /// Number of distinct price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Check if the bid book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
