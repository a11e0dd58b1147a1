//! Price level with FIFO order queue
//!
//! A price level holds every resting order at one price point. Orders are
//! queued first-in-first-out; because the engine stamps orders with a
//! monotonic clock before they rest, queue order and time priority agree.

use types::ids::OrderId;
use types::order::Order;

use std::collections::VecDeque;

/// Resting orders at a single price, in arrival order
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<Order>,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an order at the back (time priority)
    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Remove an order from the queue by id
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|order| &order.id == order_id)?;
        self.orders.remove(position)
    }

    /// Peek at the front order without removing it
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to the front order
    ///
    /// Callers may update fill state only; price and id must not change.
    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Remove and return the front order
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Iterate the queued orders in priority order
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of orders at this level
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Sum of remaining quantities at this level
    pub fn total_quantity(&self) -> u64 {
        self.orders.iter().map(|order| order.remaining_quantity).sum()
    }
}
