//! Per-symbol order book
//!
//! Two priority-ordered sides plus an id locator so cancellation does not
//! have to scan price levels. The book knows nothing about matching; the
//! crossing loop drives it through the front/pop operations.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use price_level::PriceLevel;

use std::collections::HashMap;
use types::ids::{OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, Side};

/// Resting limit orders for one symbol
///
/// Bids are ordered (price DESC, arrival ASC), asks (price ASC, arrival
/// ASC). Only limit orders with an open or partial status may rest here.
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: Symbol,
    bids: BidBook,
    asks: AskBook,
    /// Where each resting order lives, for O(log P) removal by id
    locations: HashMap<OrderId, (Side, Price)>,
}

impl OrderBook {
    /// Create an empty book for a symbol
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
            locations: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Insert a resting limit order into its side
    ///
    /// Orders that may not rest (market, unpriced, terminal status) are
    /// ignored; the engine enforces those preconditions upstream.
    pub fn add(&mut self, order: Order) {
        if !order.can_rest() {
            return;
        }
        let Some(price) = order.price else { return };
        self.locations.insert(order.id, (order.side, price));
        match order.side {
            Side::Buy => self.bids.insert(price, order),
            Side::Sell => self.asks.insert(price, order),
        }
    }

    /// Remove the order with this id from either side
    ///
    /// Returns whether a removal occurred.
    pub fn remove(&mut self, order_id: &OrderId) -> bool {
        let Some((side, price)) = self.locations.remove(order_id) else {
            return false;
        };
        match side {
            Side::Buy => self.bids.remove(order_id, price).is_some(),
            Side::Sell => self.asks.remove(order_id, price).is_some(),
        }
    }

    /// Best resting buy order, if any
    pub fn front_bid(&self) -> Option<&Order> {
        self.bids.front()
    }

    /// Best resting sell order, if any
    pub fn front_ask(&self) -> Option<&Order> {
        self.asks.front()
    }

    /// Remove and return the best resting buy order
    pub fn pop_front_bid(&mut self) -> Option<Order> {
        let order = self.bids.pop_front()?;
        self.locations.remove(&order.id);
        Some(order)
    }

    /// Remove and return the best resting sell order
    pub fn pop_front_ask(&mut self) -> Option<Order> {
        let order = self.asks.pop_front()?;
        self.locations.remove(&order.id);
        Some(order)
    }

    /// Up to the first `n` resting buy orders in priority order
    pub fn top_bids(&self, n: usize) -> Vec<Order> {
        self.bids.iter().take(n).cloned().collect()
    }

    /// Up to the first `n` resting sell orders in priority order
    pub fn top_asks(&self, n: usize) -> Vec<Order> {
        self.asks.iter().take(n).cloned().collect()
    }

    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn bid_count(&self) -> usize {
        self.bids.order_count()
    }

    pub fn ask_count(&self) -> usize {
        self.asks.order_count()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Best resting order on the given side, mutable
    ///
    /// Fill state only; changing price or id would corrupt the locator.
    pub(crate) fn front_mut(&mut self, side: Side) -> Option<&mut Order> {
        match side {
            Side::Buy => self.bids.front_mut(),
            Side::Sell => self.asks.front_mut(),
        }
    }

    /// Remove and return the best resting order on the given side
    pub(crate) fn pop_front(&mut self, side: Side) -> Option<Order> {
        match side {
            Side::Buy => self.pop_front_bid(),
            Side::Sell => self.pop_front_ask(),
        }
    }
}
