//! Trade execution records
//!
//! A trade is immutable once emitted by the crossing loop.

use crate::ids::{OrderId, Symbol, TradeId};
use crate::numeric::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One execution between a buy order and a sell order
///
/// The buy/sell assignment follows the orders' sides, independent of which
/// of the two was the incoming order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: Symbol,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub price: Price,
    pub quantity: u64,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Create a new trade with a fresh id
    pub fn new(
        symbol: Symbol,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        price: Price,
        quantity: u64,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TradeId::new(),
            symbol,
            buy_order_id,
            sell_order_id,
            price,
            quantity,
            executed_at,
        }
    }
}
