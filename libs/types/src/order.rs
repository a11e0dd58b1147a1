//! Order lifecycle types
//!
//! An order is created `open` with its full quantity remaining. Matching
//! moves it through `partial` to `filled`; cancellation is terminal.

use crate::errors::EngineError;
use crate::ids::{OrderId, Symbol, MAX_SYMBOL_LEN};
use crate::numeric::Price;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type: priced and allowed to rest, or unpriced and immediate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Trades at the limit price or better; residual rests in the book
    Limit,
    /// Trades against any available liquidity; residual is cancelled
    Market,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::Market => "market",
        }
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "limit" => Ok(OrderType::Limit),
            "market" => Ok(OrderType::Market),
            other => Err(format!("unknown order type: {other}")),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order status
///
/// `Filled` and `Cancelled` are terminal; no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Accepted, nothing executed yet
    Open,
    /// Some quantity executed, some remaining
    Partial,
    /// Completely executed (terminal)
    Filled,
    /// Cancelled by the caller or as an unfilled market residual (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Partial => "partial",
            OrderStatus::Filled => "filled",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(OrderStatus::Open),
            "partial" => Ok(OrderStatus::Partial),
            "filled" => Ok(OrderStatus::Filled),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete order structure
///
/// `price` is present exactly when `order_type` is limit.
/// `initial_quantity` is immutable after creation; `remaining_quantity`
/// only ever decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<Price>,
    pub initial_quantity: u64,
    pub remaining_quantity: u64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new open order with a fresh id
    pub fn new(
        symbol: Symbol,
        side: Side,
        order_type: OrderType,
        price: Option<Price>,
        quantity: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            symbol,
            side,
            order_type,
            price,
            initial_quantity: quantity,
            remaining_quantity: quantity,
            status: OrderStatus::Open,
            created_at,
        }
    }

    /// Quantity executed so far
    pub fn filled_quantity(&self) -> u64 {
        self.initial_quantity - self.remaining_quantity
    }

    /// Check if the order is completely executed
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity == 0
    }

    /// Check whether the order may rest in a book
    pub fn can_rest(&self) -> bool {
        self.order_type == OrderType::Limit
            && self.price.is_some()
            && matches!(self.status, OrderStatus::Open | OrderStatus::Partial)
    }

    /// Apply an execution, decrementing remaining quantity and refreshing
    /// the status
    ///
    /// Returns false without mutating if `quantity` is zero or exceeds the
    /// remaining quantity.
    #[must_use]
    pub fn apply_fill(&mut self, quantity: u64) -> bool {
        if quantity == 0 || quantity > self.remaining_quantity {
            return false;
        }
        self.remaining_quantity -= quantity;
        self.status = if self.remaining_quantity == 0 {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
        true
    }

    /// Mark the order cancelled
    ///
    /// The caller is responsible for rejecting terminal orders first.
    pub fn cancel(&mut self) {
        self.status = OrderStatus::Cancelled;
    }
}

/// Raw intent to place an order, as it arrives off the wire
///
/// Fields stay in their wire form so every rule can be reported as an
/// `InvalidOrder` with a caller-facing reason; `validate` produces the
/// typed values the engine works with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<f64>,
    pub quantity: i64,
}

impl PlaceOrderRequest {
    /// Structural validation, yielding the typed side, order type, and
    /// price
    ///
    /// The transport runs this before handing the request over; the
    /// engine runs it again so it is safe on its own.
    pub fn validate(&self) -> Result<(Side, OrderType, Option<Price>), EngineError> {
        if self.symbol.is_empty() {
            return Err(EngineError::InvalidOrder("symbol is required".into()));
        }
        if self.symbol.len() > MAX_SYMBOL_LEN {
            return Err(EngineError::InvalidOrder(
                "symbol too long (max 50 characters)".into(),
            ));
        }
        if self.side.is_empty() {
            return Err(EngineError::InvalidOrder("side is required".into()));
        }
        if self.order_type.is_empty() {
            return Err(EngineError::InvalidOrder("type is required".into()));
        }
        if self.quantity <= 0 {
            return Err(EngineError::InvalidOrder("quantity must be positive".into()));
        }

        let side: Side = self
            .side
            .parse()
            .map_err(|_| EngineError::InvalidOrder("side must be 'buy' or 'sell'".into()))?;
        let order_type: OrderType = self
            .order_type
            .parse()
            .map_err(|_| EngineError::InvalidOrder("type must be 'limit' or 'market'".into()))?;

        let price = match (order_type, self.price) {
            (OrderType::Limit, None) => {
                return Err(EngineError::InvalidOrder(
                    "price required for limit orders".into(),
                ))
            }
            (OrderType::Market, Some(_)) => {
                return Err(EngineError::InvalidOrder(
                    "market orders should not have price".into(),
                ))
            }
            (OrderType::Market, None) => None,
            (OrderType::Limit, Some(raw)) => Some(
                Decimal::from_f64(raw)
                    .and_then(Price::try_new)
                    .ok_or_else(|| EngineError::InvalidOrder("price must be positive".into()))?,
            ),
        };

        Ok((side, order_type, price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_order(quantity: u64) -> Order {
        Order::new(
            Symbol::new("AAPL"),
            Side::Buy,
            OrderType::Limit,
            Some(Price::from_u64(100)),
            quantity,
            Utc::now(),
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_enum_string_round_trips() {
        for side in [Side::Buy, Side::Sell] {
            assert_eq!(side.as_str().parse::<Side>().unwrap(), side);
        }
        for order_type in [OrderType::Limit, OrderType::Market] {
            assert_eq!(order_type.as_str().parse::<OrderType>().unwrap(), order_type);
        }
        for status in [
            OrderStatus::Open,
            OrderStatus::Partial,
            OrderStatus::Filled,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_terminality() {
        assert!(!OrderStatus::Open.is_terminal());
        assert!(!OrderStatus::Partial.is_terminal());
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_order_creation() {
        let order = limit_order(5);
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.remaining_quantity, 5);
        assert_eq!(order.filled_quantity(), 0);
        assert!(order.can_rest());
    }

    #[test]
    fn test_order_fill_transitions() {
        let mut order = limit_order(5);

        assert!(order.apply_fill(3));
        assert_eq!(order.status, OrderStatus::Partial);
        assert_eq!(order.remaining_quantity, 2);
        assert_eq!(order.filled_quantity(), 3);

        assert!(order.apply_fill(2));
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(order.is_filled());
        assert!(!order.can_rest());
    }

    #[test]
    fn test_order_overfill_rejected() {
        let mut order = limit_order(5);
        assert!(!order.apply_fill(6));
        assert!(!order.apply_fill(0));
        // Untouched on rejection
        assert_eq!(order.remaining_quantity, 5);
        assert_eq!(order.status, OrderStatus::Open);
    }

    #[test]
    fn test_order_cancel() {
        let mut order = limit_order(5);
        order.cancel();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.status.is_terminal());
        assert_eq!(order.remaining_quantity, 5);
    }

    #[test]
    fn test_order_wire_shape() {
        let order = limit_order(5);
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["side"], "buy");
        assert_eq!(json["type"], "limit");
        assert_eq!(json["status"], "open");
        assert_eq!(json["price"], 100.0);
        assert_eq!(json["initial_quantity"], 5);

        let market = Order::new(
            Symbol::new("AAPL"),
            Side::Sell,
            OrderType::Market,
            None,
            5,
            Utc::now(),
        );
        let json = serde_json::to_value(&market).unwrap();
        assert!(json.get("price").is_none(), "market order omits price");
    }

    fn valid_request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            symbol: "AAPL".into(),
            side: "buy".into(),
            order_type: "limit".into(),
            price: Some(100.5),
            quantity: 5,
        }
    }

    fn reason(request: &PlaceOrderRequest) -> String {
        match request.validate() {
            Err(EngineError::InvalidOrder(reason)) => reason,
            other => panic!("expected InvalidOrder, got {other:?}"),
        }
    }

    #[test]
    fn test_request_validation_accepts_well_formed() {
        let (side, order_type, price) = valid_request().validate().unwrap();
        assert_eq!(side, Side::Buy);
        assert_eq!(order_type, OrderType::Limit);
        assert_eq!(price, Some(Price::from_str("100.5").unwrap()));

        let market = PlaceOrderRequest {
            order_type: "market".into(),
            price: None,
            ..valid_request()
        };
        let (_, order_type, price) = market.validate().unwrap();
        assert_eq!(order_type, OrderType::Market);
        assert_eq!(price, None);
    }

    #[test]
    fn test_request_validation_messages() {
        let mut request = valid_request();
        request.symbol = String::new();
        assert_eq!(reason(&request), "symbol is required");

        let mut request = valid_request();
        request.symbol = "X".repeat(MAX_SYMBOL_LEN + 1);
        assert_eq!(reason(&request), "symbol too long (max 50 characters)");

        let mut request = valid_request();
        request.side = "hold".into();
        assert_eq!(reason(&request), "side must be 'buy' or 'sell'");

        let mut request = valid_request();
        request.order_type = "stop".into();
        assert_eq!(reason(&request), "type must be 'limit' or 'market'");

        let mut request = valid_request();
        request.quantity = 0;
        assert_eq!(reason(&request), "quantity must be positive");
        request.quantity = -3;
        assert_eq!(reason(&request), "quantity must be positive");

        let mut request = valid_request();
        request.price = None;
        assert_eq!(reason(&request), "price required for limit orders");

        let mut request = valid_request();
        request.price = Some(-1.0);
        assert_eq!(reason(&request), "price must be positive");

        let mut request = valid_request();
        request.order_type = "market".into();
        assert_eq!(reason(&request), "market orders should not have price");
    }

    #[test]
    fn test_request_parses_wire_json() {
        let request: PlaceOrderRequest = serde_json::from_str(
            r#"{"symbol":"AAPL","side":"buy","type":"limit","price":100.5,"quantity":3}"#,
        )
        .unwrap();
        assert_eq!(request.side, "buy");
        assert_eq!(request.order_type, "limit");
        assert_eq!(request.price, Some(100.5));

        let market: PlaceOrderRequest =
            serde_json::from_str(r#"{"symbol":"AAPL","side":"sell","type":"market","quantity":3}"#)
                .unwrap();
        assert_eq!(market.price, None);
    }
}
