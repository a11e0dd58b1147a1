//! Order book snapshot wire shapes
//!
//! These structs define the JSON returned by the book inspection API.
//! `bids` and `asks` are always arrays, never null; `spread` is omitted
//! when either side is empty.

use crate::numeric::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One aggregated price level in a snapshot
///
/// `timestamp` is the earliest `created_at` among contributing orders;
/// `queue_position` is the 1-based position of that earliest contributor
/// within the snapshotted slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Price,
    pub quantity: u64,
    pub timestamp: DateTime<Utc>,
    pub queue_position: usize,
}

/// Aggregated view of one symbol's book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub spread: Option<Price>,
    pub total_bid_orders: usize,
    pub total_ask_orders: usize,
}

/// Price and quantity only, for the all-books listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleLevel {
    pub price: Price,
    pub quantity: u64,
}

/// Condensed view of one symbol's book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleBookSnapshot {
    pub symbol: String,
    pub bids: Vec<SimpleLevel>,
    pub asks: Vec<SimpleLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_wire_shape() {
        let snapshot = BookSnapshot {
            symbol: "AAPL".into(),
            timestamp: Utc::now(),
            bids: Vec::new(),
            asks: Vec::new(),
            spread: None,
            total_bid_orders: 0,
            total_ask_orders: 0,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["bids"].is_array(), "bids must be an array, never null");
        assert!(json["asks"].is_array(), "asks must be an array, never null");
        assert!(json.get("spread").is_none(), "spread omitted when absent");
    }

    #[test]
    fn test_level_wire_shape() {
        let level = BookLevel {
            price: Price::from_str("100.5").unwrap(),
            quantity: 7,
            timestamp: Utc::now(),
            queue_position: 1,
        };

        let json = serde_json::to_value(&level).unwrap();
        assert_eq!(json["price"], 100.5);
        assert_eq!(json["quantity"], 7);
        assert_eq!(json["queue_position"], 1);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_snapshot_with_spread() {
        let snapshot = BookSnapshot {
            symbol: "AAPL".into(),
            timestamp: Utc::now(),
            bids: Vec::new(),
            asks: Vec::new(),
            spread: Some(Price::from_u64(2)),
            total_bid_orders: 1,
            total_ask_orders: 1,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["spread"], 2.0);
    }
}
