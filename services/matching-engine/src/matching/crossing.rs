//! Crossing detection
//!
//! Decides whether a buy order and a sell order can trade against each
//! other based on price compatibility.

use types::order::{Order, OrderType};

/// Check whether a buy order and a sell order can cross
///
/// A market order on either side is always compatible. Two limit orders
/// cross iff the buy price is at or above the sell price. An unpriced
/// limit order never matches; that state is rejected upstream.
pub fn can_match(buy: &Order, sell: &Order) -> bool {
    if buy.order_type == OrderType::Market || sell.order_type == OrderType::Market {
        return true;
    }
    match (buy.price, sell.price) {
        (Some(bid), Some(ask)) => bid >= ask,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use types::ids::Symbol;
    use types::numeric::Price;
    use types::order::Side;

    fn order(side: Side, order_type: OrderType, price: Option<u64>) -> Order {
        Order::new(
            Symbol::new("AAPL"),
            side,
            order_type,
            price.map(Price::from_u64),
            1,
            Utc::now(),
        )
    }

    #[test]
    fn test_limit_orders_cross_when_bid_meets_ask() {
        let buy = order(Side::Buy, OrderType::Limit, Some(101));
        let sell = order(Side::Sell, OrderType::Limit, Some(100));
        assert!(can_match(&buy, &sell));
    }

    #[test]
    fn test_limit_orders_cross_at_equal_price() {
        let buy = order(Side::Buy, OrderType::Limit, Some(100));
        let sell = order(Side::Sell, OrderType::Limit, Some(100));
        assert!(can_match(&buy, &sell));
    }

    #[test]
    fn test_limit_orders_do_not_cross_below_ask() {
        let buy = order(Side::Buy, OrderType::Limit, Some(99));
        let sell = order(Side::Sell, OrderType::Limit, Some(100));
        assert!(!can_match(&buy, &sell));
    }

    #[test]
    fn test_market_order_always_crosses() {
        let buy = order(Side::Buy, OrderType::Market, None);
        let sell = order(Side::Sell, OrderType::Limit, Some(1_000_000));
        assert!(can_match(&buy, &sell));

        let buy = order(Side::Buy, OrderType::Limit, Some(1));
        let sell = order(Side::Sell, OrderType::Market, None);
        assert!(can_match(&buy, &sell));
    }

    #[test]
    fn test_unpriced_limit_never_crosses() {
        let buy = order(Side::Buy, OrderType::Limit, None);
        let sell = order(Side::Sell, OrderType::Limit, Some(100));
        assert!(!can_match(&buy, &sell));
    }
}
