//! Book snapshot aggregation
//!
//! Collapses a priority-ordered slice of resting orders into price levels
//! for the inspection API. Each level carries the summed remaining
//! quantity, the earliest arrival among its contributors, and the 1-based
//! queue position of that earliest contributor within the slice.

use types::book::{BookLevel, SimpleLevel};
use types::numeric::Price;
use types::order::Order;

/// Group a priority-ordered order slice into aggregated price levels
///
/// The input is already sorted (price priority, then arrival), so equal
/// prices are contiguous and output levels inherit the input's price
/// ordering: DESC for bids, ASC for asks.
pub(crate) fn aggregate_levels(orders: &[Order]) -> Vec<BookLevel> {
    let mut levels: Vec<BookLevel> = Vec::new();

    for (index, order) in orders.iter().enumerate() {
        let Some(price) = order.price else { continue };

        match levels.last_mut() {
            Some(level) if level.price == price => {
                level.quantity += order.remaining_quantity;
                if order.created_at < level.timestamp {
                    level.timestamp = order.created_at;
                    level.queue_position = index + 1;
                }
            }
            _ => levels.push(BookLevel {
                price,
                quantity: order.remaining_quantity,
                timestamp: order.created_at,
                queue_position: index + 1,
            }),
        }
    }

    levels
}

/// One price/quantity entry per order, for the condensed all-books view
pub(crate) fn simple_levels(orders: &[Order]) -> Vec<SimpleLevel> {
    orders
        .iter()
        .filter_map(|order| {
            order.price.map(|price| SimpleLevel {
                price,
                quantity: order.remaining_quantity,
            })
        })
        .collect()
}

/// Best ask minus best bid, absent when either side is empty
pub(crate) fn spread(bids: &[BookLevel], asks: &[BookLevel]) -> Option<Price> {
    let best_bid = bids.first()?;
    let best_ask = asks.first()?;
    best_ask.price.spread_over(best_bid.price)
}
