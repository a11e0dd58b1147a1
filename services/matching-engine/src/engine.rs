//! Matching engine core
//!
//! Entry point for order processing, cancellation, and book inspection.
//! The engine owns the symbol-to-book map behind a single reader-writer
//! lock: writers hold the exclusive guard across the entire call,
//! including the commit, so readers never observe uncommitted mutations
//! and failed commits can roll back without racing other writers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use types::book::{BookSnapshot, SimpleBookSnapshot};
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::order::{Order, OrderType, PlaceOrderRequest, Side};
use types::trade::Trade;

use crate::book::OrderBook;
use crate::clock::MonotonicClock;
use crate::matching::crossing;
use crate::sink::{CommitBatch, CommitSink};
use crate::snapshot;

/// Orders per side included in book snapshots
const SNAPSHOT_DEPTH: usize = 10;

/// Price-time-priority matching engine for one venue
pub struct MatchingEngine {
    state: RwLock<EngineState>,
    sink: Arc<dyn CommitSink>,
}

#[derive(Default)]
struct EngineState {
    books: HashMap<String, OrderBook>,
    clock: MonotonicClock,
    /// Symbols that refused further writes after an invariant violation
    halted: HashSet<String>,
}

impl EngineState {
    fn ensure_writable(&self, symbol: &str) -> Result<(), EngineError> {
        if self.halted.contains(symbol) {
            return Err(EngineError::Internal(format!(
                "writes are halted for symbol {symbol}"
            )));
        }
        Ok(())
    }
}

impl MatchingEngine {
    /// Create an engine committing through the given sink
    pub fn new(sink: Arc<dyn CommitSink>) -> Self {
        Self {
            state: RwLock::new(EngineState::default()),
            sink,
        }
    }

    /// Process a new order intent, returning the accepted order and the
    /// trades it generated
    ///
    /// The order is assigned its id and timestamp here, then crossed
    /// against the resting book. The resulting batch is committed as one
    /// atomic unit; on commit failure the book is restored to its
    /// pre-call state and [`EngineError::CommitFailed`] is surfaced.
    pub async fn process_order(
        &self,
        request: PlaceOrderRequest,
    ) -> Result<(Order, Vec<Trade>), EngineError> {
        let (side, order_type, price) = request.validate()?;
        let symbol = Symbol::try_new(request.symbol.as_str())
            .ok_or_else(|| EngineError::InvalidOrder("symbol is required".into()))?;

        let mut state = self.state.write().await;
        state.ensure_writable(symbol.as_str())?;

        let EngineState { books, clock, halted } = &mut *state;

        let created_at = clock.now();
        let mut taker = Order::new(
            symbol.clone(),
            side,
            order_type,
            price,
            request.quantity as u64,
            created_at,
        );

        let key = symbol.as_str().to_string();
        let had_book = books.contains_key(&key);
        let book = books
            .entry(key.clone())
            .or_insert_with(|| OrderBook::new(symbol.clone()));
        let rollback = book.clone();

        let (trades, touched) = match cross(book, clock, &mut taker) {
            Ok(result) => result,
            Err(err) => {
                restore(books, &key, rollback, had_book);
                halted.insert(key);
                tracing::error!(symbol = %symbol, error = %err, "halting symbol after invariant violation");
                return Err(err);
            }
        };

        let batch = CommitBatch::for_new_order(taker.clone(), trades.clone(), touched);
        if let Err(cause) = self.sink.commit(&batch).await {
            restore(books, &key, rollback, had_book);
            return Err(EngineError::CommitFailed(cause));
        }

        tracing::debug!(
            symbol = %symbol,
            order = %taker.id,
            trades = trades.len(),
            "order processed"
        );
        Ok((taker, trades))
    }

    /// Cancel a resting or not-yet-terminal order
    ///
    /// Consults durable state for the target; removal from the book is a
    /// no-op when the order is not resting.
    pub async fn cancel_order(&self, id: OrderId) -> Result<(), EngineError> {
        let mut state = self.state.write().await;

        let mut order = self
            .sink
            .load_order(id)
            .await
            .map_err(EngineError::CommitFailed)?
            .ok_or(EngineError::OrderNotFound(id))?;

        state.ensure_writable(order.symbol.as_str())?;

        if order.status.is_terminal() {
            return Err(EngineError::InvalidStatus(order.status));
        }

        let key = order.symbol.as_str().to_string();
        let rollback = state.books.get(&key).cloned();
        if let Some(book) = state.books.get_mut(&key) {
            book.remove(&id);
        }

        order.cancel();
        let batch = CommitBatch::for_update(order);
        if let Err(cause) = self.sink.commit(&batch).await {
            if let Some(saved) = rollback {
                state.books.insert(key, saved);
            }
            return Err(EngineError::CommitFailed(cause));
        }
        Ok(())
    }

    /// Look up an order in its latest committed state
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, EngineError> {
        // Shared access: reads line up behind any in-flight writer so they
        // observe only committed state.
        let _state = self.state.read().await;
        self.sink
            .load_order(id)
            .await
            .map_err(EngineError::CommitFailed)
    }

    /// Committed trades, optionally restricted to one symbol, newest first
    pub async fn get_trades(&self, symbol: Option<&str>) -> Result<Vec<Trade>, EngineError> {
        let _state = self.state.read().await;
        self.sink
            .load_trades(symbol)
            .await
            .map_err(EngineError::CommitFailed)
    }

    /// Aggregated snapshot of one symbol's book
    ///
    /// A symbol with no book yields an empty snapshot; the read path never
    /// creates books.
    pub async fn get_book(&self, symbol: &str) -> BookSnapshot {
        let state = self.state.read().await;
        let (top_bids, top_asks) = match state.books.get(symbol) {
            Some(book) => (book.top_bids(SNAPSHOT_DEPTH), book.top_asks(SNAPSHOT_DEPTH)),
            None => (Vec::new(), Vec::new()),
        };

        let bids = snapshot::aggregate_levels(&top_bids);
        let asks = snapshot::aggregate_levels(&top_asks);
        let spread = snapshot::spread(&bids, &asks);

        BookSnapshot {
            symbol: symbol.to_string(),
            timestamp: Utc::now(),
            bids,
            asks,
            spread,
            total_bid_orders: top_bids.len(),
            total_ask_orders: top_asks.len(),
        }
    }

    /// Condensed snapshots of every book
    pub async fn get_all_books(&self) -> HashMap<String, SimpleBookSnapshot> {
        let state = self.state.read().await;
        state
            .books
            .iter()
            .map(|(key, book)| {
                (
                    key.clone(),
                    SimpleBookSnapshot {
                        symbol: key.clone(),
                        bids: snapshot::simple_levels(&book.top_bids(SNAPSHOT_DEPTH)),
                        asks: snapshot::simple_levels(&book.top_asks(SNAPSHOT_DEPTH)),
                    },
                )
            })
            .collect()
    }
}

/// Put a book back to its pre-call image, dropping books that did not
/// exist before the call
fn restore(
    books: &mut HashMap<String, OrderBook>,
    key: &str,
    rollback: OrderBook,
    had_book: bool,
) {
    if had_book {
        books.insert(key.to_string(), rollback);
    } else {
        books.remove(key);
    }
}

/// Cross an incoming order against the opposite side of its book
///
/// Repeats while the taker has remaining quantity and the opposite side's
/// front order is price-compatible. Each step trades the smaller of the
/// two remaining quantities at the resting order's limit price, then pops
/// the resting order if it filled. Afterwards an unfilled market residual
/// is cancelled and an unfilled limit residual rests.
fn cross(
    book: &mut OrderBook,
    clock: &mut MonotonicClock,
    taker: &mut Order,
) -> Result<(Vec<Trade>, Vec<Order>), EngineError> {
    let mut trades = Vec::new();
    let mut touched = Vec::new();

    while taker.remaining_quantity > 0 {
        let maker_side = taker.side.opposite();

        let step = {
            let Some(maker) = book.front_mut(maker_side) else {
                break;
            };
            let compatible = match taker.side {
                Side::Buy => crossing::can_match(taker, maker),
                Side::Sell => crossing::can_match(maker, taker),
            };
            if !compatible {
                break;
            }
            // The resting side always carries a limit price; it sets the
            // execution price.
            let Some(price) = maker.price else {
                return Err(EngineError::Internal(format!(
                    "resting order {} has no price",
                    maker.id
                )));
            };
            let quantity = taker.remaining_quantity.min(maker.remaining_quantity);
            if !maker.apply_fill(quantity) {
                return Err(EngineError::Internal(format!(
                    "fill of {quantity} rejected by resting order {}",
                    maker.id
                )));
            }
            (price, quantity, maker.is_filled(), maker.clone())
        };
        let (price, quantity, maker_filled, maker_after) = step;

        if !taker.apply_fill(quantity) {
            return Err(EngineError::Internal(format!(
                "fill of {quantity} rejected by incoming order {}",
                taker.id
            )));
        }

        let (buy_order_id, sell_order_id) = match taker.side {
            Side::Buy => (taker.id, maker_after.id),
            Side::Sell => (maker_after.id, taker.id),
        };
        trades.push(Trade::new(
            taker.symbol.clone(),
            buy_order_id,
            sell_order_id,
            price,
            quantity,
            clock.now(),
        ));

        if maker_filled {
            let _ = book.pop_front(maker_side);
        }
        touched.push(maker_after);
    }

    if taker.remaining_quantity > 0 {
        match taker.order_type {
            // Unfilled market residual never rests
            OrderType::Market => taker.cancel(),
            OrderType::Limit => book.add(taker.clone()),
        }
    }

    Ok((trades, touched))
}
