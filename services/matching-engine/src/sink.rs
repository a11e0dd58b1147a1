//! Commit sink contract
//!
//! The engine durably records every book mutation through this interface.
//! A batch is the atomic unit: either the new order, its trades, and the
//! touched makers all become visible, or none of them do.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use types::ids::OrderId;
use types::order::Order;
use types::trade::Trade;

/// One atomic unit of durable state
///
/// `modified_orders` carries every resting order touched during matching,
/// or the cancelled order for a cancellation.
#[derive(Debug, Clone, Default)]
pub struct CommitBatch {
    pub new_order: Option<Order>,
    pub trades: Vec<Trade>,
    pub modified_orders: Vec<Order>,
}

impl CommitBatch {
    /// Batch produced by processing a new order
    pub fn for_new_order(order: Order, trades: Vec<Trade>, modified_orders: Vec<Order>) -> Self {
        Self {
            new_order: Some(order),
            trades,
            modified_orders,
        }
    }

    /// Batch updating a single existing order (cancellation)
    pub fn for_update(order: Order) -> Self {
        Self {
            new_order: None,
            trades: Vec::new(),
            modified_orders: vec![order],
        }
    }
}

/// Durable recording collaborator
///
/// `commit` must be atomic; after it returns Ok the engine assumes the
/// batch is durable. Reads reflect the latest committed state.
#[async_trait]
pub trait CommitSink: Send + Sync {
    async fn commit(&self, batch: &CommitBatch) -> anyhow::Result<()>;

    async fn load_order(&self, id: OrderId) -> anyhow::Result<Option<Order>>;

    /// Trades for one symbol, or all trades, newest first
    async fn load_trades(&self, symbol: Option<&str>) -> anyhow::Result<Vec<Trade>>;
}

/// In-process sink backed by hash maps
///
/// Used by the test suites and for running the engine without a database.
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    orders: HashMap<OrderId, Order>,
    trades: Vec<Trade>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed trades, for test assertions
    pub fn trade_count(&self) -> usize {
        self.state.lock().expect("sink state poisoned").trades.len()
    }
}

#[async_trait]
impl CommitSink for MemorySink {
    async fn commit(&self, batch: &CommitBatch) -> anyhow::Result<()> {
        let mut state = self.state.lock().expect("sink state poisoned");
        if let Some(order) = &batch.new_order {
            state.orders.insert(order.id, order.clone());
        }
        state.trades.extend(batch.trades.iter().cloned());
        for order in &batch.modified_orders {
            state.orders.insert(order.id, order.clone());
        }
        Ok(())
    }

    async fn load_order(&self, id: OrderId) -> anyhow::Result<Option<Order>> {
        let state = self.state.lock().expect("sink state poisoned");
        Ok(state.orders.get(&id).cloned())
    }

    async fn load_trades(&self, symbol: Option<&str>) -> anyhow::Result<Vec<Trade>> {
        let state = self.state.lock().expect("sink state poisoned");
        let mut trades: Vec<Trade> = state
            .trades
            .iter()
            .filter(|trade| symbol.map_or(true, |s| trade.symbol.as_str() == s))
            .cloned()
            .collect();
        trades.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use types::ids::Symbol;
    use types::numeric::Price;
    use types::order::{OrderType, Side};

    fn order(symbol: &str) -> Order {
        Order::new(
            Symbol::new(symbol),
            Side::Buy,
            OrderType::Limit,
            Some(Price::from_u64(100)),
            5,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_commit_then_load_order() {
        let sink = MemorySink::new();
        let order = order("AAPL");
        let id = order.id;

        sink.commit(&CommitBatch::for_new_order(order, Vec::new(), Vec::new()))
            .await
            .unwrap();

        let loaded = sink.load_order(id).await.unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert!(sink.load_order(OrderId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_modified_orders_overwrite() {
        let sink = MemorySink::new();
        let mut order = order("AAPL");
        let id = order.id;

        sink.commit(&CommitBatch::for_new_order(order.clone(), Vec::new(), Vec::new()))
            .await
            .unwrap();

        assert!(order.apply_fill(2));
        sink.commit(&CommitBatch::for_update(order)).await.unwrap();

        let loaded = sink.load_order(id).await.unwrap().unwrap();
        assert_eq!(loaded.remaining_quantity, 3);
    }

    #[tokio::test]
    async fn test_load_trades_filters_and_sorts_newest_first() {
        let sink = MemorySink::new();
        let buy = order("AAPL");
        let sell = order("AAPL");

        let older = Trade::new(
            Symbol::new("AAPL"),
            buy.id,
            sell.id,
            Price::from_u64(100),
            1,
            Utc::now(),
        );
        let newer = Trade::new(
            Symbol::new("AAPL"),
            buy.id,
            sell.id,
            Price::from_u64(100),
            2,
            Utc::now() + chrono::Duration::seconds(1),
        );
        let other_symbol = Trade::new(
            Symbol::new("MSFT"),
            buy.id,
            sell.id,
            Price::from_u64(50),
            1,
            Utc::now(),
        );

        sink.commit(&CommitBatch {
            new_order: None,
            trades: vec![older.clone(), newer.clone(), other_symbol],
            modified_orders: Vec::new(),
        })
        .await
        .unwrap();

        let trades = sink.load_trades(Some("AAPL")).await.unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, newer.id);
        assert_eq!(trades[1].id, older.id);

        assert_eq!(sink.load_trades(None).await.unwrap().len(), 3);
    }
}
