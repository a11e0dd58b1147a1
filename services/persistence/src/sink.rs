//! MySQL-backed commit sink
//!
//! Records commit batches in a single transaction: the new order, then
//! its trades, then the touched resting orders. Trades carry foreign keys
//! to both orders, so that write order is load-bearing.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;

use matching_engine::{CommitBatch, CommitSink};
use types::ids::{OrderId, Symbol, TradeId};
use types::numeric::Price;
use types::order::Order;
use types::trade::Trade;

use crate::config::DatabaseConfig;

/// Commit sink persisting to MySQL via sqlx
#[derive(Debug, Clone)]
pub struct MySqlSink {
    pool: MySqlPool,
}

impl MySqlSink {
    /// Connect a pooled sink using the given configuration
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .connect(&config.url())
            .await
            .context("failed to connect to database")?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn with_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the orders and trades tables if they do not exist
    pub async fn init_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id CHAR(36) PRIMARY KEY,
                symbol VARCHAR(50) NOT NULL,
                side VARCHAR(8) NOT NULL,
                `type` VARCHAR(8) NOT NULL,
                price DECIMAL(24, 8) NULL,
                initial_quantity BIGINT UNSIGNED NOT NULL,
                remaining_quantity BIGINT UNSIGNED NOT NULL,
                status VARCHAR(16) NOT NULL,
                created_at DATETIME(6) NOT NULL,
                INDEX idx_orders_symbol_status (symbol, status)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trades (
                id CHAR(36) PRIMARY KEY,
                symbol VARCHAR(50) NOT NULL,
                buy_order_id CHAR(36) NOT NULL,
                sell_order_id CHAR(36) NOT NULL,
                price DECIMAL(24, 8) NOT NULL,
                quantity BIGINT UNSIGNED NOT NULL,
                executed_at DATETIME(6) NOT NULL,
                INDEX idx_trades_symbol (symbol),
                CONSTRAINT fk_trades_buy_order
                    FOREIGN KEY (buy_order_id) REFERENCES orders (id),
                CONSTRAINT fk_trades_sell_order
                    FOREIGN KEY (sell_order_id) REFERENCES orders (id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CommitSink for MySqlSink {
    async fn commit(&self, batch: &CommitBatch) -> anyhow::Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("failed to begin transaction")?;

        if let Some(order) = &batch.new_order {
            sqlx::query(
                r#"
                INSERT INTO orders
                    (id, symbol, side, `type`, price, initial_quantity,
                     remaining_quantity, status, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(order.id.to_string())
            .bind(order.symbol.as_str())
            .bind(order.side.as_str())
            .bind(order.order_type.as_str())
            .bind(order.price.map(|p| p.as_decimal()))
            .bind(order.initial_quantity)
            .bind(order.remaining_quantity)
            .bind(order.status.as_str())
            .bind(order.created_at.naive_utc())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to save order {}", order.id))?;
        }

        for trade in &batch.trades {
            sqlx::query(
                r#"
                INSERT INTO trades
                    (id, symbol, buy_order_id, sell_order_id, price, quantity, executed_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(trade.id.to_string())
            .bind(trade.symbol.as_str())
            .bind(trade.buy_order_id.to_string())
            .bind(trade.sell_order_id.to_string())
            .bind(trade.price.as_decimal())
            .bind(trade.quantity)
            .bind(trade.executed_at.naive_utc())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to save trade {}", trade.id))?;
        }

        for order in &batch.modified_orders {
            sqlx::query("UPDATE orders SET remaining_quantity = ?, status = ? WHERE id = ?")
                .bind(order.remaining_quantity)
                .bind(order.status.as_str())
                .bind(order.id.to_string())
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to update order {}", order.id))?;
        }

        tx.commit().await.context("failed to commit transaction")
    }

    async fn load_order(&self, id: OrderId) -> anyhow::Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, symbol, side, `type`, price, initial_quantity,
                   remaining_quantity, status, created_at
            FROM orders WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn load_trades(&self, symbol: Option<&str>) -> anyhow::Result<Vec<Trade>> {
        let rows = match symbol {
            Some(symbol) => {
                sqlx::query(
                    r#"
                    SELECT id, symbol, buy_order_id, sell_order_id, price, quantity, executed_at
                    FROM trades WHERE symbol = ? ORDER BY executed_at DESC
                    "#,
                )
                .bind(symbol)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, symbol, buy_order_id, sell_order_id, price, quantity, executed_at
                    FROM trades ORDER BY executed_at DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(trade_from_row).collect()
    }
}

fn order_from_row(row: &MySqlRow) -> anyhow::Result<Order> {
    let id: String = row.try_get("id")?;
    let symbol: String = row.try_get("symbol")?;
    let side: String = row.try_get("side")?;
    let order_type: String = row.try_get("type")?;
    let price: Option<Decimal> = row.try_get("price")?;
    let initial_quantity: u64 = row.try_get("initial_quantity")?;
    let remaining_quantity: u64 = row.try_get("remaining_quantity")?;
    let status: String = row.try_get("status")?;
    let created_at: chrono::NaiveDateTime = row.try_get("created_at")?;

    Ok(Order {
        id: OrderId::parse(&id).with_context(|| format!("malformed order id {id}"))?,
        symbol: Symbol::try_new(symbol).ok_or_else(|| anyhow!("malformed symbol in orders row"))?,
        side: side.parse().map_err(|e: String| anyhow!(e))?,
        order_type: order_type.parse().map_err(|e: String| anyhow!(e))?,
        price: price
            .map(|p| Price::try_new(p).ok_or_else(|| anyhow!("non-positive price in orders row")))
            .transpose()?,
        initial_quantity,
        remaining_quantity,
        status: status.parse().map_err(|e: String| anyhow!(e))?,
        created_at: utc(created_at),
    })
}

fn trade_from_row(row: &MySqlRow) -> anyhow::Result<Trade> {
    let id: String = row.try_get("id")?;
    let symbol: String = row.try_get("symbol")?;
    let buy_order_id: String = row.try_get("buy_order_id")?;
    let sell_order_id: String = row.try_get("sell_order_id")?;
    let price: Decimal = row.try_get("price")?;
    let quantity: u64 = row.try_get("quantity")?;
    let executed_at: chrono::NaiveDateTime = row.try_get("executed_at")?;

    Ok(Trade {
        id: TradeId::parse(&id).with_context(|| format!("malformed trade id {id}"))?,
        symbol: Symbol::try_new(symbol).ok_or_else(|| anyhow!("malformed symbol in trades row"))?,
        buy_order_id: OrderId::parse(&buy_order_id)?,
        sell_order_id: OrderId::parse(&sell_order_id)?,
        price: Price::try_new(price).ok_or_else(|| anyhow!("non-positive price in trades row"))?,
        quantity,
        executed_at: utc(executed_at),
    })
}

fn utc(naive: chrono::NaiveDateTime) -> DateTime<Utc> {
    naive.and_utc()
}
