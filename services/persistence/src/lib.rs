//! Relational persistence for the matching engine
//!
//! Implements the engine's commit sink on MySQL: one transaction per
//! commit batch, plus the read side used by order and trade lookups.

pub mod config;
pub mod sink;

pub use config::DatabaseConfig;
pub use sink::MySqlSink;
