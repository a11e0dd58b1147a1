//! Order matching engine
//!
//! In-memory limit order books with price-time-priority matching. The
//! engine serializes order processing per venue, emits trades, and hands
//! every mutation to a [`sink::CommitSink`] as one atomic batch.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced; ties break by arrival
//! - The book is never left crossed after processing
//! - Trades conserve quantity between both orders
//! - Commit failure rolls the book back to its pre-call state

pub mod book;
pub mod clock;
pub mod engine;
pub mod matching;
pub mod sink;
mod snapshot;

pub use engine::MatchingEngine;
pub use sink::{CommitBatch, CommitSink, MemorySink};
