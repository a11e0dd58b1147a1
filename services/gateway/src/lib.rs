//! HTTP API for the order matching engine
//!
//! Thin axum layer over [`matching_engine::MatchingEngine`]: request
//! parsing, the response envelope, and error-to-status mapping. All
//! matching semantics live in the engine.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
