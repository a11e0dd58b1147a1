//! Error taxonomy for the matching engine
//!
//! Every failure the core can surface, using thiserror. Nothing is
//! swallowed: validation errors stop processing before any mutation,
//! commit failures are rolled back and surfaced, invariant violations
//! halt writes on the affected symbol.

use crate::ids::OrderId;
use crate::order::OrderStatus;
use thiserror::Error;

/// Top-level engine error
#[derive(Debug, Error)]
pub enum EngineError {
    /// Structural precondition failed; the book is unchanged
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// Cancellation target does not exist
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// Cancellation of an order already in a terminal state
    #[error("cannot cancel order with status: {0}")]
    InvalidStatus(OrderStatus),

    /// The commit sink reported failure; in-memory state was rolled back
    #[error("commit failed: {0}")]
    CommitFailed(anyhow::Error),

    /// Invariant violation; writes on the affected symbol are refused
    /// from here on
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Reason surfaced to API callers
    ///
    /// Validation and cancellation errors carry caller-facing reasons;
    /// commit and internal failures keep their full messages.
    pub fn reason(&self) -> String {
        match self {
            EngineError::InvalidOrder(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_order_reason_is_bare() {
        let err = EngineError::InvalidOrder("quantity must be positive".into());
        assert_eq!(err.reason(), "quantity must be positive");
        assert_eq!(err.to_string(), "invalid order: quantity must be positive");
    }

    #[test]
    fn test_invalid_status_display() {
        let err = EngineError::InvalidStatus(OrderStatus::Filled);
        assert_eq!(err.to_string(), "cannot cancel order with status: filled");
    }

    #[test]
    fn test_commit_failed_preserves_cause() {
        let err = EngineError::CommitFailed(anyhow::anyhow!("connection reset"));
        assert!(err.to_string().contains("connection reset"));
    }
}
