//! Chain read error types

use thiserror::Error;

/// Error from a read-only chain call, classified for retry policy.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport-level failure: connection, timeout, HTTP 5xx, or a
    /// response that is not a JSON-RPC envelope. Retryable.
    #[error("chain endpoint unavailable: {0}")]
    Unavailable(String),

    /// The call reached the contract but was rejected, or the returned
    /// payload does not decode to the expected shape. Not retryable.
    #[error("contract call reverted: {0}")]
    Reverted(String),
}

impl ChainError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChainError::Unavailable(_))
    }
}
