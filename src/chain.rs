//! Read-only facade over the chain endpoint
//!
//! Every operation takes a contract address (or a block range, for the log
//! query) and returns a typed value or a classified [`ChainError`].

mod abi;
mod client;
mod error;
#[cfg(test)]
pub mod testing;
mod types;

pub use client::ChainClient;
pub use error::ChainError;
pub use types::{Address, AddressParseError, AuctionEvent, AuctionType, BlockTag};

use async_trait::async_trait;

/// Read-side contract operations the rest of the service depends on.
///
/// Implemented by [`ChainClient`] in production and by a mock in tests.
/// No caching anywhere: each call reflects chain state at call time.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Snapshot of the aggregator contract's `AuctionCreated` log over the
    /// given block range, in chain emission order. Finite and replayable.
    async fn auction_created_events(
        &self,
        from_block: u64,
        to_block: BlockTag,
    ) -> Result<Vec<AuctionEvent>, ChainError>;

    /// ERC-20 `name()`.
    async fn token_name(&self, address: &Address) -> Result<String, ChainError>;

    /// ERC-721 `name()`.
    async fn nft_name(&self, address: &Address) -> Result<String, ChainError>;

    /// `owner()` of an auction contract.
    async fn owner(&self, address: &Address) -> Result<Address, ChainError>;

    /// Bidding deadline of an English auction, Unix seconds.
    async fn end_time(&self, auction: &Address) -> Result<i64, ChainError>;

    /// Max of the best bid and the configured floor, so an auction with no
    /// bids displays its floor instead of zero.
    async fn english_price(&self, auction: &Address) -> Result<u128, ChainError>;

    /// Current decayed price; time-dependent, recomputed on each call.
    async fn dutch_price(&self, auction: &Address) -> Result<u128, ChainError>;

    /// Current best bid of a fair auction.
    async fn fair_price(&self, auction: &Address) -> Result<u128, ChainError>;
}
