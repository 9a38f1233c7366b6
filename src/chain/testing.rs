//! In-memory [`ChainReader`] for tests.

use super::error::ChainError;
use super::types::{Address, AuctionEvent, BlockTag};
use super::ChainReader;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock chain state: fixed answers per address, plus a call log so tests
/// can assert which price path the aggregator dispatched to.
#[derive(Default)]
pub struct MockChain {
    pub events: Vec<AuctionEvent>,
    pub token_names: HashMap<String, String>,
    pub nft_names: HashMap<String, String>,
    pub owners: HashMap<String, Address>,
    pub end_times: HashMap<String, i64>,
    pub english_prices: HashMap<String, u128>,
    pub dutch_prices: HashMap<String, u128>,
    pub fair_prices: HashMap<String, u128>,
    pub fail_with: Option<fn() -> ChainError>,
    calls: Mutex<Vec<String>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    fn record(&self, method: &str, address: &Address) -> Result<(), ChainError> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(format!("{method}({address})"));
        match self.fail_with {
            Some(make_error) => Err(make_error()),
            None => Ok(()),
        }
    }

    fn lookup<T: Clone>(
        map: &HashMap<String, T>,
        address: &Address,
        what: &str,
    ) -> Result<T, ChainError> {
        map.get(address.as_str())
            .cloned()
            .ok_or_else(|| ChainError::Reverted(format!("mock has no {what} for {address}")))
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn auction_created_events(
        &self,
        _from_block: u64,
        _to_block: BlockTag,
    ) -> Result<Vec<AuctionEvent>, ChainError> {
        if let Some(make_error) = self.fail_with {
            return Err(make_error());
        }
        Ok(self.events.clone())
    }

    async fn token_name(&self, address: &Address) -> Result<String, ChainError> {
        self.record("token_name", address)?;
        Self::lookup(&self.token_names, address, "token name")
    }

    async fn nft_name(&self, address: &Address) -> Result<String, ChainError> {
        self.record("nft_name", address)?;
        Self::lookup(&self.nft_names, address, "nft name")
    }

    async fn owner(&self, address: &Address) -> Result<Address, ChainError> {
        self.record("owner", address)?;
        Self::lookup(&self.owners, address, "owner")
    }

    async fn end_time(&self, auction: &Address) -> Result<i64, ChainError> {
        self.record("end_time", auction)?;
        Self::lookup(&self.end_times, auction, "end time")
    }

    async fn english_price(&self, auction: &Address) -> Result<u128, ChainError> {
        self.record("english_price", auction)?;
        Self::lookup(&self.english_prices, auction, "english price")
    }

    async fn dutch_price(&self, auction: &Address) -> Result<u128, ChainError> {
        self.record("dutch_price", auction)?;
        Self::lookup(&self.dutch_prices, auction, "dutch price")
    }

    async fn fair_price(&self, auction: &Address) -> Result<u128, ChainError> {
        self.record("fair_price", auction)?;
        Self::lookup(&self.fair_prices, auction, "fair price")
    }
}
