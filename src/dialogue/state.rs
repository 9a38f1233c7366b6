//! Dialogue flow state types

use serde::Serialize;
use thiserror::Error;

/// Which auction-creation flow a session is walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionFlow {
    English,
    Dutch,
}

/// Per-session dialogue position.
///
/// Shared prefix (NFT address, token id, payment token) carries the flow
/// variant; the tail states are flow-specific. Transitions only advance
/// within one flow instance; starting a flow resets the field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    AwaitingNftAddress(AuctionFlow),
    AwaitingTokenId(AuctionFlow),
    AwaitingPaymentToken(AuctionFlow),
    // English tail
    AwaitingMinimumBid,
    AwaitingDuration,
    // Dutch tail
    AwaitingStartPrice,
    AwaitingDecayRate,
}

impl FlowState {
    pub fn in_flow(self) -> bool {
        self != FlowState::Idle
    }
}

/// Field names, matching the keys the web renderer ultimately sees.
pub mod fields {
    pub const NFT_ADDRESS: &str = "nft_address";
    pub const TOKEN_ID: &str = "token_id";
    pub const ERC20_ADDRESS: &str = "erc20_address";
    pub const MIN_PRICE: &str = "min_price";
    pub const DURATION: &str = "duration";
    pub const START_PRICE: &str = "start_price";
    pub const DECAY_RATE: &str = "decay_rate";
}

/// Collected raw inputs, one per visited state, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(Vec<(&'static str, String)>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field. Each state is visited once per flow instance, so a
    /// key never repeats.
    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.push((name, value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.0.iter().map(|(key, _)| *key).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// A required field was missing or failed base-10 coercion at completion.
///
/// With per-step validation this is unreachable through the normal flow,
/// but the terminal coercion still refuses to produce a partial request.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("field {0:?} is missing or not a base-10 integer")]
pub struct MalformedField(pub &'static str);

fn require<'a>(map: &'a FieldMap, name: &'static str) -> Result<&'a str, MalformedField> {
    map.get(name).ok_or(MalformedField(name))
}

fn require_u64(map: &FieldMap, name: &'static str) -> Result<u64, MalformedField> {
    require(map, name)?.parse().map_err(|_| MalformedField(name))
}

fn require_u128(map: &FieldMap, name: &'static str) -> Result<u128, MalformedField> {
    require(map, name)?.parse().map_err(|_| MalformedField(name))
}

/// Terminal artifact of a completed English flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnglishRequest {
    pub payment_token: String,
    pub nft: String,
    pub nft_token_id: u64,
    pub bidding_duration_secs: u64,
    pub minimum_bid: u128,
}

impl EnglishRequest {
    pub fn from_fields(map: &FieldMap) -> Result<Self, MalformedField> {
        Ok(Self {
            payment_token: require(map, fields::ERC20_ADDRESS)?.to_string(),
            nft: require(map, fields::NFT_ADDRESS)?.to_string(),
            nft_token_id: require_u64(map, fields::TOKEN_ID)?,
            bidding_duration_secs: require_u64(map, fields::DURATION)?,
            minimum_bid: require_u128(map, fields::MIN_PRICE)?,
        })
    }
}

/// Terminal artifact of a completed Dutch flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutchRequest {
    pub payment_token: String,
    pub nft: String,
    pub nft_token_id: u64,
    pub start_price: u128,
    pub decay_rate_per_sec: u128,
}

impl DutchRequest {
    pub fn from_fields(map: &FieldMap) -> Result<Self, MalformedField> {
        Ok(Self {
            payment_token: require(map, fields::ERC20_ADDRESS)?.to_string(),
            nft: require(map, fields::NFT_ADDRESS)?.to_string(),
            nft_token_id: require_u64(map, fields::TOKEN_ID)?,
            start_price: require_u128(map, fields::START_PRICE)?,
            decay_rate_per_sec: require_u128(map, fields::DECAY_RATE)?,
        })
    }
}
