//! On-chain value types

use super::abi::{self, AbiError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 20-byte EVM address in 0x-hex form. Case is preserved as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid address {0:?}: expected 0x followed by 40 hex digits")]
pub struct AddressParseError(String);

impl Address {
    pub fn parse(s: &str) -> Result<Self, AddressParseError> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| AddressParseError(s.to_string()))?;
        if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressParseError(s.to_string()));
        }
        Ok(Address(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

/// The three auction models the aggregator contract can announce.
///
/// Closed set: adding a model means one new variant here and one new match
/// arm in the aggregator's price dispatch, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionType {
    /// Ascending bids with a floor and a deadline.
    English,
    /// Price decays over time from a starting value.
    Dutch,
    /// Bid-based with no deadline.
    Fair,
}

impl AuctionType {
    /// Map the event's integer type code to a variant.
    pub fn from_code(code: u8) -> Result<Self, AbiError> {
        match code {
            0 => Ok(AuctionType::English),
            1 => Ok(AuctionType::Dutch),
            2 => Ok(AuctionType::Fair),
            code => Err(AbiError::UnknownAuctionType(code)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuctionType::English => "English",
            AuctionType::Dutch => "Dutch",
            AuctionType::Fair => "Fair",
        }
    }
}

/// One `AuctionCreated` entry from the aggregator contract's log.
///
/// Immutable once read; produced only by the chain client's log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionEvent {
    pub auction_type: AuctionType,
    pub auction_address: Address,
    pub nft_address: Address,
    pub nft_token_id: u64,
    pub payment_token: Address,
}

impl AuctionEvent {
    /// Signature of the event as emitted by the aggregator contract.
    pub const SIGNATURE: &'static str = "AuctionCreated(uint8,address,address,address,uint256)";

    /// Decode the event's non-indexed data section: five words in argument
    /// order (type, auction, payment token, nft, token id).
    pub fn from_log_data(data: &str) -> Result<Self, AbiError> {
        let words = abi::event_words(data, 5)?;
        let code = u8::try_from(abi::word_to_u128(&words[0])?)
            .map_err(|_| AbiError::ValueTooWide)?;
        Ok(AuctionEvent {
            auction_type: AuctionType::from_code(code)?,
            auction_address: Address(abi::word_to_address(&words[1])?),
            payment_token: Address(abi::word_to_address(&words[2])?),
            nft_address: Address(abi::word_to_address(&words[3])?),
            nft_token_id: abi::word_to_u64(&words[4])?,
        })
    }
}

/// Upper bound of a log query's block range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Number(u64),
    Latest,
}

impl BlockTag {
    pub fn to_rpc(self) -> String {
        match self {
            BlockTag::Number(n) => format!("0x{n:x}"),
            BlockTag::Latest => "latest".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parse_accepts_canonical_form() {
        let addr = Address::parse("0xc7Fa3CaEB7d9BAD5C95EDC238f83101D7803B4b2").unwrap();
        assert_eq!(addr.as_str(), "0xc7Fa3CaEB7d9BAD5C95EDC238f83101D7803B4b2");
    }

    #[test]
    fn address_parse_rejects_junk() {
        assert!(Address::parse("not-an-address").is_err());
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("0xzz00000000000000000000000000000000000000").is_err());
    }

    #[test]
    fn auction_type_codes_are_closed() {
        assert_eq!(AuctionType::from_code(0).unwrap(), AuctionType::English);
        assert_eq!(AuctionType::from_code(1).unwrap(), AuctionType::Dutch);
        assert_eq!(AuctionType::from_code(2).unwrap(), AuctionType::Fair);
        assert!(matches!(
            AuctionType::from_code(3),
            Err(AbiError::UnknownAuctionType(3))
        ));
    }

    fn addr_word(addr_hex: &str) -> String {
        format!("{}{addr_hex}", "00".repeat(12))
    }

    #[test]
    fn event_decodes_from_five_word_data() {
        let auction = "11".repeat(20);
        let token = "22".repeat(20);
        let nft = "33".repeat(20);
        let data = format!(
            "0x{:064x}{}{}{}{:064x}",
            1u8,
            addr_word(&auction),
            addr_word(&token),
            addr_word(&nft),
            7u64,
        );
        let event = AuctionEvent::from_log_data(&data).unwrap();
        assert_eq!(event.auction_type, AuctionType::Dutch);
        assert_eq!(event.auction_address.as_str(), format!("0x{auction}"));
        assert_eq!(event.payment_token.as_str(), format!("0x{token}"));
        assert_eq!(event.nft_address.as_str(), format!("0x{nft}"));
        assert_eq!(event.nft_token_id, 7);
    }

    #[test]
    fn block_tag_renders_rpc_form() {
        assert_eq!(BlockTag::Number(0).to_rpc(), "0x0");
        assert_eq!(BlockTag::Number(255).to_rpc(), "0xff");
        assert_eq!(BlockTag::Latest.to_rpc(), "latest");
    }
}
