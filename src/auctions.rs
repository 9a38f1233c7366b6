//! Auction aggregation
//!
//! Turns raw `AuctionCreated` events into fully resolved listing records by
//! issuing the dependent reads through a [`ChainReader`]. Price resolution
//! dispatches on the auction type; that match is the only place in the
//! pipeline that cares which model an auction uses.

use crate::chain::{Address, AuctionEvent, AuctionType, ChainError, ChainReader};

/// One auction, fully resolved for display.
///
/// Every field is populated before formatting; a failed sub-read fails the
/// whole record, so partial listings never exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionListing {
    pub auction_type: AuctionType,
    pub auction_address: Address,
    pub nft_address: Address,
    pub nft_token_id: u64,
    pub nft_name: String,
    pub payment_token: Address,
    pub token_name: String,
    /// Smallest token unit.
    pub price: u128,
    pub owner: Address,
    /// Unix seconds.
    pub end_time: i64,
}

/// Resolve one event into a listing. Chain errors propagate unchanged.
pub async fn resolve<C: ChainReader + ?Sized>(
    chain: &C,
    event: &AuctionEvent,
) -> Result<AuctionListing, ChainError> {
    let price = match event.auction_type {
        AuctionType::English => chain.english_price(&event.auction_address).await?,
        AuctionType::Dutch => chain.dutch_price(&event.auction_address).await?,
        AuctionType::Fair => chain.fair_price(&event.auction_address).await?,
    };

    let token_name = chain.token_name(&event.payment_token).await?;
    let nft_name = chain.nft_name(&event.nft_address).await?;
    let owner = chain.owner(&event.auction_address).await?;
    // Fair auctions have no deadline of their own; the shared accessor is
    // queried anyway so every listing row carries an end time.
    let end_time = chain.end_time(&event.auction_address).await?;

    Ok(AuctionListing {
        auction_type: event.auction_type,
        auction_address: event.auction_address.clone(),
        nft_address: event.nft_address.clone(),
        nft_token_id: event.nft_token_id,
        nft_name,
        payment_token: event.payment_token.clone(),
        token_name,
        price,
        owner,
        end_time,
    })
}

/// Resolve a batch in input order. Fail-fast: the first failure aborts the
/// whole batch, so a reply never mixes resolved and missing rows.
pub async fn resolve_all<C: ChainReader + ?Sized>(
    chain: &C,
    events: &[AuctionEvent],
) -> Result<Vec<AuctionListing>, ChainError> {
    let mut listings = Vec::with_capacity(events.len());
    for event in events {
        listings.push(resolve(chain, event).await?);
    }
    Ok(listings)
}
