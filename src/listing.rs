//! Listing formatting
//!
//! Pure rendering of resolved auction listings into the markdown block the
//! conversation channel shows. No I/O here.

use crate::auctions::AuctionListing;
use crate::chain::Address;
use chrono::DateTime;

/// Block-explorer link builder for addresses and token pages.
#[derive(Debug, Clone)]
pub struct Explorer {
    base: String,
}

impl Explorer {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn token_url(&self, address: &Address) -> String {
        format!("{}/token/{address}", self.base)
    }

    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{address}", self.base)
    }
}

/// Render one line per listing, newline-joined, in input order.
/// Empty input renders to the empty string.
pub fn format_listings(listings: &[AuctionListing], explorer: &Explorer) -> String {
    listings
        .iter()
        .map(|listing| format_line(listing, explorer))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(listing: &AuctionListing, explorer: &Explorer) -> String {
    let nft = format!(
        "[{}:{}]({})",
        listing.nft_name,
        listing.nft_token_id,
        explorer.token_url(&listing.nft_address)
    );
    let token = format!(
        "[{}]({})",
        listing.token_name,
        explorer.token_url(&listing.payment_token)
    );
    let owner = format!("[link]({})", explorer.address_url(&listing.owner));

    format!(
        "NFT: {nft} Type: {} Token: {token} Price: {} Owner: {owner} End time: {}",
        listing.auction_type.label(),
        listing.price,
        format_end_time(listing.end_time),
    )
}

/// `YYYY-MM-DD HH:MM:SS`, UTC. Out-of-range timestamps (which a contract
/// can technically return) render as a placeholder instead of panicking.
fn format_end_time(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0).map_or_else(
        || "invalid timestamp".to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}
