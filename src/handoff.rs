//! Handoff encoding
//!
//! Serializes a completed English-auction request into the opaque token the
//! web renderer decodes. The token is URL-safe base64 over a UTF-8 JSON
//! object with a fixed key set; the bot never looks inside it again.

use crate::dialogue::EnglishRequest;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed-shape record the web renderer's client script consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateParams {
    pub token: String,
    pub bidding_time: u64,
    pub bid_limit: u128,
    pub nft: String,
    pub token_id: u64,
}

impl From<&EnglishRequest> for CreateParams {
    fn from(request: &EnglishRequest) -> Self {
        Self {
            token: request.payment_token.clone(),
            bidding_time: request.bidding_duration_secs,
            bid_limit: request.minimum_bid,
            nft: request.nft.clone(),
            token_id: request.nft_token_id,
        }
    }
}

/// Decode failure at the renderer boundary.
#[derive(Debug, Error)]
#[error("invalid handoff token: {0}")]
pub struct InvalidToken(String);

/// Encode a request as a URL-safe opaque token. Deterministic: field order
/// is fixed by the struct definition.
pub fn encode(params: &CreateParams) -> String {
    // Serialization of a plain struct with no map keys cannot fail.
    let json = serde_json::to_string(params).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// Exact inverse of [`encode`].
pub fn decode(token: &str) -> Result<CreateParams, InvalidToken> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.as_bytes())
        .map_err(|e| InvalidToken(format!("bad base64: {e}")))?;
    let json = String::from_utf8(bytes).map_err(|e| InvalidToken(format!("bad utf-8: {e}")))?;
    serde_json::from_str(&json).map_err(|e| InvalidToken(format!("bad json: {e}")))
}

/// Deep link the user follows to submit the transaction.
pub fn build_link(base_url: &str, token: &str) -> String {
    format!("{}/create/{token}", base_url.trim_end_matches('/'))
}
