//! JSON-RPC chain client
//!
//! Stateless facade over `eth_call` / `eth_getLogs`. No caching: every
//! accessor reflects chain state at call time.

use super::abi;
use super::error::ChainError;
use super::types::{Address, AuctionEvent, BlockTag};
use super::ChainReader;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Production [`ChainReader`] backed by a JSON-RPC endpoint.
pub struct ChainClient {
    http: Client,
    rpc_url: String,
    aggregator: Address,
    created_topic: String,
    sel_name: [u8; 4],
    sel_owner: [u8; 4],
    sel_end_time: [u8; 4],
    sel_best_bid: [u8; 4],
    sel_bid_limit: [u8; 4],
    sel_current_price: [u8; 4],
}

impl ChainClient {
    pub fn new(rpc_url: impl Into<String>, aggregator: Address) -> Result<Self, ChainError> {
        let http = Client::builder()
            .timeout(RPC_TIMEOUT)
            .build()
            .map_err(|e| ChainError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            rpc_url: rpc_url.into(),
            aggregator,
            created_topic: abi::event_topic(AuctionEvent::SIGNATURE),
            sel_name: abi::selector("name()"),
            sel_owner: abi::selector("owner()"),
            sel_end_time: abi::selector("end_time()"),
            sel_best_bid: abi::selector("best_bid()"),
            sel_bid_limit: abi::selector("bid_limit()"),
            sel_current_price: abi::selector("getCurrentPrice()"),
        })
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        tracing::debug!(method, "chain rpc call");

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChainError::Unavailable(format!("request timeout: {e}"))
                } else {
                    ChainError::Unavailable(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChainError::Unavailable(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ChainError::Unavailable(format!("HTTP {status}: {body}")));
        }

        let envelope: RpcEnvelope = serde_json::from_str(&body)
            .map_err(|e| ChainError::Unavailable(format!("malformed rpc envelope: {e}")))?;

        if let Some(err) = envelope.error {
            return Err(ChainError::Reverted(format!(
                "rpc error {}: {}",
                err.code, err.message
            )));
        }

        envelope
            .result
            .ok_or_else(|| ChainError::Reverted("rpc response carried no result".to_string()))
    }

    async fn eth_call(&self, to: &Address, selector: [u8; 4]) -> Result<String, ChainError> {
        let result = self
            .rpc(
                "eth_call",
                json!([{ "to": to.as_str(), "data": abi::call_data(selector) }, "latest"]),
            )
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ChainError::Reverted("eth_call result is not a hex string".to_string()))
    }

    async fn call_uint(&self, to: &Address, selector: [u8; 4]) -> Result<u128, ChainError> {
        let data = self.eth_call(to, selector).await?;
        abi::decode_uint(&data).map_err(|e| ChainError::Reverted(e.to_string()))
    }

    async fn call_string(&self, to: &Address, selector: [u8; 4]) -> Result<String, ChainError> {
        let data = self.eth_call(to, selector).await?;
        abi::decode_string(&data).map_err(|e| ChainError::Reverted(e.to_string()))
    }
}

#[async_trait]
impl ChainReader for ChainClient {
    async fn auction_created_events(
        &self,
        from_block: u64,
        to_block: BlockTag,
    ) -> Result<Vec<AuctionEvent>, ChainError> {
        let result = self
            .rpc(
                "eth_getLogs",
                json!([{
                    "address": self.aggregator.as_str(),
                    "fromBlock": BlockTag::Number(from_block).to_rpc(),
                    "toBlock": to_block.to_rpc(),
                    "topics": [self.created_topic],
                }]),
            )
            .await?;

        let logs: Vec<LogEntry> = serde_json::from_value(result)
            .map_err(|e| ChainError::Reverted(format!("malformed log entries: {e}")))?;

        logs.iter()
            .map(|log| {
                AuctionEvent::from_log_data(&log.data)
                    .map_err(|e| ChainError::Reverted(format!("malformed AuctionCreated log: {e}")))
            })
            .collect()
    }

    async fn token_name(&self, address: &Address) -> Result<String, ChainError> {
        self.call_string(address, self.sel_name).await
    }

    async fn nft_name(&self, address: &Address) -> Result<String, ChainError> {
        self.call_string(address, self.sel_name).await
    }

    async fn owner(&self, address: &Address) -> Result<Address, ChainError> {
        let data = self.eth_call(address, self.sel_owner).await?;
        let raw = abi::decode_address(&data).map_err(|e| ChainError::Reverted(e.to_string()))?;
        Address::parse(&raw).map_err(|e| ChainError::Reverted(e.to_string()))
    }

    async fn end_time(&self, auction: &Address) -> Result<i64, ChainError> {
        let value = self.call_uint(auction, self.sel_end_time).await?;
        i64::try_from(value)
            .map_err(|_| ChainError::Reverted("end_time does not fit a timestamp".to_string()))
    }

    async fn english_price(&self, auction: &Address) -> Result<u128, ChainError> {
        // An auction with no bids should display its floor, not zero.
        let best_bid = self.call_uint(auction, self.sel_best_bid).await?;
        let bid_limit = self.call_uint(auction, self.sel_bid_limit).await?;
        Ok(best_bid.max(bid_limit))
    }

    async fn dutch_price(&self, auction: &Address) -> Result<u128, ChainError> {
        self.call_uint(auction, self.sel_current_price).await
    }

    async fn fair_price(&self, auction: &Address) -> Result<u128, ChainError> {
        self.call_uint(auction, self.sel_best_bid).await
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_envelope_parses() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted"}}"#;
        let envelope: RpcEnvelope = serde_json::from_str(body).unwrap();
        let err = envelope.error.unwrap();
        assert_eq!(err.code, 3);
        assert_eq!(err.message, "execution reverted");
    }

    #[test]
    fn log_entry_parses_data_field_only() {
        let body = r#"{"address":"0x00","topics":["0xabc"],"data":"0x1234","blockNumber":"0x1"}"#;
        let entry: LogEntry = serde_json::from_str(body).unwrap();
        assert_eq!(entry.data, "0x1234");
    }
}
