//! Environment-driven configuration
//!
//! Everything the process needs is read once at startup: the chain
//! endpoint, the fixed aggregator contract address, link bases, and the ABI
//! descriptor files the renderer injects into its page.

use crate::chain::Address;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("failed to read ABI file {path}: {reason}")]
    AbiFile { path: PathBuf, reason: String },
}

/// Process configuration, loaded from `GAVEL_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub aggregator: Address,
    pub web_base_url: String,
    pub explorer_url: String,
    pub abi_dir: PathBuf,
    pub port: u16,
}

/// The aggregator contract address the original deployment announces
/// auctions from; override with `GAVEL_AGGREGATOR_ADDRESS`.
const DEFAULT_AGGREGATOR: &str = "0xc7Fa3CaEB7d9BAD5C95EDC238f83101D7803B4b2";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url =
            std::env::var("GAVEL_RPC_URL").map_err(|_| ConfigError::Missing("GAVEL_RPC_URL"))?;

        let aggregator_raw = std::env::var("GAVEL_AGGREGATOR_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_AGGREGATOR.to_string());
        let aggregator = Address::parse(&aggregator_raw).map_err(|e| ConfigError::Invalid {
            name: "GAVEL_AGGREGATOR_ADDRESS",
            reason: e.to_string(),
        })?;

        let web_base_url = std::env::var("GAVEL_WEB_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let explorer_url = std::env::var("GAVEL_EXPLORER_URL")
            .unwrap_or_else(|_| "https://sepolia.etherscan.io".to_string());
        let abi_dir = std::env::var("GAVEL_ABI_DIR")
            .map_or_else(|_| PathBuf::from("assets/abi"), PathBuf::from);

        let port = match std::env::var("GAVEL_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "GAVEL_PORT",
                reason: format!("{raw:?} is not a port number"),
            })?,
            Err(_) => 8080,
        };

        Ok(Self {
            rpc_url,
            aggregator,
            web_base_url,
            explorer_url,
            abi_dir,
            port,
        })
    }

    /// Load the ABI descriptor blobs the renderer injects into its page.
    pub fn load_abis(&self) -> Result<AbiBundle, ConfigError> {
        Ok(AbiBundle {
            aggregator: read_abi(&self.abi_dir.join("AuctionAggregator.json"))?,
            erc721: read_abi(&self.abi_dir.join("ERC721.json"))?,
        })
    }
}

/// ABI descriptors, kept as compact JSON text for verbatim page injection.
#[derive(Debug, Clone)]
pub struct AbiBundle {
    pub aggregator: String,
    pub erc721: String,
}

fn read_abi(path: &Path) -> Result<String, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::AbiFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    // Re-serialize so the injected blob is valid, compact JSON whatever the
    // on-disk formatting was.
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| ConfigError::AbiFile {
            path: path.to_path_buf(),
            reason: format!("not valid JSON: {e}"),
        })?;
    serde_json::to_string(&value).map_err(|e| ConfigError::AbiFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
