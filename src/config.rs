use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::api::{COINGECKO_BASE_URL, GEMINI_BASE_URL};
use crate::error::ReputexError;
use crate::models::Network;
use crate::scoring::VerdictThresholds;
use crate::storage::MAX_HISTORY_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Json,
    Memory,
    Sled,
}

impl StoreBackend {
    pub fn default_path(&self) -> Option<PathBuf> {
        match self {
            StoreBackend::Json => Some(PathBuf::from("data/assessments.json")),
            StoreBackend::Sled => Some(PathBuf::from("data/assessments.sled")),
            StoreBackend::Memory => None,
        }
    }
}

impl FromStr for StoreBackend {
    type Err = ReputexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(StoreBackend::Json),
            "memory" => Ok(StoreBackend::Memory),
            "sled" => Ok(StoreBackend::Sled),
            other => Err(ReputexError::ConfigError(format!("Unknown STORE_BACKEND: {}", other))),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExplorerConfig {
    pub network: Network,
    pub api_url: String,
    pub api_key: String,
}

/// Env prefix and default endpoint of the Etherscan-family explorer for
/// each EVM network.
fn explorer_defaults(network: Network) -> Option<(&'static str, &'static str)> {
    match network {
        Network::Ethereum => Some(("ETHERSCAN", "https://api.etherscan.io/api")),
        Network::Binance => Some(("BSCSCAN", "https://api.bscscan.com/api")),
        Network::Polygon => Some(("POLYGONSCAN", "https://api.polygonscan.com/api")),
        Network::Arbitrum => Some(("ARBISCAN", "https://api.arbiscan.io/api")),
        Network::Optimism => Some(("OPTIMISM", "https://api-optimistic.etherscan.io/api")),
        Network::Avalanche => Some(("SNOWSCAN", "https://api.snowscan.xyz/api")),
        Network::Fantom => Some(("FTMSCAN", "https://api.ftmscan.com/api")),
        Network::Base => Some(("BASESCAN", "https://api.basescan.org/api")),
        Network::Zksync => Some(("ZKSYNC", "https://block-explorer-api.mainnet.zksync.io/api")),
        Network::Bitcoin | Network::Solana | Network::L1x => None,
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub api_host: String,
    pub api_port: u16,

    pub store_backend: StoreBackend,
    pub store_path: Option<PathBuf>,
    pub history_limit: usize,
    // History rows kept by the json and memory stores
    pub history_retention: usize,

    // Only networks with an API key get an explorer
    pub explorers: Vec<ExplorerConfig>,
    pub solana_rpc_url: Option<String>,
    pub coingecko_api_url: String,

    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,

    pub thresholds: VerdictThresholds,
    pub score_fallback_fill: Option<u8>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store_backend: StoreBackend = match var("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackend::Json,
        };
        let store_path = var("STORE_PATH")
            .map(PathBuf::from)
            .or_else(|| store_backend.default_path());

        let explorers = Network::ALL
            .iter()
            .filter_map(|network| {
                let (prefix, default_url) = explorer_defaults(*network)?;
                let api_key = var(&format!("{}_API_KEY", prefix))?;
                Some(ExplorerConfig {
                    network: *network,
                    api_url: var(&format!("{}_API_URL", prefix)).unwrap_or_else(|| default_url.to_string()),
                    api_key,
                })
            })
            .collect();

        let defaults = VerdictThresholds::default();
        let thresholds = VerdictThresholds {
            high_risk_fraud: parse_or(var("HIGH_RISK_FRAUD_THRESHOLD"), "HIGH_RISK_FRAUD_THRESHOLD", defaults.high_risk_fraud)?,
            risky_fraud: parse_or(var("RISKY_FRAUD_THRESHOLD"), "RISKY_FRAUD_THRESHOLD", defaults.risky_fraud)?,
            low_score: parse_or(var("LOW_SCORE_THRESHOLD"), "LOW_SCORE_THRESHOLD", defaults.low_score)?,
        };

        let score_fallback_fill = var("SCORE_FALLBACK_FILL")
            .map(|v| v.parse::<u8>().context("Failed to parse SCORE_FALLBACK_FILL"))
            .transpose()?;

        Ok(Self {
            api_host: var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port: parse_or(var("API_PORT"), "API_PORT", 3000)?,

            store_backend,
            store_path,
            history_limit: parse_or(var("HISTORY_LIMIT"), "HISTORY_LIMIT", 50)?,
            history_retention: parse_or(var("HISTORY_RETENTION"), "HISTORY_RETENTION", MAX_HISTORY_SIZE)?,

            explorers,
            solana_rpc_url: var("SOLANA_RPC_URL"),
            coingecko_api_url: var("COINGECKO_API_URL").unwrap_or_else(|| COINGECKO_BASE_URL.to_string()),

            gemini_api_key: var("GEMINI_API_KEY").context("GEMINI_API_KEY not set in environment")?,
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.0-pro".to_string()),
            gemini_api_url: var("GEMINI_API_URL").unwrap_or_else(|| GEMINI_BASE_URL.to_string()),

            thresholds,
            score_fallback_fill,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v.parse().with_context(|| format!("Failed to parse {}", key)),
        None => Ok(default),
    }
}
