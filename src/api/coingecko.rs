use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ReputexError;
use crate::models::{Network, TokenProfile};

pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

// --- Response Structs ---

#[derive(Debug, Deserialize)]
struct CoinResponse {
    name: Option<String>,
    symbol: Option<String>,
    market_data: Option<MarketData>,
    liquidity_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarketData {
    market_cap: Option<UsdValue>,
    current_price: Option<UsdValue>,
}

#[derive(Debug, Deserialize)]
struct UsdValue {
    usd: Option<f64>,
}

/// Token metadata fallback for contracts the explorer does not describe.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: Client,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub async fn get_token_profile(&self, address: &str, network: Network) -> Result<Option<TokenProfile>> {
        let Some(platform) = network.coingecko_platform() else {
            return Ok(None);
        };
        let url = format!("{}/coins/{}/contract/{}", self.base_url, platform, address);
        debug!("Fetching token profile from CoinGecko: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to CoinGecko")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            warn!("CoinGecko does not list {} on {}", address, network);
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ReputexError::ApiError(format!("CoinGecko {} - {}", status, error_text)).into());
        }

        let coin: CoinResponse = response
            .json()
            .await
            .context("Failed to parse CoinGecko contract response")?;

        let usd = |value: Option<&UsdValue>| value.and_then(|v| v.usd);
        let market = coin.market_data.as_ref();
        Ok(Some(TokenProfile {
            token_name: coin.name,
            symbol: coin.symbol.map(|s| s.to_uppercase()),
            price_usd: usd(market.and_then(|m| m.current_price.as_ref())),
            market_cap_usd: usd(market.and_then(|m| m.market_cap.as_ref())),
            liquidity: coin.liquidity_score,
        }))
    }
}
