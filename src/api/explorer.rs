//! Client for Etherscan-compatible block explorer APIs.
//!
//! One client per EVM network (Etherscan, BscScan, PolygonScan, ...). All of
//! them share the `?module=..&action=..` query layout.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ReputexError;
use crate::models::{TokenProfile, WalletActivity};

// --- Response Structs ---

/// Envelope used by the `account` and `token` modules.
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    message: String,
    result: Value,
}

/// Envelope used by the `proxy` module (plain JSON-RPC).
#[derive(Debug, Deserialize)]
struct ProxyResponse {
    result: Option<Value>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplorerTransaction {
    time_stamp: String, // Unix seconds, as a string
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplorerTokenInfo {
    #[serde(alias = "name")]
    token_name: Option<String>,
    symbol: Option<String>,
    total_supply: Option<String>,
    #[serde(alias = "price", alias = "tokenPriceUSD")]
    token_price_usd: Option<String>,
}

fn parse_decimal(value: Option<&String>) -> Option<f64> {
    value
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

#[derive(Debug, Clone)]
pub struct ExplorerClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl ExplorerClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            // The URL carries the api key
            .map_err(|e| e.without_url())
            .context("Failed to send request to explorer API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ReputexError::ExplorerError(format!("{} - {}", status, error_text)).into());
        }
        Ok(response)
    }

    /// Deployed bytecode at `address` ("0x" for externally owned accounts).
    pub async fn get_code(&self, address: &str) -> Result<String> {
        debug!("Fetching code for {} from {}", address, self.base_url);
        let response = self
            .query(&[
                ("module", "proxy"),
                ("action", "eth_getCode"),
                ("address", address),
                ("tag", "latest"),
            ])
            .await?;

        let body: ProxyResponse = response
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to parse eth_getCode response")?;

        match (body.result, body.error) {
            (Some(Value::String(code)), _) if code.starts_with("0x") => Ok(code),
            (_, Some(error)) => Err(ReputexError::ExplorerError(format!("eth_getCode failed: {}", error)).into()),
            (result, _) => Err(ReputexError::ExplorerError(format!(
                "Unexpected eth_getCode result: {:?}",
                result
            ))
            .into()),
        }
    }

    pub async fn has_code(&self, address: &str) -> Result<bool> {
        let code = self.get_code(address).await?;
        Ok(code.len() > 2)
    }

    /// Transaction count and age based on the normal transaction list.
    pub async fn get_wallet_activity(&self, address: &str) -> Result<WalletActivity> {
        let response = self
            .query(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("sort", "asc"),
            ])
            .await?;

        let body: ExplorerResponse = response
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to parse txlist response")?;

        // "No transactions found" comes back as status 0 with an empty list
        let transactions: Vec<ExplorerTransaction> = match body.result {
            Value::Array(_) => serde_json::from_value(body.result).context("Malformed txlist entries")?,
            other => {
                return Err(ReputexError::ExplorerError(format!(
                    "txlist failed ({} {}): {}",
                    body.status, body.message, other
                ))
                .into())
            }
        };

        let first_seen = transactions
            .first()
            .and_then(|tx| tx.time_stamp.parse::<i64>().ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Ok(WalletActivity::from_first_seen(transactions.len() as u64, first_seen))
    }

    /// Token metadata for a contract, `None` when the explorer has none.
    pub async fn get_token_info(&self, address: &str) -> Result<Option<TokenProfile>> {
        let response = self
            .query(&[
                ("module", "token"),
                ("action", "tokeninfo"),
                ("contractaddress", address),
            ])
            .await?;

        let body: ExplorerResponse = response
            .json()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to parse tokeninfo response")?;

        if body.status != "1" {
            debug!("Explorer has no token info for {}: {}", address, body.message);
            return Ok(None);
        }

        let infos: Vec<ExplorerTokenInfo> = match serde_json::from_value(body.result) {
            Ok(infos) => infos,
            Err(e) => {
                warn!("Failed to parse tokeninfo entries for {}: {:?}; ignoring", address, e);
                return Ok(None);
            }
        };

        Ok(infos.into_iter().next().map(|info| {
            let price = parse_decimal(info.token_price_usd.as_ref());
            let supply = parse_decimal(info.total_supply.as_ref());
            TokenProfile {
                token_name: info.token_name,
                symbol: info.symbol,
                price_usd: price,
                market_cap_usd: price.zip(supply).map(|(p, s)| p * s),
                liquidity: None,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const ADDRESS: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";

    #[tokio::test]
    async fn test_has_code_for_contract_and_wallet() {
        let mut server = mockito::Server::new_async().await;
        let contract = server
            .mock("GET", "/api")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("action".into(), "eth_getCode".into()),
                Matcher::UrlEncoded("address".into(), "0xcontract".into()),
                Matcher::UrlEncoded("apikey".into(), "key".into()),
            ]))
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x6080604052"}"#)
            .create_async()
            .await;
        let wallet = server
            .mock("GET", "/api")
            .match_query(Matcher::UrlEncoded("address".into(), "0xwallet".into()))
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x"}"#)
            .create_async()
            .await;

        let client = ExplorerClient::new(&format!("{}/api", server.url()), "key");
        assert!(client.has_code("0xcontract").await.unwrap());
        assert!(!client.has_code("0xwallet").await.unwrap());
        contract.assert_async().await;
        wallet.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_code_rejects_error_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .match_query(Matcher::Any)
            .with_body(r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#)
            .create_async()
            .await;

        let client = ExplorerClient::new(&format!("{}/api", server.url()), "bad");
        assert!(client.get_code(ADDRESS).await.is_err());
    }

    #[tokio::test]
    async fn test_http_failure_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let client = ExplorerClient::new(&format!("{}/api", server.url()), "key");
        assert!(client.has_code(ADDRESS).await.is_err());
    }

    #[tokio::test]
    async fn test_api_key_stays_out_of_errors() {
        let client = ExplorerClient::new("http://127.0.0.1:9/api", "SUPERSECRETKEY");
        let err = client.has_code(ADDRESS).await.unwrap_err();
        assert!(!format!("{:?}", err).contains("SUPERSECRETKEY"));

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .match_query(Matcher::Any)
            .with_body("<html>rate limited</html>")
            .create_async()
            .await;
        let client = ExplorerClient::new(&format!("{}/api", server.url()), "SUPERSECRETKEY");
        let err = client.get_wallet_activity(ADDRESS).await.unwrap_err();
        assert!(!format!("{:?}", err).contains("SUPERSECRETKEY"));
    }

    #[tokio::test]
    async fn test_wallet_activity() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .match_query(Matcher::UrlEncoded("action".into(), "txlist".into()))
            .with_body(
                r#"{"status":"1","message":"OK","result":[
                    {"timeStamp":"1438269973","hash":"0x1"},
                    {"timeStamp":"1438270000","hash":"0x2"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = ExplorerClient::new(&format!("{}/api", server.url()), "key");
        let activity = client.get_wallet_activity(ADDRESS).await.unwrap();
        assert_eq!(activity.transaction_count, 2);
        assert_eq!(activity.first_seen.unwrap().timestamp(), 1438269973);
        assert!(activity.wallet_age_years >= 9);
    }

    #[tokio::test]
    async fn test_wallet_activity_without_transactions() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .match_query(Matcher::Any)
            .with_body(r#"{"status":"0","message":"No transactions found","result":[]}"#)
            .create_async()
            .await;

        let client = ExplorerClient::new(&format!("{}/api", server.url()), "key");
        let activity = client.get_wallet_activity(ADDRESS).await.unwrap();
        assert_eq!(activity, WalletActivity::default());
    }

    #[tokio::test]
    async fn test_token_info() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .match_query(Matcher::UrlEncoded("action".into(), "tokeninfo".into()))
            .with_body(
                r#"{"status":"1","message":"OK","result":[
                    {"tokenName":"Tether USD","symbol":"USDT","totalSupply":"1000","tokenPriceUSD":"1.0"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = ExplorerClient::new(&format!("{}/api", server.url()), "key");
        let profile = client.get_token_info(ADDRESS).await.unwrap().unwrap();
        assert_eq!(profile.token_name.as_deref(), Some("Tether USD"));
        assert_eq!(profile.symbol.as_deref(), Some("USDT"));
        assert_eq!(profile.market_cap_usd, Some(1000.0));
    }

    #[tokio::test]
    async fn test_token_info_not_available() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .match_query(Matcher::Any)
            .with_body(r#"{"status":"0","message":"NOTOK","result":"API Pro endpoint"}"#)
            .create_async()
            .await;

        let client = ExplorerClient::new(&format!("{}/api", server.url()), "key");
        assert!(client.get_token_info(ADDRESS).await.unwrap().is_none());
    }
}
