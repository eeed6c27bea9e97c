//! Routes per-network lookups to the right backend.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::coingecko::CoinGeckoClient;
use super::explorer::ExplorerClient;
use crate::address::AccountInspector;
use crate::analysis::SignalSource;
use crate::error::ReputexError;
use crate::models::{Network, TokenProfile, WalletActivity};
use crate::solana::SolanaClient;

pub struct ChainDataClient {
    explorers: HashMap<Network, ExplorerClient>,
    solana: Option<SolanaClient>,
    coingecko: CoinGeckoClient,
}

impl ChainDataClient {
    pub fn new(coingecko: CoinGeckoClient) -> Self {
        Self {
            explorers: HashMap::new(),
            solana: None,
            coingecko,
        }
    }

    pub fn with_explorer(mut self, network: Network, explorer: ExplorerClient) -> Self {
        self.explorers.insert(network, explorer);
        self
    }

    pub fn with_solana(mut self, solana: SolanaClient) -> Self {
        self.solana = Some(solana);
        self
    }

    fn explorer(&self, network: Network) -> Result<&ExplorerClient> {
        self.explorers.get(&network).ok_or_else(|| {
            ReputexError::Unsupported(format!("No explorer configured for {}", network.display_name())).into()
        })
    }

    fn solana(&self) -> Result<&SolanaClient> {
        self.solana
            .as_ref()
            .ok_or_else(|| ReputexError::Unsupported("No Solana RPC configured".to_string()).into())
    }
}

#[async_trait]
impl AccountInspector for ChainDataClient {
    async fn has_code(&self, address: &str, network: Network) -> Result<bool> {
        match network {
            Network::Bitcoin => Ok(false),
            Network::Solana => self.solana()?.is_program_or_token(address).await,
            Network::L1x => Err(ReputexError::Unsupported("L1X account inspection".to_string()).into()),
            evm => self.explorer(evm)?.has_code(address).await,
        }
    }
}

#[async_trait]
impl SignalSource for ChainDataClient {
    async fn wallet_activity(&self, address: &str, network: Network) -> Result<WalletActivity> {
        match network {
            Network::Solana => self.solana()?.get_wallet_activity(address).await,
            Network::Bitcoin | Network::L1x => Err(ReputexError::Unsupported(format!(
                "Activity lookup on {}",
                network.display_name()
            ))
            .into()),
            evm => self.explorer(evm)?.get_wallet_activity(address).await,
        }
    }

    async fn token_profile(&self, address: &str, network: Network) -> Result<Option<TokenProfile>> {
        if let Some(explorer) = self.explorers.get(&network) {
            match explorer.get_token_info(address).await {
                Ok(Some(profile)) => return Ok(Some(profile)),
                Ok(None) => debug!("No explorer token info for {}, trying CoinGecko", address),
                Err(e) => warn!("Explorer token lookup failed for {}: {:?}; trying CoinGecko", address, e),
            }
        }
        self.coingecko.get_token_profile(address, network).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const ADDRESS: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";

    #[tokio::test]
    async fn test_bitcoin_is_never_code() {
        let client = ChainDataClient::new(CoinGeckoClient::new("http://127.0.0.1:9"));
        let has_code = tokio_test::assert_ok!(
            client
                .has_code("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", Network::Bitcoin)
                .await
        );
        assert!(!has_code);
    }

    #[tokio::test]
    async fn test_unconfigured_networks_are_unsupported() {
        let client = ChainDataClient::new(CoinGeckoClient::new("http://127.0.0.1:9"));
        tokio_test::assert_err!(client.has_code(ADDRESS, Network::Polygon).await);
        tokio_test::assert_err!(client.has_code("7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV", Network::Solana).await);
        tokio_test::assert_err!(client.wallet_activity(ADDRESS, Network::L1x).await);
    }

    #[tokio::test]
    async fn test_evm_lookups_use_the_network_explorer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api")
            .match_query(Matcher::UrlEncoded("action".into(), "eth_getCode".into()))
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x60806040"}"#)
            .create_async()
            .await;

        let client = ChainDataClient::new(CoinGeckoClient::new("http://127.0.0.1:9"))
            .with_explorer(Network::Arbitrum, ExplorerClient::new(&format!("{}/api", server.url()), "key"));

        assert!(client.has_code(ADDRESS, Network::Arbitrum).await.unwrap());
        tokio_test::assert_err!(client.has_code(ADDRESS, Network::Ethereum).await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_profile_falls_back_to_coingecko() {
        let mut explorer = mockito::Server::new_async().await;
        explorer
            .mock("GET", "/api")
            .match_query(Matcher::Any)
            .with_body(r#"{"status":"0","message":"NOTOK","result":"API Pro endpoint"}"#)
            .create_async()
            .await;

        let mut coingecko = mockito::Server::new_async().await;
        let fallback = coingecko
            .mock("GET", format!("/coins/ethereum/contract/{}", ADDRESS).as_str())
            .with_body(r#"{"name":"Defiant","symbol":"dfn"}"#)
            .create_async()
            .await;

        let client = ChainDataClient::new(CoinGeckoClient::new(&coingecko.url()))
            .with_explorer(Network::Ethereum, ExplorerClient::new(&format!("{}/api", explorer.url()), "key"));

        let profile = client.token_profile(ADDRESS, Network::Ethereum).await.unwrap().unwrap();
        assert_eq!(profile.token_name.as_deref(), Some("Defiant"));
        assert_eq!(profile.symbol.as_deref(), Some("DFN"));
        fallback.assert_async().await;
    }
}
