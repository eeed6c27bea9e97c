use anyhow::Result;
use chrono::{DateTime, Utc};
use solana_client::{client_error::ClientErrorKind, rpc_client::RpcClient};
use solana_sdk::{account::Account, commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::{str::FromStr, sync::Arc};
use tracing::{debug, error};

use crate::error::ReputexError;
use crate::models::WalletActivity;

/// SPL Token and Token-2022 program ids. Mint accounts owned by these are
/// the Solana equivalent of token contracts.
const TOKEN_PROGRAM_IDS: [&str; 2] = [
    "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
    "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb",
];

/// True for executable program accounts and token mints.
pub fn account_holds_code(account: &Account) -> bool {
    if account.executable {
        return true;
    }
    let owner = account.owner.to_string();
    TOKEN_PROGRAM_IDS.contains(&owner.as_str())
}

fn parse_pubkey(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address)
        .map_err(|_| ReputexError::InvalidAddress(format!("Not a Solana address: {}", address)).into())
}

#[derive(Clone)]
pub struct SolanaClient {
    rpc_client: Arc<RpcClient>,
}

impl SolanaClient {
    pub fn new(rpc_url: &str) -> Self {
        let rpc_client = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed());
        Self {
            rpc_client: Arc::new(rpc_client),
        }
    }

    // Runs a blocking RPC call on the blocking pool
    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(Arc<RpcClient>) -> solana_client::client_error::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.rpc_client.clone();
        let result = tokio::task::spawn_blocking(move || f(client))
            .await?
            .map_err(|e| {
                // RPC URLs often embed a provider key
                let message = match e.kind {
                    ClientErrorKind::Reqwest(err) => err.without_url().to_string(),
                    other => other.to_string(),
                };
                error!("Solana RPC client error: {}", message);
                ReputexError::SolanaError(format!("RPC Client Error: {}", message))
            })?;
        Ok(result)
    }

    /// Account at `pubkey`, `None` if it was never created.
    pub async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>> {
        let pubkey = *pubkey;
        let response = self
            .run_blocking(move |client| {
                client.get_account_with_commitment(&pubkey, CommitmentConfig::confirmed())
            })
            .await?;
        Ok(response.value)
    }

    pub async fn is_program_or_token(&self, address: &str) -> Result<bool> {
        let pubkey = parse_pubkey(address)?;
        let holds_code = self
            .get_account(&pubkey)
            .await?
            .map(|account| account_holds_code(&account))
            .unwrap_or(false);
        debug!("Solana account {} holds code: {}", address, holds_code);
        Ok(holds_code)
    }

    /// Activity from the most recent signatures (the RPC caps the page at
    /// 1000, so counts above that are a floor).
    pub async fn get_wallet_activity(&self, address: &str) -> Result<WalletActivity> {
        let pubkey = parse_pubkey(address)?;
        let signatures = self
            .run_blocking(move |client| client.get_signatures_for_address(&pubkey))
            .await?;

        // Newest first, so the oldest known signature is last
        let first_seen = signatures
            .last()
            .and_then(|s| s.block_time)
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Ok(WalletActivity::from_first_seen(signatures.len() as u64, first_seen))
    }
}
