//! Signal collection and the reputation pipeline.

pub mod service;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::models::{AddressKind, Network, TokenProfile, WalletActivity};
use crate::scoring::SignalMap;

pub use service::{AssessmentOutcome, ReputationService};

/// Everything collected about an address before it is scored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub address: String,
    pub network: Network,
    pub address_type: AddressKind,
    #[serde(flatten)]
    pub activity: WalletActivity,
    #[serde(flatten)]
    pub token: TokenProfile,
}

/// On-chain data for an address.
#[async_trait]
pub trait SignalSource: Send + Sync {
    async fn wallet_activity(&self, address: &str, network: Network) -> Result<WalletActivity>;

    /// Token metadata, `None` when no provider knows the contract.
    async fn token_profile(&self, address: &str, network: Network) -> Result<Option<TokenProfile>>;
}

/// Upstream analysis that turns collected data into a raw signal bundle.
#[async_trait]
pub trait ReputationModel: Send + Sync {
    async fn assess(&self, input: &AnalysisInput) -> Result<SignalMap>;
}
