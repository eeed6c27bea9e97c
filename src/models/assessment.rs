use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::AddressKind;
use super::network::Network;
use super::score::{ScoreSet, Verdict};

/// The persisted unit: one per (address, network) pair, replaced wholesale
/// on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub address: String,
    pub network: Network,
    /// Kind after on-chain refinement, so cached reads report it too.
    #[serde(default)]
    pub address_type: AddressKind,
    #[serde(flatten)]
    pub scores: ScoreSet,
    pub verdict: Verdict,
    /// Category string supplied by the upstream analysis, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_category: Option<String>,
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub checks_passed: u32,
    pub total_checks: u32,
    pub timestamp: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn with_token(mut self, token_name: Option<String>, symbol: Option<String>) -> Self {
        self.token_name = token_name;
        self.symbol = symbol;
        self
    }

    pub fn with_address_type(mut self, address_type: AddressKind) -> Self {
        self.address_type = address_type;
        self
    }

    pub fn with_risk_category(mut self, risk_category: Option<String>) -> Self {
        self.risk_category = risk_category;
        self
    }

    pub fn storage_key(&self) -> String {
        storage_key(&self.address, self.network)
    }

    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            address: self.address.clone(),
            network: self.network,
            trust_score: self.scores.trust_score,
            timestamp: self.timestamp,
            token_name: self.token_name.clone(),
            symbol: self.symbol.clone(),
        }
    }
}

/// Lightweight row of the append-only history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub address: String,
    pub network: Network,
    pub trust_score: u8,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Key for an (address, network) pair. Hex addresses are case-insensitive
/// and get lower-cased; base58/bech32 addresses are case-sensitive and are
/// kept as given.
pub fn storage_key(address: &str, network: Network) -> String {
    let address = address.trim();
    let address = if address.starts_with("0x") || address.starts_with("0X") {
        address.to_lowercase()
    } else {
        address.to_string()
    };
    format!("{}:{}", network.id(), address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_lowercases_hex_only() {
        assert_eq!(
            storage_key("0xABCdef0000000000000000000000000000000001", Network::Base),
            "base:0xabcdef0000000000000000000000000000000001"
        );
        assert_eq!(
            storage_key("So11111111111111111111111111111111111111112", Network::Solana),
            "solana:So11111111111111111111111111111111111111112"
        );
    }
}
