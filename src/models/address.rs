use serde::{Deserialize, Serialize};

use super::network::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    Wallet,
    Contract,
    #[default]
    Unknown,
}

/// Result of classifying a raw address string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    pub is_valid: bool,
    pub network: Network,
    #[serde(rename = "type")]
    pub kind: AddressKind,
}

impl AddressInfo {
    pub fn invalid() -> Self {
        Self {
            is_valid: false,
            network: Network::default(),
            kind: AddressKind::Unknown,
        }
    }

    /// True when the network was read off the address format itself.
    /// EVM-shaped addresses are shared by several chains, so their network
    /// has to come from the caller.
    pub fn is_positively_classified(&self) -> bool {
        self.is_valid && !self.network.is_evm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_info_json_shape() {
        let info = AddressInfo {
            is_valid: true,
            network: Network::Bitcoin,
            kind: AddressKind::Wallet,
        };
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["network"], "bitcoin");
        assert_eq!(json["type"], "wallet");
    }

    #[test]
    fn test_invalid_is_not_a_classification() {
        let info = AddressInfo::invalid();
        assert!(!info.is_positively_classified());
        assert_eq!(info.network, Network::Ethereum);
    }
}
