use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReputexError;

/// Blockchain networks the service knows how to classify and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Ethereum,
    Binance,
    Polygon,
    Arbitrum,
    Optimism,
    Bitcoin,
    Avalanche,
    Solana,
    Fantom,
    Base,
    Zksync,
    L1x,
}

impl Network {
    pub const ALL: [Network; 12] = [
        Network::Ethereum,
        Network::Binance,
        Network::Polygon,
        Network::Arbitrum,
        Network::Optimism,
        Network::Bitcoin,
        Network::Avalanche,
        Network::Solana,
        Network::Fantom,
        Network::Base,
        Network::Zksync,
        Network::L1x,
    ];

    /// Lowercase identifier used in URLs, storage keys and JSON.
    pub fn id(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Binance => "binance",
            Network::Polygon => "polygon",
            Network::Arbitrum => "arbitrum",
            Network::Optimism => "optimism",
            Network::Bitcoin => "bitcoin",
            Network::Avalanche => "avalanche",
            Network::Solana => "solana",
            Network::Fantom => "fantom",
            Network::Base => "base",
            Network::Zksync => "zksync",
            Network::L1x => "l1x",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Network::Ethereum => "Ethereum",
            Network::Binance => "BNB Chain",
            Network::Polygon => "Polygon",
            Network::Arbitrum => "Arbitrum",
            Network::Optimism => "Optimism",
            Network::Bitcoin => "Bitcoin",
            Network::Avalanche => "Avalanche",
            Network::Solana => "Solana",
            Network::Fantom => "Fantom",
            Network::Base => "Base",
            Network::Zksync => "zkSync",
            Network::L1x => "L1X",
        }
    }

    /// Networks sharing the `0x` + 40 hex address format.
    pub fn is_evm(&self) -> bool {
        !matches!(self, Network::Bitcoin | Network::Solana | Network::L1x)
    }

    /// Public explorer page for an address, when the network has one.
    pub fn explorer_address_url(&self, address: &str) -> Option<String> {
        let base = match self {
            Network::Ethereum => "https://etherscan.io/address/",
            Network::Binance => "https://bscscan.com/address/",
            Network::Polygon => "https://polygonscan.com/address/",
            Network::Arbitrum => "https://arbiscan.io/address/",
            Network::Optimism => "https://optimistic.etherscan.io/address/",
            Network::Bitcoin => "https://mempool.space/address/",
            Network::Avalanche => "https://snowscan.xyz/address/",
            Network::Solana => "https://solscan.io/account/",
            Network::Fantom => "https://ftmscan.com/address/",
            Network::Base => "https://basescan.org/address/",
            Network::Zksync => "https://explorer.zksync.io/address/",
            Network::L1x => return None,
        };
        Some(format!("{}{}", base, address))
    }

    /// Platform id CoinGecko uses for contract lookups.
    pub fn coingecko_platform(&self) -> Option<&'static str> {
        match self {
            Network::Ethereum => Some("ethereum"),
            Network::Binance => Some("binance-smart-chain"),
            Network::Polygon => Some("polygon-pos"),
            Network::Arbitrum => Some("arbitrum-one"),
            Network::Optimism => Some("optimistic-ethereum"),
            Network::Avalanche => Some("avalanche"),
            Network::Solana => Some("solana"),
            Network::Fantom => Some("fantom"),
            Network::Base => Some("base"),
            Network::Zksync => Some("zksync"),
            Network::Bitcoin | Network::L1x => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Network {
    type Err = ReputexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Network::ALL
            .iter()
            .copied()
            .find(|n| n.id() == wanted)
            .ok_or_else(|| ReputexError::UnknownNetwork(s.to_string()))
    }
}
