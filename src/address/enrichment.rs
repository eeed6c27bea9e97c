//! Best-effort wallet/contract refinement.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::detector::detect;
use crate::models::{AddressKind, Network};

/// Answers whether an address holds code (EVM) or is a program/token
/// account (Solana) on a given network.
#[async_trait]
pub trait AccountInspector: Send + Sync {
    async fn has_code(&self, address: &str, network: Network) -> Result<bool>;
}

/// Refine the wallet/contract kind of an already chosen (address, network).
///
/// Makes a single attempt and never fails: whatever goes wrong with the
/// inspector degrades to `AddressKind::Unknown`.
pub async fn refine(
    address: &str,
    network: Network,
    inspector: &dyn AccountInspector,
) -> AddressKind {
    let info = detect(address);
    if !info.is_valid {
        return AddressKind::Unknown;
    }
    if network == Network::Bitcoin {
        return AddressKind::Wallet;
    }

    match inspector.has_code(address, network).await {
        Ok(true) => {
            debug!("{} on {} holds code", address, network);
            AddressKind::Contract
        }
        Ok(false) => AddressKind::Wallet,
        Err(e) => {
            warn!("Could not refine address kind for {} on {}: {:?}", address, network, e);
            AddressKind::Unknown
        }
    }
}
