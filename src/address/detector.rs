//! Synchronous address classification.
//!
//! Matches a raw string against the known address shapes, in order. The
//! first match wins; an address that matches nothing is invalid.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{AddressInfo, AddressKind, Network};

/// Address shapes recognised by `detect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressShape {
    Bitcoin,
    Solana,
    L1x,
    Evm,
}

lazy_static! {
    static ref ADDRESS_PATTERNS: Vec<(AddressShape, Regex)> = vec![
        (
            AddressShape::Bitcoin,
            Regex::new(r"^(bc1|[13])[a-zA-HJ-NP-Z0-9]{25,39}$").unwrap(),
        ),
        (
            AddressShape::Solana,
            Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").unwrap(),
        ),
        (AddressShape::L1x, Regex::new(r"^L1[a-zA-Z0-9]{38}$").unwrap()),
        (AddressShape::Evm, Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap()),
    ];
}

fn match_shape(address: &str) -> Option<AddressShape> {
    ADDRESS_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(address))
        .map(|(shape, _)| *shape)
}

/// Classify an address without touching the network.
///
/// Total over all strings and free of side effects. For EVM-shaped addresses
/// the returned network is only the default; the caller supplies the chain.
pub fn detect(address: &str) -> AddressInfo {
    if address.is_empty() {
        return AddressInfo::invalid();
    }

    let (network, kind) = match match_shape(address) {
        // No contracts on bitcoin in this model
        Some(AddressShape::Bitcoin) => (Network::Bitcoin, AddressKind::Wallet),
        Some(AddressShape::Solana) => (Network::Solana, AddressKind::Unknown),
        Some(AddressShape::L1x) => (Network::L1x, AddressKind::Unknown),
        Some(AddressShape::Evm) => (Network::default(), AddressKind::Unknown),
        None => return AddressInfo::invalid(),
    };

    AddressInfo {
        is_valid: true,
        network,
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVM_ADDRESS: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";

    #[test]
    fn test_empty_is_invalid() {
        let info = detect("");
        assert!(!info.is_valid);
        assert_eq!(info.kind, AddressKind::Unknown);
    }

    #[test]
    fn test_evm_shape_is_valid_but_ambiguous() {
        let info = detect(EVM_ADDRESS);
        assert!(info.is_valid);
        assert_eq!(info.kind, AddressKind::Unknown);
        assert!(!info.is_positively_classified());
    }

    #[test]
    fn test_evm_needs_exactly_forty_hex_digits() {
        // 39 hex digits
        let info = detect("0x71C7656EC7ab88b098defB751B7401B5f6d8976");
        assert!(!info.is_valid);
        assert_eq!(info.kind, AddressKind::Unknown);

        assert!(!detect(&format!("{}0", EVM_ADDRESS)).is_valid);
    }

    #[test]
    fn test_bitcoin_addresses_are_wallets() {
        for address in [
            "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
            "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy",
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq",
        ] {
            let info = detect(address);
            assert!(info.is_valid, "{} should be valid", address);
            assert_eq!(info.network, Network::Bitcoin);
            assert_eq!(info.kind, AddressKind::Wallet);
        }
    }

    #[test]
    fn test_solana_address() {
        let info = detect("7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV");
        assert!(info.is_valid);
        assert_eq!(info.network, Network::Solana);
        assert_eq!(info.kind, AddressKind::Unknown);
    }

    #[test]
    fn test_l1x_address() {
        let address = format!("L1{}", "a0".repeat(19));
        let info = detect(&address);
        assert!(info.is_valid);
        assert_eq!(info.network, Network::L1x);
        assert_eq!(info.kind, AddressKind::Unknown);
    }

    #[test]
    fn test_earlier_pattern_wins_on_overlap() {
        // Pure base58 with the L1 prefix is also a Solana shape
        let address = format!("L1{}", "ab".repeat(19));
        assert_eq!(detect(&address).network, Network::Solana);
    }

    #[test]
    fn test_garbage_is_invalid() {
        for address in [
            "hello",
            "0x1234",
            "0xgggggggggggggggggggggggggggggggggggggggg",
            " 0x71C7656EC7ab88b098defB751B7401B5f6d8976F",
        ] {
            assert!(!detect(address).is_valid, "{} should be invalid", address);
        }
    }

    #[test]
    fn test_detect_is_deterministic() {
        for address in [EVM_ADDRESS, "", "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq", "nope"] {
            assert_eq!(detect(address), detect(address));
        }
    }
}
