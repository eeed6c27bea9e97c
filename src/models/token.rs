use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-chain activity summary for an address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletActivity {
    pub transaction_count: u64,
    pub first_seen: Option<DateTime<Utc>>, // Time of the oldest known transaction
    pub wallet_age_days: i64,
    pub wallet_age_years: i64,
}

impl WalletActivity {
    pub fn from_first_seen(transaction_count: u64, first_seen: Option<DateTime<Utc>>) -> Self {
        let wallet_age_days = first_seen
            .map(|t| Utc::now().signed_duration_since(t).num_days().max(0))
            .unwrap_or(0);
        Self {
            transaction_count,
            first_seen,
            wallet_age_days,
            wallet_age_years: wallet_age_days / 365,
        }
    }
}

/// Token metadata for contract addresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProfile {
    pub token_name: Option<String>,
    pub symbol: Option<String>,
    pub price_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub liquidity: Option<f64>, // Not reported by most explorers
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_wallet_age_from_first_seen() {
        let activity = WalletActivity::from_first_seen(12, Some(Utc::now() - Duration::days(800)));
        assert_eq!(activity.wallet_age_days, 800);
        assert_eq!(activity.wallet_age_years, 2);

        let empty = WalletActivity::from_first_seen(0, None);
        assert_eq!(empty, WalletActivity::default());
    }
}
