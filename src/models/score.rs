use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized sub-scores for one assessed address. Every value is in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    pub trust_score: u8,
    pub developer_score: u8,
    pub liquidity_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_distribution: Option<u8>,
    /// Raw fraud risk, higher is worse. Use `fraud_safety` for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraud_risk: Option<u8>,
}

impl ScoreSet {
    /// Inverted fraud view shown to users (higher is safer).
    pub fn fraud_safety(&self) -> Option<u8> {
        self.fraud_risk.map(|risk| 100 - risk.min(100))
    }

    /// Present scores where higher means more trustworthy. Fraud risk has the
    /// opposite polarity and is left out.
    pub fn reputation_scores(&self) -> Vec<u8> {
        let mut scores = vec![self.trust_score, self.developer_score, self.liquidity_score];
        scores.extend(self.community_score);
        scores.extend(self.holder_distribution);
        scores
    }
}

/// Three-level legitimacy classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Likely Legit")]
    LikelyLegit,
    #[serde(rename = "Likely Risky")]
    LikelyRisky,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::LikelyLegit => "Likely Legit",
            Verdict::LikelyRisky => "Likely Risky",
            Verdict::HighRisk => "High Risk",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
