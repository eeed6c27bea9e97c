//! Verdict derivation.
//!
//! An explicit risk category from upstream analysis takes precedence when it
//! is recognised; otherwise the verdict is computed from the score set.

use serde::{Deserialize, Serialize};

use crate::models::{ScoreSet, Verdict};

/// Cut-offs used by the computed verdict path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictThresholds {
    /// Fraud risk strictly above this is High Risk.
    pub high_risk_fraud: u8,
    /// Fraud risk strictly above this is at least Likely Risky.
    pub risky_fraud: u8,
    /// Scores strictly below this count as weak.
    pub low_score: u8,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            high_risk_fraud: 80,
            risky_fraud: 60,
            low_score: 50,
        }
    }
}

impl VerdictThresholds {
    pub fn derive(&self, scores: &ScoreSet, explicit_category: Option<&str>) -> Verdict {
        if let Some(verdict) = explicit_category.and_then(map_category) {
            return verdict;
        }
        self.compute(scores)
    }

    fn compute(&self, scores: &ScoreSet) -> Verdict {
        let considered = scores.reputation_scores();
        let total = considered.len();
        let below = considered.iter().filter(|s| **s < self.low_score).count();
        let fraud_risk = scores.fraud_risk.unwrap_or(0);

        // below > total / 2 without losing the half
        if fraud_risk > self.high_risk_fraud || below * 2 > total {
            Verdict::HighRisk
        } else if fraud_risk > self.risky_fraud || below > 0 {
            Verdict::LikelyRisky
        } else {
            Verdict::LikelyLegit
        }
    }

    /// (passed, total) checks for a score set: each present reputation score
    /// passes at or above `low_score`, fraud passes at or below `risky_fraud`.
    pub fn check_counts(&self, scores: &ScoreSet) -> (u32, u32) {
        let considered = scores.reputation_scores();
        let mut total = considered.len() as u32;
        let mut passed = considered.iter().filter(|s| **s >= self.low_score).count() as u32;
        if let Some(fraud_risk) = scores.fraud_risk {
            total += 1;
            if fraud_risk <= self.risky_fraud {
                passed += 1;
            }
        }
        (passed, total)
    }
}

/// Map an upstream category ("low", "Medium Risk", "CRITICAL", ...) onto a
/// verdict. A separate trailing "risk" word is ignored. Unrecognised strings
/// return `None`.
fn map_category(category: &str) -> Option<Verdict> {
    let normalized = category
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let word = normalized.strip_suffix(" risk").unwrap_or(&normalized);

    match word {
        "low" | "safe" => Some(Verdict::LikelyLegit),
        "medium" | "moderate" => Some(Verdict::LikelyRisky),
        "high" | "critical" => Some(Verdict::HighRisk),
        _ => None,
    }
}

/// Derive a verdict with the default thresholds.
pub fn derive_verdict(scores: &ScoreSet, explicit_category: Option<&str>) -> Verdict {
    VerdictThresholds::default().derive(scores, explicit_category)
}
