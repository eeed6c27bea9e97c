//! Normalization of loosely typed upstream signal bundles.
//!
//! Upstream producers disagree on naming (`trust_score` vs `trustScore`), so
//! every canonical field carries an ordered alias list and one generic
//! resolver picks the first alias that resolves to a usable value.

use serde_json::{Map, Value};

use crate::models::ScoreSet;

/// Raw signal bundle as received from collectors or the model.
pub type SignalMap = Map<String, Value>;

const TRUST_ALIASES: &[&str] = &["trust_score", "trustScore"];
const DEVELOPER_ALIASES: &[&str] = &["developer_score", "developerScore"];
const LIQUIDITY_ALIASES: &[&str] = &["liquidity_score", "liquidityScore"];
const COMMUNITY_ALIASES: &[&str] = &["community_score", "communityScore"];
const HOLDER_ALIASES: &[&str] = &["holder_distribution", "holderDistribution"];
const FRAUD_ALIASES: &[&str] = &["fraud_risk", "fraudRisk"];

const RISK_CATEGORY_ALIASES: &[&str] = &["risk_category", "riskCategory", "verdict"];
const ANALYSIS_ALIASES: &[&str] = &["analysis", "summary"];
const CHECKS_PASSED_ALIASES: &[&str] = &["checks_passed", "checksPassed"];
const TOTAL_CHECKS_ALIASES: &[&str] = &["total_checks", "totalChecks"];
const TOKEN_NAME_ALIASES: &[&str] = &["token_name", "tokenName"];
const SYMBOL_ALIASES: &[&str] = &["symbol"];

/// First alias (in priority order) whose value `resolve` accepts.
fn first_present<T>(
    raw: &SignalMap,
    aliases: &[&str],
    resolve: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    aliases
        .iter()
        .filter_map(|key| raw.get(*key))
        .find_map(resolve)
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn as_score(value: &Value) -> Option<u8> {
    as_number(value).map(clamp_score)
}

fn as_count(value: &Value) -> Option<u32> {
    as_number(value).map(|n| n.max(0.0).min(u32::MAX as f64).round() as u32)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Saturating clamp into 0..=100.
pub fn clamp_score(n: f64) -> u8 {
    n.clamp(0.0, 100.0).round() as u8
}

/// Turns raw bundles into `ScoreSet`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    fallback_fill: Option<u8>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill missing required scores with `fill` instead of 0.
    pub fn with_fallback_fill(fill: u8) -> Self {
        Self {
            fallback_fill: Some(fill.min(100)),
        }
    }

    pub fn normalize(&self, raw: &SignalMap) -> ScoreSet {
        let required = |aliases: &[&str]| {
            first_present(raw, aliases, as_score).unwrap_or(self.fallback_fill.unwrap_or(0))
        };

        ScoreSet {
            trust_score: required(TRUST_ALIASES),
            developer_score: required(DEVELOPER_ALIASES),
            liquidity_score: required(LIQUIDITY_ALIASES),
            community_score: first_present(raw, COMMUNITY_ALIASES, as_score),
            holder_distribution: first_present(raw, HOLDER_ALIASES, as_score),
            fraud_risk: first_present(raw, FRAUD_ALIASES, as_score),
        }
    }
}

/// Normalize with the default rules (missing required scores become 0).
pub fn normalize(raw: &SignalMap) -> ScoreSet {
    Normalizer::default().normalize(raw)
}

/// Everything the aggregator reads from a raw bundle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalBundle {
    pub scores: ScoreSet,
    pub risk_category: Option<String>,
    pub analysis: Option<String>,
    pub checks_passed: Option<u32>,
    pub total_checks: Option<u32>,
    pub token_name: Option<String>,
    pub symbol: Option<String>,
}

impl SignalBundle {
    pub fn from_raw(raw: &SignalMap, normalizer: &Normalizer) -> Self {
        Self {
            scores: normalizer.normalize(raw),
            risk_category: first_present(raw, RISK_CATEGORY_ALIASES, as_text),
            analysis: first_present(raw, ANALYSIS_ALIASES, as_text),
            checks_passed: first_present(raw, CHECKS_PASSED_ALIASES, as_count),
            total_checks: first_present(raw, TOTAL_CHECKS_ALIASES, as_count),
            token_name: first_present(raw, TOKEN_NAME_ALIASES, as_text)
                .filter(|name| !name.eq_ignore_ascii_case("unknown")),
            symbol: first_present(raw, SYMBOL_ALIASES, as_text),
        }
    }
}
