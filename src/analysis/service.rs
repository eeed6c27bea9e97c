use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{AnalysisInput, ReputationModel, SignalSource};
use crate::address::{detect, refine, AccountInspector};
use crate::error::ReputexError;
use crate::models::{
    AddressInfo, AddressKind, AssessmentRecord, HistoryEntry, Network, ScoreSet, TokenProfile, Verdict,
    WalletActivity,
};
use crate::scoring::{build_assessment_record, Normalizer, SignalBundle, SignalMap, VerdictThresholds};
use crate::storage::AssessmentStore;

pub const DEGRADED_ANALYSIS: &str = "AI analysis unavailable.";
const MISSING_ANALYSIS: &str = "No analysis provided.";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Result of `ReputationService::assess`.
#[derive(Debug, Clone)]
pub struct AssessmentOutcome {
    pub record: AssessmentRecord,
    /// Served from the store without running the pipeline.
    pub cached: bool,
    pub address_type: AddressKind,
    /// False when the model failed and the record was not stored.
    pub persisted: bool,
}

/// Scores and verdict for a bundle scored on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    #[serde(flatten)]
    pub scores: ScoreSet,
    pub verdict: Verdict,
    pub checks_passed: u32,
    pub total_checks: u32,
}

/// Pick the network an address is assessed on.
///
/// Non-EVM shapes decide their own network. EVM-shaped addresses take the
/// requested network, which must itself be EVM.
pub fn resolve_network(info: &AddressInfo, requested: Option<Network>) -> Result<Network> {
    if !info.is_valid {
        return Err(ReputexError::InvalidAddress("Address format not recognized".to_string()).into());
    }
    if info.is_positively_classified() {
        if let Some(requested) = requested.filter(|n| *n != info.network) {
            debug!("Ignoring requested network {}, address is {}", requested, info.network);
        }
        return Ok(info.network);
    }

    let network = requested.unwrap_or_default();
    if !network.is_evm() {
        return Err(ReputexError::NetworkMismatch(format!(
            "EVM address cannot be assessed on {}",
            network.display_name()
        ))
        .into());
    }
    Ok(network)
}

pub struct ReputationService {
    store: Arc<dyn AssessmentStore>,
    inspector: Arc<dyn AccountInspector>,
    signals: Arc<dyn SignalSource>,
    model: Arc<dyn ReputationModel>,
    thresholds: VerdictThresholds,
    normalizer: Normalizer,
    history_limit: usize,
}

impl ReputationService {
    pub fn new(
        store: Arc<dyn AssessmentStore>,
        inspector: Arc<dyn AccountInspector>,
        signals: Arc<dyn SignalSource>,
        model: Arc<dyn ReputationModel>,
    ) -> Self {
        Self {
            store,
            inspector,
            signals,
            model,
            thresholds: VerdictThresholds::default(),
            normalizer: Normalizer::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_thresholds(mut self, thresholds: VerdictThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Stored record for an address, or a fresh assessment.
    pub async fn assess(
        &self,
        address: &str,
        network: Option<Network>,
        force_refresh: bool,
    ) -> Result<AssessmentOutcome> {
        let address = address.trim();
        let info = detect(address);
        let network = resolve_network(&info, network)?;

        if !force_refresh {
            if let Some(record) = self.store.get(address, network).await? {
                info!("Serving stored assessment for {} on {}", address, network);
                return Ok(AssessmentOutcome {
                    address_type: record.address_type,
                    record,
                    cached: true,
                    persisted: true,
                });
            }
        }

        info!("Assessing {} on {} (force_refresh: {})", address, network, force_refresh);
        let address_type = refine(address, network, self.inspector.as_ref()).await;
        let input = self.collect(address, network, address_type).await;

        let (raw, degraded) = match self.model.assess(&input).await {
            Ok(raw) => (raw, false),
            Err(e) => {
                error!("Reputation model failed for {} on {}: {:?}", address, network, e);
                (SignalMap::new(), true)
            }
        };

        let bundle = SignalBundle::from_raw(&raw, &self.normalizer);
        let verdict = self.thresholds.derive(&bundle.scores, bundle.risk_category.as_deref());
        let (checks_passed, total_checks) = self.checks(&bundle);
        let analysis = if degraded {
            DEGRADED_ANALYSIS.to_string()
        } else {
            bundle.analysis.unwrap_or_else(|| MISSING_ANALYSIS.to_string())
        };

        let record = build_assessment_record(
            address,
            network,
            bundle.scores,
            verdict,
            analysis,
            checks_passed,
            total_checks,
            None,
        )
        .with_token(
            bundle.token_name.or(input.token.token_name),
            bundle.symbol.or(input.token.symbol),
        )
        .with_risk_category(bundle.risk_category)
        .with_address_type(address_type);

        if degraded {
            warn!("Not storing degraded assessment for {} on {}", address, network);
        } else {
            self.store.upsert(record.clone()).await?;
            info!(
                "Stored assessment for {} on {}: trust {} ({})",
                address, network, record.scores.trust_score, record.verdict
            );
        }

        Ok(AssessmentOutcome {
            record,
            cached: false,
            address_type,
            persisted: !degraded,
        })
    }

    // Collaborator failures degrade to empty data
    async fn collect(&self, address: &str, network: Network, address_type: AddressKind) -> AnalysisInput {
        let activity = match self.signals.wallet_activity(address, network).await {
            Ok(activity) => activity,
            Err(e) => {
                warn!("Wallet activity unavailable for {} on {}: {:?}", address, network, e);
                WalletActivity::default()
            }
        };

        let token = if address_type == AddressKind::Contract {
            match self.signals.token_profile(address, network).await {
                Ok(profile) => profile.unwrap_or_default(),
                Err(e) => {
                    warn!("Token profile unavailable for {} on {}: {:?}", address, network, e);
                    TokenProfile::default()
                }
            }
        } else {
            TokenProfile::default()
        };

        AnalysisInput {
            address: address.to_string(),
            network,
            address_type,
            activity,
            token,
        }
    }

    /// Stored record for the pair, without running the pipeline.
    pub async fn lookup(&self, address: &str, network: Network) -> Result<Option<AssessmentRecord>> {
        self.store.get(address.trim(), network).await
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.store.list_history(self.history_limit).await
    }

    // Upstream counters win when both are present
    fn checks(&self, bundle: &SignalBundle) -> (u32, u32) {
        match (bundle.checks_passed, bundle.total_checks) {
            (Some(passed), Some(total)) => (passed, total),
            _ => self.thresholds.check_counts(&bundle.scores),
        }
    }

    /// Score a raw bundle without touching the store.
    pub fn score(&self, raw: &SignalMap) -> ScoreSummary {
        let bundle = SignalBundle::from_raw(raw, &self.normalizer);
        let verdict = self.thresholds.derive(&bundle.scores, bundle.risk_category.as_deref());
        let (checks_passed, total_checks) = self.checks(&bundle);
        ScoreSummary {
            scores: bundle.scores,
            verdict,
            checks_passed,
            total_checks,
        }
    }
}
