//! In-memory assessment store with optional JSON file persistence.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::AssessmentStore;
use crate::models::{storage_key, AssessmentRecord, HistoryEntry, Network};

/// Default number of history rows kept; older rows are dropped on write.
pub const MAX_HISTORY_SIZE: usize = 1000;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    /// storage key -> record
    assessments: HashMap<String, AssessmentRecord>,
    /// Oldest first, at most `history_cap` rows
    history: Vec<HistoryEntry>,
}

/// Thread-safe map of assessments. When a path is set every write is
/// mirrored to disk.
pub struct JsonStore {
    state: Arc<RwLock<StoreState>>,
    persistence_path: Option<PathBuf>,
    history_cap: usize,
}

impl JsonStore {
    /// Store that never touches the disk.
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            persistence_path: None,
            history_cap: MAX_HISTORY_SIZE,
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            persistence_path: Some(path),
            history_cap: MAX_HISTORY_SIZE,
        }
    }

    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap.max(1);
        self
    }

    /// Load previously saved assessments from disk
    pub async fn load(&self) -> Result<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };
        if !path.exists() {
            debug!("Assessment file {} not found, starting empty", path.display());
            return Ok(());
        }

        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if data.trim().is_empty() {
            return Ok(());
        }

        let loaded: StoreState = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let mut state = self.state.write().await;
        *state = loaded;
        trim_history(&mut state.history, self.history_cap);

        info!(
            "Loaded {} assessments ({} history entries) from {}",
            state.assessments.len(),
            state.history.len(),
            path.display()
        );
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let state = self.state.read().await;
        let data = serde_json::to_string_pretty(&*state)?;
        tokio::fs::write(path, data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Saved {} assessments", state.assessments.len());
        Ok(())
    }
}

fn trim_history(history: &mut Vec<HistoryEntry>, cap: usize) {
    if history.len() > cap {
        let excess = history.len() - cap;
        history.drain(..excess);
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[async_trait]
impl AssessmentStore for JsonStore {
    async fn get(&self, address: &str, network: Network) -> Result<Option<AssessmentRecord>> {
        let state = self.state.read().await;
        Ok(state.assessments.get(&storage_key(address, network)).cloned())
    }

    async fn upsert(&self, record: AssessmentRecord) -> Result<()> {
        let mut state = self.state.write().await;
        state.history.push(record.history_entry());
        trim_history(&mut state.history, self.history_cap);
        state.assessments.insert(record.storage_key(), record);
        drop(state);

        self.save().await
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let state = self.state.read().await;
        // Reverse first so equal timestamps keep the latest write on top
        let mut entries: Vec<HistoryEntry> = state.history.iter().rev().cloned().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScoreSet, Verdict};
    use crate::scoring::build_assessment_record;
    use chrono::{Duration, Utc};

    const ADDRESS: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";

    fn record(address: &str, network: Network, trust: u8, minutes_ago: i64) -> AssessmentRecord {
        build_assessment_record(
            address,
            network,
            ScoreSet {
                trust_score: trust,
                ..Default::default()
            },
            Verdict::LikelyRisky,
            "analysis",
            1,
            3,
            Some(Utc::now() - Duration::minutes(minutes_ago)),
        )
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = JsonStore::in_memory();
        assert!(store.get(ADDRESS, Network::Ethereum).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_per_pair() {
        let store = JsonStore::in_memory();
        store.upsert(record(ADDRESS, Network::Ethereum, 40, 10)).await.unwrap();
        store.upsert(record(ADDRESS, Network::Binance, 55, 5)).await.unwrap();
        store.upsert(record(ADDRESS, Network::Ethereum, 90, 0)).await.unwrap();

        let eth = store.get(ADDRESS, Network::Ethereum).await.unwrap().unwrap();
        assert_eq!(eth.scores.trust_score, 90);
        let bsc = store.get(ADDRESS, Network::Binance).await.unwrap().unwrap();
        assert_eq!(bsc.scores.trust_score, 55);

        // Hex lookups ignore case
        let lower = store
            .get(&ADDRESS.to_lowercase(), Network::Ethereum)
            .await
            .unwrap();
        assert!(lower.is_some());
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_limited() {
        let store = JsonStore::in_memory();
        store.upsert(record(ADDRESS, Network::Ethereum, 10, 30)).await.unwrap();
        store.upsert(record(ADDRESS, Network::Polygon, 20, 1)).await.unwrap();
        store.upsert(record(ADDRESS, Network::Base, 30, 15)).await.unwrap();

        let history = store.list_history(10).await.unwrap();
        let trust: Vec<u8> = history.iter().map(|h| h.trust_score).collect();
        assert_eq!(trust, vec![20, 30, 10]);

        assert_eq!(store.list_history(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_history_drops_oldest_past_cap() {
        let store = JsonStore::in_memory().with_history_cap(2);
        store.upsert(record(ADDRESS, Network::Ethereum, 10, 30)).await.unwrap();
        store.upsert(record(ADDRESS, Network::Polygon, 20, 20)).await.unwrap();
        store.upsert(record(ADDRESS, Network::Base, 30, 10)).await.unwrap();

        let trust: Vec<u8> = store.list_history(10).await.unwrap().iter().map(|h| h.trust_score).collect();
        assert_eq!(trust, vec![30, 20]);
        // Records themselves are kept
        assert!(store.get(ADDRESS, Network::Ethereum).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("assessments.json");

        let store = JsonStore::with_path(path.clone());
        store.upsert(record(ADDRESS, Network::Arbitrum, 77, 0)).await.unwrap();

        let reopened = JsonStore::with_path(path);
        reopened.load().await.unwrap();
        let loaded = reopened.get(ADDRESS, Network::Arbitrum).await.unwrap().unwrap();
        assert_eq!(loaded.scores.trust_score, 77);
        assert_eq!(reopened.list_history(10).await.unwrap().len(), 1);
    }
}
