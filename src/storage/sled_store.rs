//! Assessment store backed by an embedded sled database.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sled::transaction::TransactionResult;
use sled::Transactional;
use std::path::Path;
use tracing::{debug, info};

use super::AssessmentStore;
use crate::error::ReputexError;
use crate::models::{storage_key, AssessmentRecord, HistoryEntry, Network};

const ASSESSMENTS_TREE: &str = "assessments";
const HISTORY_TREE: &str = "history";

fn storage_error(e: sled::Error) -> ReputexError {
    ReputexError::StorageError(e.to_string())
}

pub struct SledStore {
    db: sled::Db,
    assessments: sled::Tree,
    history: sled::Tree,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path)
            .with_context(|| format!("Failed to open sled database at {}", path.display()))?;
        let assessments = db.open_tree(ASSESSMENTS_TREE)?;
        let history = db.open_tree(HISTORY_TREE)?;

        info!(
            "Opened sled store at {} ({} assessments)",
            path.display(),
            assessments.len()
        );
        Ok(Self {
            db,
            assessments,
            history,
        })
    }

    /// Timestamp first so lexicographic order is chronological; the
    /// monotonic id breaks ties in write order.
    fn history_key(&self, entry: &HistoryEntry) -> Result<[u8; 16]> {
        let nanos = entry.timestamp.timestamp_nanos_opt().unwrap_or(0).max(0) as u64;
        let id = self.db.generate_id().map_err(storage_error)?;
        let mut key = [0u8; 16];
        key[..8].copy_from_slice(&nanos.to_be_bytes());
        key[8..].copy_from_slice(&id.to_be_bytes());
        Ok(key)
    }
}

#[async_trait]
impl AssessmentStore for SledStore {
    async fn get(&self, address: &str, network: Network) -> Result<Option<AssessmentRecord>> {
        let key = storage_key(address, network);
        match self.assessments.get(key.as_bytes()).map_err(storage_error)? {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Corrupt assessment stored under {}", key))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: AssessmentRecord) -> Result<()> {
        let key = record.storage_key();
        let entry = record.history_entry();
        let history_key = self.history_key(&entry)?;
        let record_bytes = serde_json::to_vec(&record)?;
        let entry_bytes = serde_json::to_vec(&entry)?;

        // Record and history row land together or not at all
        let result: TransactionResult<(), ()> =
            (&self.assessments, &self.history).transaction(|(assessments, history)| {
                assessments.insert(key.as_bytes(), record_bytes.as_slice())?;
                history.insert(&history_key[..], entry_bytes.as_slice())?;
                Ok(())
            });
        result.map_err(|e| ReputexError::StorageError(format!("{:?}", e)))?;
        self.db.flush_async().await.map_err(storage_error)?;

        debug!("Upserted assessment {}", key);
        Ok(())
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.history
            .iter()
            .rev()
            .take(limit)
            .map(|item| {
                let (_, bytes) = item.map_err(storage_error)?;
                serde_json::from_slice(&bytes).context("Corrupt history entry")
            })
            .collect()
    }
}
