//! Assessment persistence.
//!
//! The service only depends on `AssessmentStore`; the backends are
//! interchangeable. Writes are last-writer-wins per (address, network).

pub mod json_store;
pub mod sled_store;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AssessmentRecord, HistoryEntry, Network};

pub use json_store::{JsonStore, MAX_HISTORY_SIZE};
pub use sled_store::SledStore;

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Stored record for the pair, if it was ever assessed.
    async fn get(&self, address: &str, network: Network) -> Result<Option<AssessmentRecord>>;

    /// Replace the record for its (address, network) pair and append a
    /// history entry.
    async fn upsert(&self, record: AssessmentRecord) -> Result<()>;

    /// Up to `limit` history entries, newest first.
    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryEntry>>;
}
