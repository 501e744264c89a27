use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use storage::repository::KeyValueRepository;
use tracing::warn;
use tutor_core::model::ChallengeId;

use crate::error::ProgressError;

pub const COMPLETED_KEY: &str = "xrpl-completed-challenges";
pub const ACTIVE_INDEX_KEY: &str = "xrpl-active-challenge";
pub const DARK_MODE_KEY: &str = "xrpl-dark-mode";
pub const SNAPSHOTS_KEY: &str = "xrpl-code-snapshots";

type Snapshots = BTreeMap<ChallengeId, String>;

/// Point-in-time copy of every progress record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressRecord {
    pub completed_ids: Vec<ChallengeId>,
    pub active_index: usize,
    pub snapshots: BTreeMap<ChallengeId, String>,
    pub dark_mode: bool,
}

enum Read<T> {
    Missing,
    Malformed,
    Value(T),
}

/// Durable learner progress, one independently encoded record per key.
///
/// Reads never fail: an unreadable or malformed record is treated as absent.
/// Writes touch exactly one key each.
#[derive(Clone)]
pub struct ProgressStore {
    repo: Arc<dyn KeyValueRepository>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(repo: Arc<dyn KeyValueRepository>) -> Self {
        Self { repo }
    }

    /// Create the completed and snapshot records if they are absent.
    ///
    /// Existing, well-formed records are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if a default record cannot be written.
    pub async fn init(&self) -> Result<(), ProgressError> {
        if !matches!(self.read_json::<Vec<ChallengeId>>(COMPLETED_KEY).await, Read::Value(_)) {
            self.write_json(COMPLETED_KEY, &Vec::<ChallengeId>::new()).await?;
        }
        if !matches!(self.read_json::<Snapshots>(SNAPSHOTS_KEY).await, Read::Value(_)) {
            self.write_json(SNAPSHOTS_KEY, &Snapshots::new()).await?;
        }
        Ok(())
    }

    // ─── Completed ────────────────────────────────────────────────────────────

    pub async fn completed(&self) -> Vec<ChallengeId> {
        match self.read_json::<Vec<ChallengeId>>(COMPLETED_KEY).await {
            Read::Value(ids) => ids,
            Read::Missing => Vec::new(),
            Read::Malformed => {
                self.reinitialize(COMPLETED_KEY, &Vec::<ChallengeId>::new())
                    .await;
                Vec::new()
            }
        }
    }

    /// Replace the completed set. Duplicates are dropped, first occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be written.
    pub async fn set_completed(&self, ids: &[ChallengeId]) -> Result<(), ProgressError> {
        let mut unique: Vec<ChallengeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }
        self.write_json(COMPLETED_KEY, &unique).await
    }

    /// Add `id` to the completed set if it is not already there.
    ///
    /// Returns whether the id was newly added.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be written.
    pub async fn mark_completed(&self, id: &ChallengeId) -> Result<bool, ProgressError> {
        let mut completed = self.completed().await;
        if completed.contains(id) {
            return Ok(false);
        }
        completed.push(id.clone());
        self.write_json(COMPLETED_KEY, &completed).await?;
        Ok(true)
    }

    pub async fn is_completed(&self, id: &ChallengeId) -> bool {
        self.completed().await.contains(id)
    }

    // ─── Active index ─────────────────────────────────────────────────────────

    /// Stored active index, or 0 when absent or unreadable.
    pub async fn active_index(&self) -> usize {
        match self.read_json::<usize>(ACTIVE_INDEX_KEY).await {
            Read::Value(index) => index,
            Read::Missing => 0,
            Read::Malformed => {
                self.reinitialize(ACTIVE_INDEX_KEY, &0_usize).await;
                0
            }
        }
    }

    /// Persist the active index. No range check happens here.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be written.
    pub async fn set_active_index(&self, index: usize) -> Result<(), ProgressError> {
        self.repo.put(ACTIVE_INDEX_KEY, &index.to_string()).await?;
        Ok(())
    }

    // ─── Snapshots ────────────────────────────────────────────────────────────

    pub async fn snapshot(&self, id: &ChallengeId) -> Option<String> {
        self.snapshots().await.remove(id)
    }

    /// Store the latest code for `id`, keeping every other snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be written.
    pub async fn save_snapshot(&self, id: &ChallengeId, code: &str) -> Result<(), ProgressError> {
        let mut snapshots = self.snapshots().await;
        snapshots.insert(id.clone(), code.to_string());
        self.write_json(SNAPSHOTS_KEY, &snapshots).await
    }

    async fn snapshots(&self) -> Snapshots {
        match self.read_json::<Snapshots>(SNAPSHOTS_KEY).await {
            Read::Value(snapshots) => snapshots,
            Read::Missing => Snapshots::new(),
            Read::Malformed => {
                self.reinitialize(SNAPSHOTS_KEY, &Snapshots::new()).await;
                Snapshots::new()
            }
        }
    }

    // ─── Theme ────────────────────────────────────────────────────────────────

    /// Only a stored `true` turns dark mode on.
    pub async fn dark_mode(&self) -> bool {
        match self.read_json::<bool>(DARK_MODE_KEY).await {
            Read::Value(enabled) => enabled,
            Read::Missing => false,
            Read::Malformed => {
                self.reinitialize(DARK_MODE_KEY, &false).await;
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be written.
    pub async fn set_dark_mode(&self, enabled: bool) -> Result<(), ProgressError> {
        self.repo
            .put(DARK_MODE_KEY, if enabled { "true" } else { "false" })
            .await?;
        Ok(())
    }

    // ─── Whole record ─────────────────────────────────────────────────────────

    /// Remove completion, active index and snapshots. The theme flag survives.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` on the first key that cannot be removed; keys
    /// removed before it stay removed.
    pub async fn clear_all(&self) -> Result<(), ProgressError> {
        self.repo.remove(COMPLETED_KEY).await?;
        self.repo.remove(ACTIVE_INDEX_KEY).await?;
        self.repo.remove(SNAPSHOTS_KEY).await?;
        Ok(())
    }

    pub async fn load_record(&self) -> ProgressRecord {
        ProgressRecord {
            completed_ids: self.completed().await,
            active_index: self.active_index().await,
            snapshots: self.snapshots().await,
            dark_mode: self.dark_mode().await,
        }
    }

    // ─── Encoding ─────────────────────────────────────────────────────────────

    async fn read_raw(&self, key: &str) -> Option<String> {
        match self.repo.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "progress record unreadable, treating as absent");
                None
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Read<T> {
        let Some(raw) = self.read_raw(key).await else {
            return Read::Missing;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Read::Value(value),
            Err(err) => {
                warn!(key, error = %err, "progress record malformed");
                Read::Malformed
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ProgressError> {
        let encoded = serde_json::to_string(value)?;
        self.repo.put(key, &encoded).await?;
        Ok(())
    }

    async fn reinitialize<T: Serialize>(&self, key: &str, default: &T) {
        if let Err(err) = self.write_json(key, default).await {
            warn!(key, error = %err, "failed to reinitialize progress record");
        }
    }
}
