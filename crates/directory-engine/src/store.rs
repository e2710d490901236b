//! Embedded JSON document store for the winery collection, including the
//! batch commit gateway used by bulk imports.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{DirectoryError, DirectoryResult};
use crate::record::{self, Winery};

/// Name of the single collection this store manages.
pub const COLLECTION: &str = "wineries";

/// Ceiling on the number of write operations in one atomic batch.
///
/// A staged upload larger than this is rejected before any write. Splitting
/// it into several smaller batches would silently break the all-or-nothing
/// upload contract, so the caller has to split the file instead.
pub const MAX_BATCH_OPS: usize = 500;

/// Durable summary of one committed upload batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReceipt {
    pub batch_id: String,
    pub records_written: usize,
    pub source: String,
    pub committed_at: DateTime<Utc>,
}

/// Directory-backed document store holding the winery collection.
///
/// Every mutation goes through batch semantics: the next collection snapshot
/// is written to a temp file and renamed over the current one before the
/// in-memory view is swapped. Readers never observe a partial batch, and a
/// failed write leaves both disk and memory on the previous snapshot.
#[derive(Debug)]
pub struct DirectoryStore {
    documents: RwLock<BTreeMap<String, Winery>>,
    storage_path: PathBuf,
}

impl DirectoryStore {
    /// Open the store rooted at `storage_path`, creating it on first use.
    pub fn open(storage_path: impl AsRef<Path>) -> DirectoryResult<Self> {
        let storage_path = storage_path.as_ref().to_path_buf();
        fs::create_dir_all(&storage_path)?;

        let collection_path = storage_path.join(format!("{COLLECTION}.json"));
        let mut documents = BTreeMap::new();
        if collection_path.exists() {
            let content = fs::read_to_string(&collection_path)?;
            let stored: Vec<Winery> = serde_json::from_str(&content)?;
            for doc in stored {
                match doc.id.clone() {
                    Some(id) => {
                        documents.insert(id, doc);
                    }
                    None => warn!(name = %doc.name, "skipping stored document without an id"),
                }
            }
        }

        info!(
            path = %storage_path.display(),
            documents = documents.len(),
            "opened directory store"
        );
        Ok(Self {
            documents: RwLock::new(documents),
            storage_path,
        })
    }

    /// Persist a staged sequence as one atomic batch and return its receipt.
    ///
    /// Each record gets a store-assigned id. There is no row-level retry and
    /// no partial salvage: any failure comes back as-is with the store
    /// unchanged, and an empty staged sequence commits trivially with zero
    /// records written.
    pub async fn commit_batch(
        &self,
        staged: Vec<Winery>,
        source: &str,
    ) -> DirectoryResult<BatchReceipt> {
        if staged.len() > MAX_BATCH_OPS {
            return Err(DirectoryError::BatchTooLarge {
                staged: staged.len(),
                max: MAX_BATCH_OPS,
            });
        }

        let records_written = staged.len();
        let mut documents = self.documents.write().unwrap();
        let mut next = documents.clone();
        for mut doc in staged {
            let id = Uuid::new_v4().to_string();
            doc.id = Some(id.clone());
            next.insert(id, doc);
        }
        self.save_collection(&next)?;
        *documents = next;
        drop(documents);

        let receipt = BatchReceipt {
            batch_id: Uuid::new_v4().to_string(),
            records_written,
            source: source.to_string(),
            committed_at: Utc::now(),
        };
        info!(
            batch_id = %receipt.batch_id,
            records = records_written,
            source,
            "committed batch"
        );
        // Persist the receipt (best effort, don't block on error)
        self.append_receipt(&receipt);
        Ok(receipt)
    }

    /// Insert a single record outside the bulk pipeline.
    ///
    /// The record must carry the same required fields the pipeline enforces;
    /// its rating is clamped to the finite non-negative range every stored
    /// record honors. The id is store-assigned either way.
    pub async fn insert_one(&self, mut doc: Winery) -> DirectoryResult<Winery> {
        let missing = record::missing_required(&doc);
        if !missing.is_empty() {
            return Err(DirectoryError::IncompleteRecord { missing });
        }
        if !doc.rating.is_finite() || doc.rating < 0.0 {
            doc.rating = 0.0;
        }

        let id = Uuid::new_v4().to_string();
        doc.id = Some(id.clone());

        let mut documents = self.documents.write().unwrap();
        let mut next = documents.clone();
        next.insert(id.clone(), doc.clone());
        self.save_collection(&next)?;
        *documents = next;

        info!(%id, name = %doc.name, "inserted record");
        Ok(doc)
    }

    /// Flip the featured flag on one record. This is the only mutation a
    /// record sees after import.
    pub async fn set_featured(&self, id: &str, featured: bool) -> DirectoryResult<Winery> {
        let mut documents = self.documents.write().unwrap();
        let mut next = documents.clone();
        let doc = next.get_mut(id).ok_or_else(|| DirectoryError::NotFound {
            id: id.to_string(),
        })?;
        doc.featured = featured;
        let updated = doc.clone();
        self.save_collection(&next)?;
        *documents = next;

        info!(id, featured, "updated featured flag");
        Ok(updated)
    }

    /// Fetch one document. Absence is a normal outcome, not an error.
    pub async fn get(&self, id: &str) -> Option<Winery> {
        self.documents.read().unwrap().get(id).cloned()
    }

    /// Clone every document, in store-native (id) order.
    pub async fn scan(&self) -> Vec<Winery> {
        self.documents.read().unwrap().values().cloned().collect()
    }

    /// Number of documents in the collection.
    pub fn count(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    /// Receipts of committed batches, oldest first. Best-effort data: an
    /// unreadable history file yields an empty list.
    pub fn import_history(&self) -> Vec<BatchReceipt> {
        let path = self.storage_path.join("imports.json");
        let Ok(content) = fs::read_to_string(&path) else {
            return Vec::new();
        };
        match serde_json::from_str(&content) {
            Ok(receipts) => receipts,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable import history");
                Vec::new()
            }
        }
    }

    /// Write the full collection snapshot through a temp file plus rename,
    /// so a crash mid-write never leaves a truncated collection behind.
    fn save_collection(&self, documents: &BTreeMap<String, Winery>) -> DirectoryResult<()> {
        let snapshot: Vec<&Winery> = documents.values().collect();
        let content = serde_json::to_string_pretty(&snapshot)?;
        let final_path = self.storage_path.join(format!("{COLLECTION}.json"));
        let tmp_path = self.storage_path.join(format!("{COLLECTION}.json.tmp"));
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &final_path)?;
        Ok(())
    }

    fn append_receipt(&self, receipt: &BatchReceipt) {
        let mut history = self.import_history();
        history.push(receipt.clone());
        let path = self.storage_path.join("imports.json");
        match serde_json::to_string_pretty(&history) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    warn!(error = %e, "could not persist import receipt");
                }
            }
            Err(e) => warn!(error = %e, "could not encode import receipt"),
        }
    }
}
