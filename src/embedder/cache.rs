//! File-backed cache for computed embedding tables.
//!
//! Embedding a dataset is the expensive step of a validation run, so the
//! resolved [`EmbeddingTable`] is persisted as JSON keyed by a fixed path and
//! reused on subsequent runs over the same dataset.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::client::{EmbedError, EmbeddingClient};
use crate::models::{EmbeddingTable, NodeRecord};

/// Persistent embedding store at a fixed path.
#[derive(Debug, Clone)]
pub struct EmbeddingCache {
    path: PathBuf,
}

impl EmbeddingCache {
    /// Creates a cache handle for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cached table if the file exists.
    ///
    /// An absent file is `Ok(None)`, not an error; a present but unreadable
    /// or corrupt file is an error, since silently regenerating would mask a
    /// broken cache.
    pub fn load(&self) -> Result<Option<EmbeddingTable>, EmbedError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| EmbedError::Cache {
            path: self.path.display().to_string(),
            source,
        })?;
        let table = serde_json::from_str(&raw).map_err(EmbedError::Serialization)?;
        Ok(Some(table))
    }

    /// Saves the table, creating parent directories as needed.
    pub fn save(&self, table: &EmbeddingTable) -> Result<(), EmbedError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| EmbedError::Cache {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let json = serde_json::to_string(table).map_err(EmbedError::Serialization)?;
        fs::write(&self.path, json).map_err(|source| EmbedError::Cache {
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// Resolves the embedding table for a record sequence.
///
/// A cache hit wins outright. On a miss the `root_description` and
/// `parent_short_summary` columns are embedded via `client` and the result is
/// persisted for next time. Blank texts are never sent to the model; their
/// slots stay `None` and downstream scoring treats them as the 0.0 sentinel.
///
/// A failed save is surfaced as a warning rather than an error: the freshly
/// computed table is still valid for this run.
///
/// # Errors
///
/// Returns [`EmbedError`] when an existing cache file cannot be read or the
/// embedding request fails.
pub fn get_or_create(
    cache: &EmbeddingCache,
    client: &dyn EmbeddingClient,
    model: &str,
    records: &[NodeRecord],
) -> Result<EmbeddingTable, EmbedError> {
    if let Some(table) = cache.load()? {
        return Ok(table);
    }

    let root = embed_column(client, model, records, |r| r.root_description.as_str())?;
    let parent = embed_column(client, model, records, |r| r.parent_short_summary.as_str())?;
    let table = EmbeddingTable::new(root, parent);

    if let Err(e) = cache.save(&table) {
        warn!(path = %cache.path().display(), error = %e, "failed to save embedding cache");
    }

    Ok(table)
}

/// Embeds one text column, batching only the non-blank texts.
fn embed_column(
    client: &dyn EmbeddingClient,
    model: &str,
    records: &[NodeRecord],
    text: fn(&NodeRecord) -> &str,
) -> Result<Vec<Option<Vec<f32>>>, EmbedError> {
    let mut slots: Vec<Option<Vec<f32>>> = vec![None; records.len()];

    let mut indices = Vec::new();
    let mut texts = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let t = text(record);
        if !t.trim().is_empty() {
            indices.push(i);
            texts.push(t.to_string());
        }
    }

    let vectors = client.embed(model, &texts)?;
    for (i, vector) in indices.into_iter().zip(vectors) {
        slots[i] = Some(vector);
    }

    Ok(slots)
}
