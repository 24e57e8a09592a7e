use serde::{Deserialize, Serialize};

/// Embedding vectors for one validation run, positionally aligned with the
/// record sequence: index `i`'s vectors belong to record `i`.
///
/// Each record contributes two vectors: a "root" vector derived from its
/// `root_description` and a "parent" vector derived from its
/// `parent_short_summary`. A `None` slot models a missing embedding (blank
/// source text or a malformed record); consumers treat it as a legitimate
/// state that scores 0.0, never as an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmbeddingTable {
    pub root: Vec<Option<Vec<f32>>>,
    pub parent: Vec<Option<Vec<f32>>>,
}

impl EmbeddingTable {
    /// Creates a table from the two aligned vector columns.
    pub fn new(root: Vec<Option<Vec<f32>>>, parent: Vec<Option<Vec<f32>>>) -> Self {
        Self { root, parent }
    }

    /// Returns the root vector for record `index`, if present.
    pub fn root_vector(&self, index: usize) -> Option<&[f32]> {
        self.root.get(index).and_then(|v| v.as_deref())
    }

    /// Returns the parent-role vector for record `index`, if present.
    pub fn parent_vector(&self, index: usize) -> Option<&[f32]> {
        self.parent.get(index).and_then(|v| v.as_deref())
    }
}
