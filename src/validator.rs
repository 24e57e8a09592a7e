//! Relationship validation over a loaded hierarchy dataset.
//!
//! `RelationshipValidator` holds the immutable records and their embedding
//! table for one run and turns them into per-record [`ValidationResult`]s.
//! Each `validate` call is a pure transformation of (records, embeddings,
//! thresholds); there is no hidden state between calls.

use thiserror::Error;

use crate::models::{
    CurrentParent, EmbeddingTable, NodeRecord, SuggestedParent, ValidationResult, Verdict,
};
use crate::ranker::{self, Candidate};
use crate::similarity;

/// Fatal construction-time errors.
///
/// Malformed individual records are tolerated (absent fields default, absent
/// embeddings score 0.0); only dataset-level structural problems are errors.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// An embedding column does not line up with the record sequence.
    #[error("{column} embedding count ({embeddings}) does not match record count ({records})")]
    LengthMismatch {
        column: &'static str,
        embeddings: usize,
        records: usize,
    },
}

/// Tuning knobs for one validation run.
///
/// Defaults follow the documented configuration: 0.65 validity and suggestion
/// thresholds, at most 3 suggestions per record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorConfig {
    /// Minimum similarity for an existing relationship to be judged VALID.
    pub validity_threshold: f32,
    /// Minimum similarity for a candidate to appear among suggestions.
    pub suggestion_threshold: f32,
    /// Maximum number of suggested alternative parents per record.
    pub max_suggestions: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            validity_threshold: 0.65,
            suggestion_threshold: 0.65,
            max_suggestions: 3,
        }
    }
}

/// Validates declared parent–child relationships by embedding similarity.
#[derive(Debug)]
pub struct RelationshipValidator {
    records: Vec<NodeRecord>,
    embeddings: EmbeddingTable,
}

impl RelationshipValidator {
    /// Creates a validator over positionally aligned records and embeddings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::LengthMismatch`] when either embedding
    /// column's length differs from the record count.
    pub fn new(
        records: Vec<NodeRecord>,
        embeddings: EmbeddingTable,
    ) -> Result<Self, ValidatorError> {
        if embeddings.root.len() != records.len() {
            return Err(ValidatorError::LengthMismatch {
                column: "root",
                embeddings: embeddings.root.len(),
                records: records.len(),
            });
        }
        if embeddings.parent.len() != records.len() {
            return Err(ValidatorError::LengthMismatch {
                column: "parent",
                embeddings: embeddings.parent.len(),
                records: records.len(),
            });
        }

        Ok(Self {
            records,
            embeddings,
        })
    }

    /// Returns the loaded records.
    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    /// Validates every parent-bearing record and ranks alternative parents.
    ///
    /// Records without a declared parent are skipped entirely. For each
    /// remaining record the current relationship is scored, every *other*
    /// parent-bearing record is considered as an alternative parent (a record
    /// only contributes a parent-role embedding when it participates in a
    /// parent relationship itself), and the top suggestions above the
    /// configured threshold are attached with their improvement over the
    /// current score.
    ///
    /// A dataset where no record declares a parent yields an empty vec.
    pub fn validate(&self, config: &ValidatorConfig) -> Vec<ValidationResult> {
        let mut results = Vec::new();

        for (idx, record) in self.records.iter().enumerate() {
            if !record.has_parent() {
                continue;
            }

            let root_vector = self.embeddings.root_vector(idx);
            let current_score =
                similarity::score(root_vector, self.embeddings.parent_vector(idx));

            // Candidate pool: every other record that itself declares a parent.
            let candidates: Vec<Candidate<'_>> = self
                .records
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != idx && other.has_parent())
                .map(|(j, other)| Candidate {
                    key: &other.parent_key,
                    name: &other.parent_name,
                    vector: self.embeddings.parent_vector(j),
                })
                .collect();

            let suggested_parents: Vec<SuggestedParent> = ranker::rank(
                root_vector,
                &candidates,
                config.max_suggestions,
                config.suggestion_threshold,
            )
            .into_iter()
            .map(|m| SuggestedParent {
                parent_key: m.parent_key,
                parent_name: m.parent_name,
                similarity_score: m.score,
                improvement: m.score - current_score,
            })
            .collect();

            let verdict = if current_score >= config.validity_threshold {
                Verdict::Valid
            } else {
                Verdict::Invalid
            };

            results.push(ValidationResult {
                root_key: record.root_key.clone(),
                root_name: record.root_name.clone(),
                current_parent: CurrentParent {
                    parent_key: record.parent_key.clone(),
                    parent_name: record.parent_name.clone(),
                    similarity_score: current_score,
                },
                suggested_parents,
                verdict,
                validation_status: verdict.status(),
            });
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(root_key: &str, root_name: &str, parent_key: &str, parent_name: &str) -> NodeRecord {
        NodeRecord {
            root_key: root_key.to_string(),
            root_name: root_name.to_string(),
            root_description: format!("{root_name} description"),
            parent_key: parent_key.to_string(),
            parent_name: parent_name.to_string(),
            parent_short_summary: format!("{parent_name} summary"),
        }
    }

    fn orphan(root_key: &str, root_name: &str) -> NodeRecord {
        NodeRecord {
            root_key: root_key.to_string(),
            root_name: root_name.to_string(),
            root_description: format!("{root_name} description"),
            ..Default::default()
        }
    }

    #[test]
    fn new_rejects_root_column_length_mismatch() {
        let records = vec![record("A", "A", "PB", "B")];
        let embeddings = EmbeddingTable::new(vec![], vec![Some(vec![1.0])]);

        let err = RelationshipValidator::new(records, embeddings).unwrap_err();
        assert!(matches!(
            err,
            ValidatorError::LengthMismatch {
                column: "root",
                embeddings: 0,
                records: 1
            }
        ));
    }

    #[test]
    fn new_rejects_parent_column_length_mismatch() {
        let records = vec![record("A", "A", "PB", "B")];
        let embeddings = EmbeddingTable::new(vec![Some(vec![1.0])], vec![]);

        let err = RelationshipValidator::new(records, embeddings).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("parent"));
        assert!(message.contains('0'));
        assert!(message.contains('1'));
    }

    #[test]
    fn parentless_records_are_skipped() {
        let records = vec![orphan("A", "A"), orphan("B", "B")];
        let embeddings = EmbeddingTable::new(
            vec![Some(vec![1.0, 0.0]), Some(vec![0.0, 1.0])],
            vec![None, None],
        );
        let validator = RelationshipValidator::new(records, embeddings).unwrap();

        let results = validator.validate(&ValidatorConfig::default());
        assert!(results.is_empty());
    }

    #[test]
    fn verdict_follows_validity_threshold() {
        // A's root and parent vectors align; B's are orthogonal.
        let records = vec![record("A", "A", "PB", "B"), record("B", "B", "PC", "C")];
        let embeddings = EmbeddingTable::new(
            vec![Some(vec![1.0, 0.0]), Some(vec![1.0, 0.0])],
            vec![Some(vec![1.0, 0.0]), Some(vec![0.0, 1.0])],
        );
        let validator = RelationshipValidator::new(records, embeddings).unwrap();

        let config = ValidatorConfig {
            validity_threshold: 0.6,
            ..Default::default()
        };
        let results = validator.validate(&config);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].verdict, Verdict::Valid);
        assert_eq!(results[0].validation_status, Verdict::Valid.status());
        assert_eq!(results[1].verdict, Verdict::Invalid);
    }

    #[test]
    fn record_is_never_its_own_candidate() {
        let records = vec![record("A", "A", "PB", "B"), record("B", "B", "PC", "C")];
        // Every parent vector matches every root vector perfectly, so the only
        // thing keeping a record's own parent entry out of its suggestions is
        // the self-exclusion rule.
        let v = vec![1.0f32, 0.0];
        let embeddings = EmbeddingTable::new(
            vec![Some(v.clone()), Some(v.clone())],
            vec![Some(v.clone()), Some(v.clone())],
        );
        let validator = RelationshipValidator::new(records, embeddings).unwrap();

        let config = ValidatorConfig {
            suggestion_threshold: 0.0,
            ..Default::default()
        };
        let results = validator.validate(&config);

        // A's only candidate is B's parent entry (PC) and vice versa.
        assert_eq!(results[0].suggested_parents.len(), 1);
        assert_eq!(results[0].suggested_parents[0].parent_key, "PC");
        assert_eq!(results[1].suggested_parents.len(), 1);
        assert_eq!(results[1].suggested_parents[0].parent_key, "PB");
    }

    #[test]
    fn parentless_record_is_excluded_from_candidate_pools() {
        let records = vec![
            record("A", "A", "PB", "B"),
            record("B", "B", "PC", "C"),
            orphan("C", "C"),
        ];
        let v = vec![1.0f32, 0.0];
        let embeddings = EmbeddingTable::new(
            vec![Some(v.clone()), Some(v.clone()), Some(v.clone())],
            vec![Some(v.clone()), Some(v.clone()), Some(v.clone())],
        );
        let validator = RelationshipValidator::new(records, embeddings).unwrap();

        let config = ValidatorConfig {
            suggestion_threshold: 0.0,
            ..Default::default()
        };
        let results = validator.validate(&config);

        // The orphan contributes no parent-role entry: each record's pool
        // holds only the other parent-bearing record.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].suggested_parents.len(), 1);
        assert_eq!(results[0].suggested_parents[0].parent_key, "PC");
        assert_eq!(results[1].suggested_parents.len(), 1);
        assert_eq!(results[1].suggested_parents[0].parent_key, "PB");
    }

    #[test]
    fn missing_embedding_scores_zero_and_fails() {
        let records = vec![record("A", "A", "PB", "B")];
        let embeddings = EmbeddingTable::new(vec![None], vec![Some(vec![1.0, 0.0])]);
        let validator = RelationshipValidator::new(records, embeddings).unwrap();

        let results = validator.validate(&ValidatorConfig::default());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].current_parent.similarity_score, 0.0);
        assert_eq!(results[0].verdict, Verdict::Invalid);
    }

    #[test]
    fn improvement_is_suggestion_score_minus_current_score() {
        // A's declared parent is a poor fit; B's parent entry fits perfectly.
        let records = vec![record("A", "A", "PB", "B"), record("B", "B", "PC", "C")];
        let embeddings = EmbeddingTable::new(
            vec![Some(vec![1.0, 0.0]), Some(vec![0.0, 1.0])],
            vec![Some(vec![0.0, 1.0]), Some(vec![1.0, 0.0])],
        );
        let validator = RelationshipValidator::new(records, embeddings).unwrap();

        let config = ValidatorConfig {
            suggestion_threshold: 0.5,
            ..Default::default()
        };
        let results = validator.validate(&config);

        let a = &results[0];
        assert_eq!(a.current_parent.similarity_score, 0.0);
        assert_eq!(a.suggested_parents.len(), 1);
        let suggestion = &a.suggested_parents[0];
        assert!((suggestion.similarity_score - 1.0).abs() < 1e-6);
        assert!((suggestion.improvement - 1.0).abs() < 1e-6);
    }

    #[test]
    fn max_suggestions_zero_yields_no_suggestions() {
        let records = vec![record("A", "A", "PB", "B"), record("B", "B", "PC", "C")];
        let v = vec![1.0f32, 0.0];
        let embeddings = EmbeddingTable::new(
            vec![Some(v.clone()), Some(v.clone())],
            vec![Some(v.clone()), Some(v.clone())],
        );
        let validator = RelationshipValidator::new(records, embeddings).unwrap();

        let config = ValidatorConfig {
            max_suggestions: 0,
            suggestion_threshold: 0.0,
            ..Default::default()
        };
        let results = validator.validate(&config);

        assert!(results.iter().all(|r| r.suggested_parents.is_empty()));
    }

    #[test]
    fn validate_is_deterministic_across_calls() {
        let records = vec![
            record("A", "A", "PB", "B"),
            record("B", "B", "PC", "C"),
            record("C", "C", "PA", "A"),
        ];
        let embeddings = EmbeddingTable::new(
            vec![
                Some(vec![1.0, 0.2]),
                Some(vec![0.3, 0.9]),
                Some(vec![0.7, 0.7]),
            ],
            vec![
                Some(vec![0.9, 0.1]),
                Some(vec![0.2, 1.0]),
                Some(vec![0.6, 0.8]),
            ],
        );
        let validator = RelationshipValidator::new(records, embeddings).unwrap();

        let config = ValidatorConfig {
            suggestion_threshold: 0.0,
            ..Default::default()
        };
        let first = validator.validate(&config);
        let second = validator.validate(&config);

        assert_eq!(first, second);
    }
}
