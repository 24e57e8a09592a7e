use std::fmt;

use serde::{Deserialize, Serialize};

/// Verdict on an existing parent–child relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Valid,
    Invalid,
}

impl Verdict {
    /// The PASS/FAIL projection of the verdict.
    ///
    /// Downstream consumers read both spellings, so the result carries the
    /// verdict once and derives the status from it.
    pub fn status(self) -> ValidationStatus {
        match self {
            Verdict::Valid => ValidationStatus::Pass,
            Verdict::Invalid => ValidationStatus::Fail,
        }
    }

    pub fn is_valid(self) -> bool {
        self == Verdict::Valid
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid => write!(f, "VALID"),
            Verdict::Invalid => write!(f, "INVALID"),
        }
    }
}

/// PASS/FAIL mirror of [`Verdict`], kept as a distinct type for consumers
/// that key on status rather than validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Pass,
    Fail,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "PASS"),
            ValidationStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// The declared parent of a validated record, with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentParent {
    pub parent_key: String,
    pub parent_name: String,
    pub similarity_score: f32,
}

/// One ranked alternative-parent suggestion.
///
/// `improvement` is the suggestion's score minus the current relationship's
/// score; positive means the alternative fits better than the declared parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedParent {
    pub parent_key: String,
    pub parent_name: String,
    pub similarity_score: f32,
    pub improvement: f32,
}

/// Validation outcome for one parent-bearing record.
///
/// `suggested_parents` is sorted by similarity descending, holds at most the
/// configured maximum, and every entry clears the suggestion threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub root_key: String,
    pub root_name: String,
    pub current_parent: CurrentParent,
    pub suggested_parents: Vec<SuggestedParent>,
    #[serde(rename = "validation")]
    pub verdict: Verdict,
    pub validation_status: ValidationStatus,
}
