//! Cosine similarity between embedding vectors.
//!
//! Pure functions with no side effects. Absent input is a legitimate state
//! for malformed records, so it maps to a 0.0 sentinel instead of an error;
//! only a dimension mismatch is reported to the caller (as `None`) so the
//! ranker can exclude the offending candidate.

/// Computes cosine similarity between two vectors of equal dimension.
///
/// Returns `None` when the dimensions differ (malformed vector) and
/// `Some(0.0)` when either vector has zero magnitude. Otherwise the result
/// lies in `[-1.0, 1.0]`.
pub fn cosine(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() {
        return None;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }

    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Scores a pair of optional vectors.
///
/// Absence on either side, a dimension mismatch, or a degenerate zero vector
/// all yield `0.0`; the caller never has to distinguish these cases when it
/// only needs a score.
pub fn score(a: Option<&[f32]>, b: Option<&[f32]>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => cosine(a, b).unwrap_or(0.0),
        _ => 0.0,
    }
}
