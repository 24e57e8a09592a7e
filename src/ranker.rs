//! Ranking of alternative-parent candidates by embedding similarity.

use std::cmp::Ordering;

use tracing::warn;

use crate::similarity;

/// One candidate parent offered to the ranker.
///
/// Borrows from the caller's records and embedding table; ranking never
/// mutates or takes ownership of candidate data.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub key: &'a str,
    pub name: &'a str,
    pub vector: Option<&'a [f32]>,
}

/// A candidate that cleared the threshold, with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    pub parent_key: String,
    pub parent_name: String,
    pub score: f32,
}

/// Ranks `candidates` against `target` by cosine similarity.
///
/// Scores every candidate, keeps those with `score >= threshold`, sorts by
/// score descending, and truncates to `top_n`. The sort is stable: candidates
/// with exactly equal scores keep their original order, so output is
/// reproducible across runs on identical input.
///
/// A candidate whose vector dimension does not match the target's is excluded
/// and surfaced as a warning; an absent vector on either side scores 0.0 and
/// stays in the running (it simply fails any positive threshold). An empty
/// return is a normal outcome, not an error.
pub fn rank(
    target: Option<&[f32]>,
    candidates: &[Candidate<'_>],
    top_n: usize,
    threshold: f32,
) -> Vec<RankedMatch> {
    let mut retained: Vec<RankedMatch> = Vec::new();

    for candidate in candidates {
        let score = match (target, candidate.vector) {
            (Some(target), Some(vector)) => match similarity::cosine(target, vector) {
                Some(score) => score,
                None => {
                    warn!(
                        parent_key = candidate.key,
                        target_dim = target.len(),
                        candidate_dim = vector.len(),
                        "excluding candidate with mismatched embedding dimension"
                    );
                    continue;
                }
            },
            _ => 0.0,
        };

        if score >= threshold {
            retained.push(RankedMatch {
                parent_key: candidate.key.to_string(),
                parent_name: candidate.name.to_string(),
                score,
            });
        }
    }

    // sort_by is stable, which preserves input order among equal scores
    retained.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    retained.truncate(top_n);
    retained
}
