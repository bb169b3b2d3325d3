//! # Fuzzy Matching
//!
//! Character-level similarity scoring of a token against a pool of known
//! surface forms. The score is the indel ratio
//! `200 * LCS(a, b) / (len(a) + len(b))`, so identical strings score 100 and
//! strings sharing no characters score 0.
//!
//! The matcher only ranks. Deciding whether the best candidate is good
//! enough is left to the caller.

use serde::Serialize;
use tracing::trace;

use crate::errors::{AppError, AppResult};

/// A ranked candidate from the pool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyCandidate {
    pub candidate: String,
    /// Similarity score in [0, 100]
    pub score: f64,
}

/// Ranks pool entries by similarity to a token
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    default_limit: usize,
}

impl FuzzyMatcher {
    /// Create a matcher returning at most `default_limit` candidates from
    /// [`FuzzyMatcher::best_matches`]
    pub fn new(default_limit: usize) -> Self {
        Self { default_limit }
    }

    /// Score `token` against every pool entry.
    ///
    /// Results are ordered by descending score; ties keep pool order. At most
    /// `limit` candidates are returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] when the pool is empty.
    pub fn match_candidates<S: AsRef<str>>(
        &self,
        token: &str,
        pool: &[S],
        limit: usize,
    ) -> AppResult<Vec<FuzzyCandidate>> {
        if pool.is_empty() {
            return Err(AppError::InvalidInput(
                "Fuzzy matching requires a non-empty candidate pool".to_string(),
            ));
        }

        let mut scored: Vec<FuzzyCandidate> = pool
            .iter()
            .map(|candidate| FuzzyCandidate {
                candidate: candidate.as_ref().to_string(),
                score: similarity(token, candidate.as_ref()),
            })
            .collect();

        // Stable sort keeps pool order among equal scores
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);

        trace!(token = %token, candidates = ?scored, "Fuzzy candidates ranked");
        Ok(scored)
    }

    /// [`FuzzyMatcher::match_candidates`] with the matcher's default limit
    pub fn best_matches<S: AsRef<str>>(&self, token: &str, pool: &[S]) -> AppResult<Vec<FuzzyCandidate>> {
        self.match_candidates(token, pool, self.default_limit)
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Indel similarity ratio of two strings in [0, 100]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 100.0;
    }

    let lcs = longest_common_subsequence(&a_chars, &b_chars);
    (200 * lcs) as f64 / total as f64
}

/// Length of the longest common subsequence, two-row dynamic programming
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for &a_char in a {
        for (j, &b_char) in b.iter().enumerate() {
            current[j + 1] = if a_char == b_char {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
