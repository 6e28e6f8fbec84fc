//! Fuzzy name index

use std::collections::HashMap;

use crate::error::{Result, StoreError};

/// Default edit budget for approximate lookups
pub const DEFAULT_MAX_DISTANCE: usize = 2;

const INDEL_COST: usize = 1;
const SUBSTITUTION_COST: usize = 2;

/// Maps names to item codes
#[derive(Debug, Default)]
pub struct FuzzyIndex {
    names: HashMap<String, i64>,
}

impl FuzzyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `name` to `code`, replacing any previous mapping for that name
    pub fn insert(&mut self, name: &str, code: i64) {
        self.names.insert(name.to_string(), code);
    }

    /// Exact lookup
    pub fn select(&self, name: &str) -> Result<i64> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::name_not_found(name))
    }

    /// Remove every name mapped to `code`, returning the removed names
    pub fn del(&mut self, code: i64) -> Vec<String> {
        let removed: Vec<String> = self
            .names
            .iter()
            .filter(|(_, c)| **c == code)
            .map(|(name, _)| name.clone())
            .collect();

        for name in &removed {
            self.names.remove(name);
        }

        removed
    }

    /// Codes whose name is within `max_distance` of `name`
    ///
    /// A match also needs a distance strictly below the longer of the two
    /// lengths, so short names never match everything. Results are ordered
    /// by distance, then code, without duplicates. An empty query matches
    /// nothing.
    pub fn find(&self, name: &str, max_distance: usize) -> Vec<i64> {
        if name.is_empty() {
            return Vec::new();
        }

        let query: Vec<char> = name.chars().collect();
        let mut matches: Vec<(usize, i64)> = self
            .names
            .iter()
            .filter_map(|(candidate, &code)| {
                let candidate: Vec<char> = candidate.chars().collect();
                let distance = distance_chars(&query, &candidate);
                let longest = query.len().max(candidate.len());
                (distance <= max_distance && distance < longest).then_some((distance, code))
            })
            .collect();

        matches.sort_unstable();

        let mut codes: Vec<i64> = Vec::with_capacity(matches.len());
        for (_, code) in matches {
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        codes
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Edit distance with insert/delete cost 1 and substitution cost 2
///
/// Computed over `char`s, so a multi-byte character is one edit unit.
pub fn weighted_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    distance_chars(&a, &b)
}

fn distance_chars(a: &[char], b: &[char]) -> usize {
    // dp[i][j]: cost of turning a[..i] into b[..j]
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i * INDEL_COST;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j * INDEL_COST;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = if a[i - 1] == b[j - 1] { 0 } else { SUBSTITUTION_COST };
            dp[i][j] = (dp[i - 1][j] + INDEL_COST)
                .min(dp[i][j - 1] + INDEL_COST)
                .min(dp[i - 1][j - 1] + substitution);
        }
    }

    dp[a.len()][b.len()]
}
