//! Tolerant name matching for entities typed or spoken by users.
//!
//! Each key is scored by the best approximate occurrence of the query anywhere
//! inside it: `edits / query_len + match_start / distance`. Zero is an exact
//! match at the start of the key; candidates scoring above the threshold are
//! rejected.

use crate::config::MatchingConfig;
use crate::domain::entity::{Network, Organization};

/// Something that can be looked up by one or more free-text keys.
pub trait Matchable {
    fn match_keys(&self) -> Vec<&str>;
}

impl Matchable for Organization {
    fn match_keys(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Matchable for Network {
    fn match_keys(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
    distance: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self { threshold: 0.6, distance: 100.0 }
    }
}

impl From<&MatchingConfig> for FuzzyMatcher {
    fn from(config: &MatchingConfig) -> Self {
        Self::new(config.threshold, config.distance)
    }
}

impl FuzzyMatcher {
    pub fn new(threshold: f64, distance: u32) -> Self {
        Self { threshold, distance: f64::from(distance.max(1)) }
    }

    /// Best-scoring candidate within tolerance; the earliest candidate wins
    /// ties.
    pub fn find<'a, T: Matchable>(&self, candidates: &'a [T], query: &str) -> Option<&'a T> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(&'a T, f64)> = None;
        for candidate in candidates {
            let Some(score) = candidate
                .match_keys()
                .into_iter()
                .filter_map(|key| self.score(query, key))
                .min_by(f64::total_cmp)
            else {
                continue;
            };

            if score > self.threshold {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((candidate, score));
            }
        }

        best.map(|(candidate, _)| candidate)
    }

    /// Lower is better; `None` when either side is empty.
    pub fn score(&self, query: &str, key: &str) -> Option<f64> {
        let pattern: Vec<char> = query.trim().to_lowercase().chars().collect();
        let text: Vec<char> = key.trim().to_lowercase().chars().collect();
        if pattern.is_empty() || text.is_empty() {
            return None;
        }
        if pattern == text {
            return Some(0.0);
        }

        let (edits, start) = best_occurrence(&pattern, &text);
        Some(edits as f64 / pattern.len() as f64 + start as f64 / self.distance)
    }
}

/// Minimum edit distance between `pattern` and any substring of `text`,
/// with the start offset of that substring. Earlier occurrences win ties.
fn best_occurrence(pattern: &[char], text: &[char]) -> (usize, usize) {
    let columns = text.len() + 1;
    // Row 0: matching an empty pattern prefix costs nothing and may start anywhere.
    let mut previous: Vec<(usize, usize)> = (0..columns).map(|column| (0, column)).collect();
    let mut current = vec![(0, 0); columns];

    for (row, pattern_char) in pattern.iter().enumerate() {
        current[0] = (row + 1, 0);
        for column in 1..columns {
            let substitution = usize::from(text[column - 1] != *pattern_char);
            let diagonal = (previous[column - 1].0 + substitution, previous[column - 1].1);
            let skip_pattern = (previous[column].0 + 1, previous[column].1);
            let skip_text = (current[column - 1].0 + 1, current[column - 1].1);
            current[column] = [diagonal, skip_pattern, skip_text]
                .into_iter()
                .min_by_key(|(cost, start)| (*cost, *start))
                .unwrap_or(diagonal);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous.into_iter().min_by_key(|(cost, start)| (*cost, *start)).unwrap_or((pattern.len(), 0))
}

#[cfg(test)]
mod tests {
    use super::FuzzyMatcher;
    use crate::domain::entity::{Network, Organization};

    fn organizations() -> Vec<Organization> {
        vec![
            Organization::new("1", "DevNet Sandbox"),
            Organization::new("2", "Read Write Sandbox"),
            Organization::new("3", "Globex Industries"),
        ]
    }

    #[test]
    fn exact_name_scores_zero() {
        let matcher = FuzzyMatcher::default();
        assert_eq!(matcher.score("Globex Industries", "globex industries"), Some(0.0));
    }

    #[test]
    fn typo_within_tolerance_resolves() {
        let matcher = FuzzyMatcher::default();
        let orgs = organizations();

        let found = matcher.find(&orgs, "read writ sandbx").expect("should match");
        assert_eq!(found.name, "Read Write Sandbox");

        let found = matcher.find(&orgs, "GLOBEX").expect("case-insensitive partial match");
        assert_eq!(found.name, "Globex Industries");
    }

    #[test]
    fn partial_name_matches_anywhere_in_key() {
        let matcher = FuzzyMatcher::default();
        let networks = vec![
            Network::new("N1", "Branch Office", "Acme"),
            Network::new("N2", "Sandbox 3", "Acme"),
        ];

        let found = matcher.find(&networks, "sandbox 3").expect("should match");
        assert_eq!(found.id.0, "N2");

        let found = matcher.find(&networks, "office").expect("suffix match");
        assert_eq!(found.id.0, "N1");
    }

    #[test]
    fn far_query_returns_none() {
        let matcher = FuzzyMatcher::default();
        assert!(matcher.find(&organizations(), "zzzzqqqq").is_none());
        assert!(matcher.find(&organizations(), "   ").is_none());
        assert!(matcher.find::<Organization>(&[], "sandbox").is_none());
    }

    #[test]
    fn ties_prefer_first_candidate() {
        let matcher = FuzzyMatcher::default();
        let orgs = vec![Organization::new("a", "Lab"), Organization::new("b", "Lab")];

        let found = matcher.find(&orgs, "lab").expect("match");
        assert_eq!(found.id.0, "a");
    }

    #[test]
    fn stricter_threshold_rejects_typos() {
        let strict = FuzzyMatcher::new(0.0, 100);
        let orgs = organizations();

        assert!(strict.find(&orgs, "globx industries").is_none());
        assert_eq!(strict.find(&orgs, "Globex Industries").map(|org| org.id.0.as_str()), Some("3"));
    }

    #[test]
    fn later_occurrences_cost_more() {
        let matcher = FuzzyMatcher::default();
        let early = matcher.score("lab", "lab north").expect("score");
        let late = matcher.score("lab", "north campus lab").expect("score");
        assert!(early < late);
    }
}
