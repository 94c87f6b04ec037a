//! Position Matcher: resolves a generator-written title to a canonical history record.
//!
//! Generated titles are often paraphrased ("Sr. Backend Engineer" for "Senior Backend
//! Engineer"), so matching is a strictly ordered cascade. Each tier is tried against the
//! whole history before the next tier starts; the first hit wins:
//!
//! 1. exact match after trim + case-fold
//! 2. either string contains the other
//! 3. word overlap above `word_overlap_ratio` (words longer than `min_word_len` only)
//! 4. Levenshtein distance of at most `max_edit_distance`

use serde::{Deserialize, Serialize};

use crate::history::models::PositionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatcherConfig {
    /// Tier 3 succeeds when overlap is strictly greater than this.
    pub word_overlap_ratio: f64,
    /// Tier 4 succeeds when distance is less than or equal to this.
    pub max_edit_distance: usize,
    /// Words of this length or shorter are ignored by tier 3.
    pub min_word_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            word_overlap_ratio: 0.5,
            max_edit_distance: 3,
            min_word_len: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Contains,
    WordOverlap,
    EditDistance,
}

#[derive(Debug, Clone, Copy)]
pub struct PositionMatch<'a> {
    pub index: usize,
    pub record: &'a PositionRecord,
    pub tier: MatchTier,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Share of significant words two titles have in common, relative to the longer title.
pub fn word_overlap(a: &str, b: &str, min_word_len: usize) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    let words_a: Vec<&str> = a
        .split_whitespace()
        .filter(|w| w.chars().count() > min_word_len)
        .collect();
    let words_b: Vec<&str> = b
        .split_whitespace()
        .filter(|w| w.chars().count() > min_word_len)
        .collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let overlap = words_a.iter().filter(|w| words_b.contains(w)).count();
    overlap as f64 / words_a.len().max(words_b.len()) as f64
}

/// Runs the four-tier cascade. Returns `None` for a blank title or empty history.
pub fn match_position<'a>(
    title: &str,
    history: &'a [PositionRecord],
    config: &MatcherConfig,
) -> Option<PositionMatch<'a>> {
    let target = normalize(title);
    if target.is_empty() || history.is_empty() {
        return None;
    }

    let candidates: Vec<(usize, &PositionRecord, String)> = history
        .iter()
        .enumerate()
        .map(|(index, record)| (index, record, normalize(&record.title)))
        .filter(|(_, _, canonical)| !canonical.is_empty())
        .collect();

    let hit = |tier: MatchTier, accept: &dyn Fn(&str) -> bool| {
        candidates
            .iter()
            .find(|(_, _, canonical)| accept(canonical.as_str()))
            .map(|(index, record, _)| PositionMatch {
                index: *index,
                record: *record,
                tier,
            })
    };

    hit(MatchTier::Exact, &|canonical: &str| canonical == target)
        .or_else(|| {
            hit(MatchTier::Contains, &|canonical: &str| {
                canonical.contains(target.as_str()) || target.contains(canonical)
            })
        })
        .or_else(|| {
            hit(MatchTier::WordOverlap, &|canonical: &str| {
                word_overlap(&target, canonical, config.min_word_len) > config.word_overlap_ratio
            })
        })
        .or_else(|| {
            hit(MatchTier::EditDistance, &|canonical: &str| {
                strsim::levenshtein(&target, canonical) <= config.max_edit_distance
            })
        })
}

/// Convenience wrapper with default thresholds.
pub fn find_best_match<'a>(
    title: &str,
    history: &'a [PositionRecord],
) -> Option<&'a PositionRecord> {
    match_position(title, history, &MatcherConfig::default()).map(|m| m.record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> PositionRecord {
        PositionRecord {
            title: title.to_string(),
            company: "Acme".to_string(),
            dates: "2020-Present".to_string(),
            is_independent: false,
            bullets: vec![],
        }
    }

    #[test]
    fn test_exact_match_ignores_case_and_whitespace() {
        let history = vec![record("Staff Engineer"), record("Data Analyst")];
        let m = match_position("  data ANALYST ", &history, &MatcherConfig::default()).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.tier, MatchTier::Exact);
    }

    #[test]
    fn test_exact_tier_beats_earlier_contains_hit() {
        // "Engineer" is contained in the first record, but the second is exact.
        let history = vec![record("Senior Engineer"), record("Engineer")];
        let m = match_position("Engineer", &history, &MatcherConfig::default()).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.tier, MatchTier::Exact);
    }

    #[test]
    fn test_contains_both_directions() {
        let history = vec![record("Platform Engineer")];
        let config = MatcherConfig::default();
        let shorter = match_position("Platform", &history, &config).unwrap();
        assert_eq!(shorter.tier, MatchTier::Contains);
        let longer =
            match_position("Platform Engineer (Independent Project)", &history, &config).unwrap();
        assert_eq!(longer.tier, MatchTier::Contains);
    }

    #[test]
    fn test_abbreviated_senior_title_resolves() {
        let history = vec![record("Senior Backend Engineer")];
        let m =
            match_position("Sr. Backend Engineer", &history, &MatcherConfig::default()).unwrap();
        assert_eq!(m.record.title, "Senior Backend Engineer");
        assert!(matches!(
            m.tier,
            MatchTier::WordOverlap | MatchTier::EditDistance
        ));
    }

    #[test]
    fn test_word_overlap_ratio_uses_longer_title() {
        // 2 shared words of 3 significant words in the longer title
        let ratio = word_overlap("Backend Platform Engineer", "Backend Engineer", 2);
        assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_overlap_skips_short_words() {
        assert_eq!(word_overlap("VP of IT", "VP of HR", 2), 0.0);
    }

    #[test]
    fn test_edit_distance_tier() {
        let history = vec![record("Data Analyst")];
        // two typos, no shared significant words
        let m = match_position("Dta Analist", &history, &MatcherConfig::default()).unwrap();
        assert_eq!(m.tier, MatchTier::EditDistance);
    }

    #[test]
    fn test_no_match_beyond_edit_threshold() {
        let history = vec![record("Data Analyst")];
        assert!(match_position("Product Designer", &history, &MatcherConfig::default()).is_none());
    }

    #[test]
    fn test_blank_title_and_empty_history() {
        let history = vec![record("Engineer")];
        assert!(find_best_match("   ", &history).is_none());
        assert!(find_best_match("Engineer", &[]).is_none());
    }

    #[test]
    fn test_blank_canonical_title_is_never_matched() {
        let history = vec![record(""), record("Engineer")];
        let m = match_position("Engineer II", &history, &MatcherConfig::default()).unwrap();
        assert_eq!(m.index, 1);
    }
}
