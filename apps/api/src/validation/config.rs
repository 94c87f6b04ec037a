use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::history::matcher::MatcherConfig;

/// Inclusive bullet-count range, rendered as `min-max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletRange {
    pub min: usize,
    pub max: usize,
}

impl BulletRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl fmt::Display for BulletRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Every tunable threshold the pipeline uses. `Default` yields the calibrated values; the
/// service overrides a subset from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    /// Year that "Present" resolves to and recency is measured from.
    pub reference_year: i32,

    // chronology depth
    pub recency_years: i32,
    pub tenure_years: i32,
    pub recent_bullets: BulletRange,
    pub tenure_bullets: BulletRange,

    pub matcher: MatcherConfig,

    // bullet format and budget
    pub bullet_char_limit: usize,
    pub bullet_char_min: usize,
    pub min_total_words: usize,
    pub max_total_words: usize,

    // guardrails
    /// Summary sentence echoes a bullet when keyword overlap is strictly above this.
    pub summary_echo_ratio: f64,
    pub phrase_ngram_sizes: Vec<usize>,
    /// Phrases must be longer than this many characters to count.
    pub phrase_min_chars: usize,
    pub phrase_repeat_min: usize,
    pub narrative_min_requirements: usize,

    // keyword density
    pub max_keywords_per_bullet: usize,
    pub max_keyword_repeats: usize,

    /// Scope attribution applies below this many years of experience.
    pub junior_max_years: f64,

    // shared policy bands, in percent
    pub verb_critical_gap_pct: f64,
    pub verb_balanced_min_pct: f64,
    pub verb_balanced_max_pct: f64,
    pub verb_over_represented_pct: f64,
    pub metrics_density_min_pct: f64,
    pub metrics_density_max_pct: f64,

    // most recent position
    pub recent_min_bullets: usize,
    pub recent_min_metrics: usize,
}

impl ValidationConfig {
    /// Defaults pinned to a given reference year.
    pub fn for_year(reference_year: i32) -> Self {
        Self {
            reference_year,
            recency_years: 6,
            tenure_years: 5,
            recent_bullets: BulletRange::new(3, 5),
            tenure_bullets: BulletRange::new(2, 3),
            matcher: MatcherConfig::default(),
            bullet_char_limit: 210,
            bullet_char_min: 100,
            min_total_words: 350,
            max_total_words: 500,
            summary_echo_ratio: 0.5,
            phrase_ngram_sizes: vec![3, 4, 5],
            phrase_min_chars: 8,
            phrase_repeat_min: 3,
            narrative_min_requirements: 3,
            max_keywords_per_bullet: 3,
            max_keyword_repeats: 2,
            junior_max_years: 3.0,
            verb_critical_gap_pct: 5.0,
            verb_balanced_min_pct: 13.0,
            verb_balanced_max_pct: 27.0,
            verb_over_represented_pct: 28.0,
            metrics_density_min_pct: 70.0,
            metrics_density_max_pct: 80.0,
            recent_min_bullets: 3,
            recent_min_metrics: 2,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::for_year(chrono::Utc::now().year())
    }
}
