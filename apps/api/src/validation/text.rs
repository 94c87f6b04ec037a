//! Lexical helpers shared by the rule families.
//!
//! Everything here is a pure function over `&str`. The heuristics are deliberately simple
//! pattern matches; rule modules decide what a hit means.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

// ────────────────────────────────────────────────────────────────────────────
// Word lists
// ────────────────────────────────────────────────────────────────────────────

pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "that", "which", "who", "whom", "this",
    "these", "those", "it", "its", "as", "from", "into", "through", "during", "before", "after",
    "above", "below", "between", "under", "over",
];

/// Phrases that overstate scope for an early-career candidate.
pub const SENIOR_SCOPE_PHRASES: &[&str] = &[
    "company-wide",
    "enterprise-wide",
    "organization-wide",
    "global",
    "international",
    "multinational",
    "C-suite",
    "executive",
    "board",
    "millions",
    "billion",
    "hundreds of employees",
    "1000+ employees",
];

/// Hands-on verbs: a keyword cited under one of these is strong evidence.
pub const TIER1_VERBS: &[&str] = &[
    "built", "developed", "implemented", "deployed", "configured", "managed", "administered",
    "operated", "maintained", "engineered", "architected", "debugged", "troubleshot",
    "resolved", "migrated", "upgraded", "scaled", "optimized",
];

/// Documentation-only verbs: a keyword cited under one of these is weak evidence.
pub const TIER3_VERBS: &[&str] = &[
    "documented", "wrote", "researched", "evaluated", "assessed", "analyzed", "interviewed",
    "gathered", "trained", "observed", "shadowed",
];

/// Acronyms that should be spelled out on first use.
pub const ACRONYMS: &[(&str, &str)] = &[
    ("ML", "Machine Learning"),
    ("AI", "Artificial Intelligence"),
    ("NLP", "Natural Language Processing"),
    ("API", "Application Programming Interface"),
    ("CI", "Continuous Integration"),
    ("CD", "Continuous Deployment"),
    ("AWS", "Amazon Web Services"),
    ("GCP", "Google Cloud Platform"),
    ("K8s", "Kubernetes"),
    ("ETL", "Extract Transform Load"),
    ("SQL", "Structured Query Language"),
    ("KPI", "Key Performance Indicator"),
    ("ROI", "Return on Investment"),
    ("SaaS", "Software as a Service"),
    ("REST", "Representational State Transfer"),
];

// ────────────────────────────────────────────────────────────────────────────
// Patterns
// ────────────────────────────────────────────────────────────────────────────

static PERCENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+%").unwrap());
static CURRENCY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\$[\d,]+[KMB]?").unwrap());
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\+?").unwrap());
static MULTIPLIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\d+x").unwrap());
static BARE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{2,}\b").unwrap());
static YEARS_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\+?\s*(?:years?|yrs?)").unwrap());
static TEAM_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\+?\s*(?:teams?|engineers?|stakeholders?|members?)").unwrap()
});
static DENSITY_METRIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\d+%|\$[\d,]+[KMB]?|\d+x|\b\d{2,}\b|\d+\+?\s*(?:hours?|days?|weeks?|months?|years?)",
    )
    .unwrap()
});
static RECENT_METRIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+%|\$[\d,]+|\d+x|\b\d{2,}\b").unwrap());
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static HIGH_PERCENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{3,})\s*%").unwrap());
static REDUCED_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)reduced.*?by\s+(\d+)\s*%").unwrap());
static LARGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{7,}\b").unwrap());
static LIMITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:no|limited|lacking|without)\s+(\w+(?:\s+\w+)?)").unwrap()
});
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

static ACRONYM_PATTERNS: LazyLock<Vec<(&'static str, &'static str, Regex)>> =
    LazyLock::new(|| {
        ACRONYMS
            .iter()
            .map(|(acronym, expansion)| {
                let pattern = format!(r"\b{}\b", regex::escape(acronym));
                (*acronym, *expansion, Regex::new(&pattern).unwrap())
            })
            .collect()
    });

fn push_unique(into: &mut Vec<String>, value: String) {
    if !into.contains(&value) {
        into.push(value);
    }
}

/// Runs each pattern in turn. A match lying inside an already claimed span (the `40` in
/// `40%`) is skipped, so each quantity is reported once.
fn collect_claims(patterns: &[&Regex], text: &str, mut claimed: Vec<Range<usize>>) -> Vec<String> {
    let mut metrics = Vec::new();
    for pattern in patterns {
        for m in pattern.find_iter(text) {
            let range = m.range();
            if claimed
                .iter()
                .any(|c| c.start <= range.start && range.end <= c.end)
            {
                continue;
            }
            claimed.push(range);
            push_unique(&mut metrics, m.as_str().to_string());
        }
    }
    metrics
}

// ────────────────────────────────────────────────────────────────────────────
// Metric extraction
// ────────────────────────────────────────────────────────────────────────────

/// Broad extraction used to trace bullet metrics back to a position: percentages,
/// currency, multipliers and every remaining number (with optional `+`). Case is preserved.
pub fn traceability_metrics(text: &str) -> Vec<String> {
    collect_claims(&[&PERCENT, &CURRENCY, &MULTIPLIER, &NUMBER], text, vec![])
}

/// Narrower extraction used to check that original metrics survive a rewrite:
/// percentages, currency, multipliers, numbers of two or more digits. Lowercased.
pub fn preservation_metrics(text: &str) -> Vec<String> {
    let mut metrics = Vec::new();
    for metric in collect_claims(&[&PERCENT, &CURRENCY, &MULTIPLIER, &BARE_NUMBER], text, vec![]) {
        push_unique(&mut metrics, metric.to_lowercase());
    }
    metrics
}

/// Quantified claims in a summary. Tenure phrases ("8+ years") and any number inside them
/// are not claims and are left out.
pub fn summary_metrics(text: &str) -> Vec<String> {
    let tenure: Vec<Range<usize>> = YEARS_PHRASE.find_iter(text).map(|m| m.range()).collect();
    collect_claims(
        &[&PERCENT, &CURRENCY, &TEAM_COUNT, &MULTIPLIER, &BARE_NUMBER],
        text,
        tenure,
    )
}

/// First run of digits in a metric token.
pub fn first_number(metric: &str) -> Option<&str> {
    DIGITS.find(metric).map(|m| m.as_str())
}

/// Whether a bullet counts toward metrics density.
pub fn has_density_metric(text: &str) -> bool {
    DENSITY_METRIC.is_match(text)
}

pub fn recent_metric_count(text: &str) -> usize {
    RECENT_METRIC.find_iter(text).count()
}

/// Percentages of three or more digits, with the numeric value.
pub fn high_percentages(text: &str) -> Vec<(String, u64)> {
    HIGH_PERCENT
        .captures_iter(text)
        .filter_map(|caps| {
            let value = caps[1].parse().ok()?;
            Some((caps[0].to_string(), value))
        })
        .collect()
}

/// Values from "reduced ... by N%" claims.
pub fn reduction_percentages(text: &str) -> Vec<u64> {
    REDUCED_BY
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Bare numbers of seven or more digits.
pub fn large_numbers(text: &str) -> Vec<&str> {
    LARGE_NUMBER.find_iter(text).map(|m| m.as_str()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Words, sentences, phrases
// ────────────────────────────────────────────────────────────────────────────

fn strip_punctuation(text: &str) -> String {
    NON_WORD.replace_all(text, "").into_owned()
}

/// Lowercased content words: punctuation stripped, stop words and words of two characters
/// or fewer removed. Duplicates are kept.
pub fn content_keywords(text: &str) -> Vec<String> {
    strip_punctuation(&text.to_lowercase())
        .split_whitespace()
        .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Non-blank sentences split on `.`, `!` and `?`.
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_END
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Counts every `n`-word phrase in `text`, in first-seen order. Words of two characters or
/// fewer are dropped before windowing; phrases of `min_chars` characters or fewer are ignored.
pub fn phrase_counts(text: &str, n: usize, min_chars: usize) -> Vec<(String, usize)> {
    let cleaned = strip_punctuation(&text.to_lowercase());
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .collect();

    let mut order: Vec<(String, usize)> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();
    if n == 0 {
        return order;
    }

    for window in words.windows(n) {
        let phrase = window.join(" ");
        if phrase.chars().count() <= min_chars {
            continue;
        }
        match slot.get(&phrase) {
            Some(&i) => order[i].1 += 1,
            None => {
                slot.insert(phrase.clone(), order.len());
                order.push((phrase, 1));
            }
        }
    }
    order
}

/// Whole-word, case-insensitive occurrences of `keyword` in `text`.
pub fn keyword_occurrences(text: &str, keyword: &str) -> usize {
    if keyword.trim().is_empty() {
        return 0;
    }
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword)))
        .map(|re| re.find_iter(text).count())
        .unwrap_or(0)
}

/// Skills named in "no X" / "limited X" / "lacking X" / "without X" statements, up to two
/// words each, lowercased.
pub fn limitation_keywords(limitations: &[String]) -> Vec<String> {
    let mut keywords = Vec::new();
    for limitation in limitations {
        for caps in LIMITATION.captures_iter(limitation) {
            push_unique(&mut keywords, caps[1].to_lowercase());
        }
    }
    keywords
}

pub fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// Evidence tier of a bullet's leading verb: `Some(3)` for documentation verbs, `Some(1)`
/// for hands-on verbs, `None` when neither list applies.
pub fn verb_evidence_tier(bullet: &str) -> Option<u8> {
    let first = first_word(bullet).to_lowercase();
    if TIER3_VERBS.iter().any(|v| first.starts_with(v)) {
        Some(3)
    } else if TIER1_VERBS.iter().any(|v| first.starts_with(v)) {
        Some(1)
    } else {
        None
    }
}

pub fn contains_long_dash(text: &str) -> bool {
    text.contains('\u{2014}') || text.contains('\u{2013}')
}

/// Acronyms from [`ACRONYMS`] that appear in `text` before (or without) their expansion.
pub fn unexpanded_acronyms(text: &str) -> Vec<(&'static str, &'static str)> {
    let lower = text.to_ascii_lowercase();
    ACRONYM_PATTERNS
        .iter()
        .filter_map(|(acronym, expansion, pattern)| {
            let first_use = pattern.find(text)?.start();
            let expanded_at = lower.find(&expansion.to_ascii_lowercase());
            match expanded_at {
                Some(at) if at <= first_use => None,
                _ => Some((*acronym, *expansion)),
            }
        })
        .collect()
}
