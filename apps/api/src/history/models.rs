use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One position from the candidate's own history. Ground truth for every correction the
/// pipeline makes; never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    #[serde(rename = "position")]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub is_independent: bool,
    /// Original bullet text for this position, when the source had any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

impl PositionRecord {
    pub fn date_range(&self) -> Option<DateRange> {
        DateRange::parse(&self.dates)
    }

    /// Personal or portfolio work, either flagged explicitly or recognisable from the
    /// title/company wording.
    pub fn is_independent_work(&self) -> bool {
        let title = self.title.to_lowercase();
        let company = self.company.to_lowercase();
        self.is_independent
            || title.contains("independent")
            || title.contains("portfolio")
            || company.contains("personal project")
            || company.contains("independent")
    }
}

/// End of a date range. `Present` sorts after every concrete year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RangeEnd {
    Year(i32),
    Present,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: i32,
    pub end: RangeEnd,
}

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

impl DateRange {
    /// Parses free-form ranges such as `2013-2015`, `2022 – Present`, `Jan 2019 - Mar 2021`.
    ///
    /// Start is the first four-digit year. End is `Present` when the text says "present" or
    /// "current", otherwise the last year found (a single year is both start and end).
    pub fn parse(dates: &str) -> Option<Self> {
        let years: Vec<i32> = YEAR
            .find_iter(dates)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        let start = *years.first()?;

        let lower = dates.to_lowercase();
        let end = if lower.contains("present") || lower.contains("current") {
            RangeEnd::Present
        } else {
            RangeEnd::Year(*years.last().unwrap_or(&start))
        };

        Some(Self { start, end })
    }

    pub fn is_current(&self) -> bool {
        self.end == RangeEnd::Present
    }

    /// Concrete end year, with `Present` resolved to `current_year`.
    pub fn end_year(&self, current_year: i32) -> i32 {
        match self.end {
            RangeEnd::Year(year) => year,
            RangeEnd::Present => current_year,
        }
    }

    pub fn duration_years(&self, current_year: i32) -> i32 {
        self.end_year(current_year) - self.start
    }
}

/// How the canonical history was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsingMethod {
    Llm,
    Regex,
    Failed,
}

/// Output of the history parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParseResult {
    pub positions: Vec<PositionRecord>,
    pub parsing_method: ParsingMethod,
    pub errors: Vec<String>,
}

impl HistoryParseResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            positions: vec![],
            parsing_method: ParsingMethod::Failed,
            errors: vec![error.into()],
        }
    }

    /// No ground truth available. Callers continue, but the pipeline will bypass correction.
    pub fn is_degraded(&self) -> bool {
        self.positions.is_empty()
    }
}
