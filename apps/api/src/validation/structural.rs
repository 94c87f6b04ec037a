//! Structural tier. These rules know the ground truth and repair the content in place;
//! only bullet count and bullet format need the generator to try again.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::Serialize;

use crate::history::matcher::match_position;
use crate::history::models::{DateRange, PositionRecord, RangeEnd};
use crate::validation::config::{BulletRange, ValidationConfig};
use crate::validation::issues::{IssueKind, RuleOutcome, Severity, ValidationIssue};
use crate::validation::models::{CandidatePosition, TargetDescription};

const INDEPENDENT_SUFFIX: &str = "(Independent Project)";
const PORTFOLIO_SUFFIX: &str = "(Portfolio Project)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EligibilityReason {
    #[serde(rename = "Recent/Current")]
    Recent,
    #[serde(rename = "Tenure Exception")]
    Tenure,
}

impl EligibilityReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EligibilityReason::Recent => "Recent/Current",
            EligibilityReason::Tenure => "Tenure Exception",
        }
    }
}

/// A canonical position that belongs in the generated output, for one pass only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligiblePosition<'a> {
    pub record: &'a PositionRecord,
    /// Index into the canonical history.
    pub index: usize,
    pub reason: EligibilityReason,
    pub bullet_count: BulletRange,
}

/// Chronology-depth policy. A position is eligible when it ended within `recency_years`
/// (or is current), or when it is older but lasted at least `tenure_years`. Positions with
/// unparseable dates are never eligible.
pub fn eligible_positions<'a>(
    history: &'a [PositionRecord],
    config: &ValidationConfig,
) -> Vec<EligiblePosition<'a>> {
    history
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let range = record.date_range()?;
            let end_year = range.end_year(config.reference_year);
            let years_since_end = config.reference_year - end_year;

            let (reason, bullet_count) =
                if range.is_current() || years_since_end <= config.recency_years {
                    (EligibilityReason::Recent, config.recent_bullets)
                } else if range.duration_years(config.reference_year) >= config.tenure_years {
                    (EligibilityReason::Tenure, config.tenure_bullets)
                } else {
                    return None;
                };

            Some(EligiblePosition {
                record,
                index,
                reason,
                bullet_count,
            })
        })
        .collect()
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Resolves a candidate title among the eligible records only, returning the history index.
fn resolve_eligible(
    title: &str,
    eligible: &[EligiblePosition<'_>],
    config: &ValidationConfig,
) -> Option<usize> {
    let records: Vec<PositionRecord> = eligible.iter().map(|e| e.record.clone()).collect();
    match_position(title, &records, &config.matcher).map(|m| eligible[m.index].index)
}

fn resolve_exact(title: &str, history: &[PositionRecord]) -> Option<usize> {
    let title = normalize_title(title);
    history
        .iter()
        .position(|record| normalize_title(&record.title) == title)
}

/// An exact title anywhere in the history wins; otherwise eligible records are tried before
/// the rest, so a paraphrased current title is never captured by an older record that
/// happens to share words with it.
fn resolve(
    title: &str,
    history: &[PositionRecord],
    eligible: &[EligiblePosition<'_>],
    config: &ValidationConfig,
) -> Option<usize> {
    resolve_exact(title, history)
        .or_else(|| resolve_eligible(title, eligible, config))
        .or_else(|| match_position(title, history, &config.matcher).map(|m| m.index))
}

/// A position is extra when its title exactly names a dated, ineligible record and no
/// eligible one.
fn is_extra(title: &str, history: &[PositionRecord], eligible_indices: &HashSet<usize>) -> bool {
    let title = normalize_title(title);
    let named: Vec<(usize, &PositionRecord)> = history
        .iter()
        .enumerate()
        .filter(|(_, record)| normalize_title(&record.title) == title)
        .collect();
    named.iter().all(|(index, _)| !eligible_indices.contains(index))
        && named.iter().any(|(_, record)| record.date_range().is_some())
}

fn overwrite_metadata(position: &mut CandidatePosition, record: &PositionRecord) {
    if position.title != record.title {
        position.title = canonical_title(&position.title, record);
    }
    position.company = record.company.clone();
    position.dates = record.dates.clone();
}

fn has_project_suffix(title: &str) -> bool {
    title.contains(INDEPENDENT_SUFFIX) || title.contains(PORTFOLIO_SUFFIX)
}

/// Title a candidate position should carry. Independent work gets a project suffix, keeping
/// the portfolio label when the candidate already chose it.
fn canonical_title(candidate: &str, record: &PositionRecord) -> String {
    if !record.is_independent_work() || has_project_suffix(&record.title) {
        return record.title.clone();
    }
    let suffix = if candidate.contains(PORTFOLIO_SUFFIX) {
        PORTFOLIO_SUFFIX
    } else {
        INDEPENDENT_SUFFIX
    };
    format!("{} {suffix}", record.title)
}

/// Compares the included positions against the eligible set.
///
/// A position is dropped only when its title exactly names an ineligible record; every
/// other position is resolved against eligible records alone, and what stays unresolved is
/// left for the metadata rule. Missing eligible positions are reported but cannot be
/// synthesised. When anything is off, metadata of every eligible match is also snapped
/// to the canonical values.
pub fn chronology_depth(
    positions: &[CandidatePosition],
    history: &[PositionRecord],
    eligible: &[EligiblePosition<'_>],
    config: &ValidationConfig,
) -> RuleOutcome {
    let eligible_indices: HashSet<usize> = eligible.iter().map(|e| e.index).collect();
    let extra_flags: Vec<bool> = positions
        .iter()
        .map(|p| is_extra(&p.title, history, &eligible_indices))
        .collect();
    let resolved: Vec<Option<usize>> = positions
        .iter()
        .zip(&extra_flags)
        .map(|(p, extra)| match resolve_exact(&p.title, history) {
            _ if *extra => None,
            Some(index) => eligible_indices.contains(&index).then_some(index),
            None => resolve_eligible(&p.title, eligible, config),
        })
        .collect();
    let included: HashSet<usize> = resolved.iter().flatten().copied().collect();

    let mut errors = Vec::new();

    let missing: Vec<&str> = eligible
        .iter()
        .filter(|e| !included.contains(&e.index))
        .map(|e| e.record.title.as_str())
        .collect();
    if !missing.is_empty() {
        errors.push(
            ValidationIssue::new(
                IssueKind::MissingPositions,
                Severity::Medium,
                format!(
                    "Missing {} chronology-eligible position(s)",
                    missing.len()
                ),
            )
            .with("positions", missing),
        );
    }

    let extra: Vec<&str> = positions
        .iter()
        .zip(&extra_flags)
        .filter(|(_, extra)| **extra)
        .map(|(p, _)| p.title.as_str())
        .collect();
    if !extra.is_empty() {
        errors.push(
            ValidationIssue::new(
                IssueKind::ExtraPositions,
                Severity::Medium,
                format!("Included {} ineligible position(s)", extra.len()),
            )
            .with("positions", extra),
        );
    }

    if errors.is_empty() {
        return RuleOutcome::default();
    }

    let corrected = positions
        .iter()
        .zip(resolved.iter().zip(&extra_flags))
        .filter(|(_, (_, extra))| !**extra)
        .map(|(position, (r, _))| {
            let mut position = position.clone();
            if let Some(index) = r {
                overwrite_metadata(&mut position, &history[*index]);
            }
            position
        })
        .collect();

    RuleOutcome {
        errors,
        warnings: vec![],
        corrected: Some(corrected),
    }
}

/// Snaps title, company and dates to the matched canonical record. Unresolvable positions
/// are kept verbatim with a warning.
pub fn position_metadata(
    positions: &[CandidatePosition],
    history: &[PositionRecord],
    eligible: &[EligiblePosition<'_>],
    target: &TargetDescription,
    config: &ValidationConfig,
) -> RuleOutcome {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut corrected = Vec::with_capacity(positions.len());
    let target_company = target
        .company
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    for (idx, position) in positions.iter().enumerate() {
        let Some(index) = resolve(&position.title, history, eligible, config) else {
            warnings.push(
                ValidationIssue::warning(
                    IssueKind::PositionNotInHistory,
                    format!(
                        "Position \"{}\" not found in job history (using fuzzy matching)",
                        position.title
                    ),
                )
                .at_index(idx)
                .for_position(&position.title),
            );
            corrected.push(position.clone());
            continue;
        };

        let record = &history[index];
        let mut fixed = position.clone();

        if position.title != record.title {
            let title = canonical_title(&position.title, record);
            if position.title != title {
                errors.push(
                    ValidationIssue::new(
                        IssueKind::WrongPositionTitle,
                        Severity::High,
                        "Position title mismatch",
                    )
                    .at_index(idx)
                    .with("llmValue", position.title.as_str())
                    .with("correctValue", title.as_str()),
                );
                fixed.title = title;
            }
        }

        if position.company != record.company {
            let used_jd_company = target_company
                .is_some_and(|jd| position.company.trim().eq_ignore_ascii_case(jd));
            let issue = if used_jd_company {
                ValidationIssue::new(
                    IssueKind::UsedJdCompany,
                    Severity::Critical,
                    format!(
                        "Used JD company \"{}\" instead of history company \"{}\"",
                        position.company, record.company
                    ),
                )
            } else {
                ValidationIssue::new(IssueKind::WrongCompany, Severity::High, "Company mismatch")
            };
            errors.push(
                issue
                    .at_index(idx)
                    .with("llmValue", position.company.as_str())
                    .with("correctValue", record.company.as_str()),
            );
            fixed.company = record.company.clone();
        }

        if position.dates != record.dates {
            errors.push(
                ValidationIssue::new(IssueKind::WrongDates, Severity::High, "Dates mismatch")
                    .at_index(idx)
                    .with("llmValue", position.dates.as_str())
                    .with("correctValue", record.dates.as_str()),
            );
            fixed.dates = record.dates.clone();
        }

        corrected.push(fixed);
    }

    let changed = corrected.as_slice() != positions;
    RuleOutcome {
        errors,
        warnings,
        corrected: changed.then_some(corrected),
    }
}

/// Sort key: end of the date range, `Present` highest, unparseable lowest.
fn end_key(position: &CandidatePosition) -> Option<RangeEnd> {
    DateRange::parse(&position.dates).map(|r| r.end)
}

/// Reverse-chronological order by end year. The sort is stable, so ties keep their order.
pub fn chronological_order(positions: &[CandidatePosition]) -> RuleOutcome {
    let keys: Vec<Option<RangeEnd>> = positions.iter().map(end_key).collect();
    let sorted = keys.windows(2).all(|pair| pair[0] >= pair[1]);
    if sorted {
        return RuleOutcome::default();
    }

    let mut reordered = positions.to_vec();
    reordered.sort_by_key(|p| Reverse(end_key(p)));

    RuleOutcome {
        errors: vec![ValidationIssue::new(
            IssueKind::WrongOrder,
            Severity::Medium,
            "Positions not in reverse chronological order",
        )],
        warnings: vec![],
        corrected: Some(reordered),
    }
}

/// Eligible positions must carry a bullet count inside their expected range.
pub fn bullet_count(
    positions: &[CandidatePosition],
    history: &[PositionRecord],
    eligible: &[EligiblePosition<'_>],
    config: &ValidationConfig,
) -> RuleOutcome {
    let errors = positions
        .iter()
        .filter_map(|position| {
            let index = resolve(&position.title, history, eligible, config)?;
            let expected = eligible.iter().find(|e| e.index == index)?.bullet_count;
            let actual = position.bullets.len();
            if expected.contains(actual) {
                return None;
            }
            let severity = if actual == 1 {
                Severity::Critical
            } else {
                Severity::High
            };
            Some(
                ValidationIssue::new(
                    IssueKind::WrongBulletCount,
                    severity,
                    format!(
                        "Position \"{}\" has {actual} bullet(s), expected {expected}",
                        position.title
                    ),
                )
                .regenerate()
                .for_position(&position.title)
                .with("actual", actual)
                .with("expected", expected.to_string()),
            )
        })
        .collect();

    RuleOutcome::from_errors(errors)
}

/// Per-bullet character limit and verb taxonomy.
pub fn bullet_format(positions: &[CandidatePosition], config: &ValidationConfig) -> RuleOutcome {
    let limit = config.bullet_char_limit;
    let mut errors = Vec::new();

    for position in positions {
        for (idx, bullet) in position.bullets.iter().enumerate() {
            let length = bullet.char_len();
            if length > limit {
                errors.push(
                    ValidationIssue::new(
                        IssueKind::CharLimitExceeded,
                        Severity::Critical,
                        format!("Bullet exceeds {limit} char limit"),
                    )
                    .regenerate()
                    .at_bullet(&position.title, idx)
                    .with("actual", length)
                    .with("limit", limit),
                );
            }

            if bullet.category().is_none() {
                errors.push(
                    ValidationIssue::new(
                        IssueKind::InvalidVerbCategory,
                        Severity::High,
                        format!("Invalid verb category \"{}\"", bullet.verb_category),
                    )
                    .regenerate()
                    .at_bullet(&position.title, idx),
                );
            }
        }
    }

    RuleOutcome::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::models::CandidateBullet;

    fn make_record(title: &str, company: &str, dates: &str) -> PositionRecord {
        PositionRecord {
            title: title.to_string(),
            company: company.to_string(),
            dates: dates.to_string(),
            is_independent: false,
            bullets: vec![],
        }
    }

    fn make_bullet(text: &str, category: &str) -> CandidateBullet {
        CandidateBullet {
            text: text.to_string(),
            verb_category: category.to_string(),
            keywords_used: vec![],
            char_count: None,
            has_metric: None,
        }
    }

    fn make_position(title: &str, company: &str, dates: &str, bullets: usize) -> CandidatePosition {
        CandidatePosition {
            title: title.to_string(),
            company: company.to_string(),
            dates: dates.to_string(),
            bullets: (0..bullets)
                .map(|i| make_bullet(&format!("Built thing number {i}"), "Built"))
                .collect(),
        }
    }

    fn config() -> ValidationConfig {
        ValidationConfig::for_year(2026)
    }

    fn history() -> Vec<PositionRecord> {
        vec![
            make_record("Senior Backend Engineer", "Acme Corp", "2022-Present"),
            make_record("Backend Engineer", "Initech", "2016-2022"),
            make_record("Data Analyst", "Globex", "2013-2015"),
            make_record("Systems Engineer", "Umbrella", "2008-2014"),
        ]
    }

    #[test]
    fn test_eligibility_recent_tenure_and_excluded() {
        let history = history();
        let eligible = eligible_positions(&history, &config());
        let titles: Vec<&str> = eligible.iter().map(|e| e.record.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Senior Backend Engineer", "Backend Engineer", "Systems Engineer"]
        );

        let current = &eligible[0];
        assert_eq!(current.reason.as_str(), "Recent/Current");
        assert_eq!(current.bullet_count.to_string(), "3-5");

        let tenure = &eligible[2];
        assert_eq!(tenure.reason, EligibilityReason::Tenure);
        assert_eq!(tenure.bullet_count.to_string(), "2-3");
    }

    #[test]
    fn test_eligibility_boundary_six_years() {
        let history = vec![
            make_record("A", "X", "2019-2020"),
            make_record("B", "X", "2018-2019"),
        ];
        let eligible = eligible_positions(&history, &config());
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].record.title, "A");
    }

    #[test]
    fn test_unparseable_dates_are_ineligible_but_not_extra() {
        let history = vec![
            make_record("Senior Backend Engineer", "Acme Corp", "2022-Present"),
            make_record("Volunteer", "Food Bank", "ongoing"),
        ];
        let eligible = eligible_positions(&history, &config());
        assert_eq!(eligible.len(), 1);

        let positions = vec![
            make_position("Senior Backend Engineer", "Acme Corp", "2022-Present", 3),
            make_position("Volunteer", "Food Bank", "ongoing", 2),
        ];
        let outcome = chronology_depth(&positions, &history, &eligible, &config());
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_chronology_reports_missing_and_drops_extra() {
        let history = history();
        let eligible = eligible_positions(&history, &config());
        let positions = vec![
            make_position("Senior Backend Engineer", "Acme", "2022-Present", 3),
            make_position("Data Analyst", "Globex", "2013-2015", 2),
        ];

        let outcome = chronology_depth(&positions, &history, &eligible, &config());
        let kinds: Vec<IssueKind> = outcome.errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![IssueKind::MissingPositions, IssueKind::ExtraPositions]);
        assert!(outcome.errors.iter().all(|e| !e.requires_regeneration));
        assert_eq!(
            outcome.errors[0].details["positions"],
            serde_json::json!(["Backend Engineer", "Systems Engineer"])
        );

        let corrected = outcome.corrected.unwrap();
        assert_eq!(corrected.len(), 1);
        assert_eq!(corrected[0].company, "Acme Corp");
    }

    #[test]
    fn test_chronology_keeps_paraphrased_current_title() {
        let history = vec![
            make_record("Senior Software Engineer", "Acme", "2022-Present"),
            make_record("Software Engineer", "Initech", "2008-2012"),
        ];
        let eligible = eligible_positions(&history, &config());
        assert_eq!(eligible.len(), 1);
        let positions = vec![make_position(
            "Lead Software Engineer",
            "Acme",
            "2022-Present",
            4,
        )];

        let outcome = chronology_depth(&positions, &history, &eligible, &config());
        assert!(outcome.is_clean(), "{:?}", outcome.errors);
        assert!(outcome.corrected.is_none());

        let outcome = position_metadata(
            &positions,
            &history,
            &eligible,
            &TargetDescription::default(),
            &config(),
        );
        let kinds: Vec<IssueKind> = outcome.errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![IssueKind::WrongPositionTitle]);
        let fixed = outcome.corrected.unwrap();
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed[0].title, "Senior Software Engineer");
        assert_eq!(fixed[0].company, "Acme");
        assert_eq!(fixed[0].bullets.len(), 4);
    }

    #[test]
    fn test_chronology_extra_requires_exact_ineligible_title() {
        let history = vec![
            make_record("Senior Software Engineer", "Acme", "2022-Present"),
            make_record("Software Engineer", "Initech", "2008-2012"),
        ];
        let eligible = eligible_positions(&history, &config());
        let positions = vec![
            make_position("Senior Software Engineer", "Acme", "2022-Present", 3),
            make_position(" software engineer ", "Initech", "2008-2012", 2),
        ];

        let outcome = chronology_depth(&positions, &history, &eligible, &config());
        let kinds: Vec<IssueKind> = outcome.errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![IssueKind::ExtraPositions]);
        let corrected = outcome.corrected.unwrap();
        assert_eq!(corrected.len(), 1);
        assert_eq!(corrected[0].title, "Senior Software Engineer");
    }

    #[test]
    fn test_metadata_snaps_to_canonical_values() {
        let history = history();
        let positions = vec![make_position("Senior Backend Eng", "Acme", "2021-2026", 3)];
        let outcome = position_metadata(
            &positions,
            &history,
            &eligible_positions(&history, &config()),
            &TargetDescription::default(),
            &config(),
        );

        let kinds: Vec<IssueKind> = outcome.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::WrongPositionTitle,
                IssueKind::WrongCompany,
                IssueKind::WrongDates
            ]
        );
        let fixed = &outcome.corrected.unwrap()[0];
        assert_eq!(fixed.title, "Senior Backend Engineer");
        assert_eq!(fixed.company, "Acme Corp");
        assert_eq!(fixed.dates, "2022-Present");
        assert_eq!(fixed.bullets.len(), 3);
    }

    #[test]
    fn test_metadata_flags_jd_company() {
        let history = history();
        let positions = vec![make_position("Backend Engineer", "Hooli", "2016-2022", 3)];
        let target = TargetDescription {
            company: Some("Hooli".to_string()),
            ..TargetDescription::default()
        };
        let outcome = position_metadata(
            &positions,
            &history,
            &eligible_positions(&history, &config()),
            &target,
            &config(),
        );
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, IssueKind::UsedJdCompany);
        assert_eq!(outcome.errors[0].severity, Severity::Critical);
        assert!(!outcome.errors[0].requires_regeneration);
    }

    #[test]
    fn test_metadata_keeps_unresolved_position_with_warning() {
        let history = history();
        let positions = vec![make_position("Astronaut", "NASA", "2020-2021", 3)];
        let outcome = position_metadata(
            &positions,
            &history,
            &eligible_positions(&history, &config()),
            &TargetDescription::default(),
            &config(),
        );
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, IssueKind::PositionNotInHistory);
        assert!(outcome.corrected.is_none());
    }

    #[test]
    fn test_metadata_independent_suffix() {
        let mut record = make_record("Resume Optimizer", "Personal Project", "2024-Present");
        record.is_independent = true;
        let history = vec![record];

        let labelled = vec![make_position(
            "Resume Optimizer (Portfolio Project)",
            "Personal Project",
            "2024-Present",
            3,
        )];
        let outcome = position_metadata(
            &labelled,
            &history,
            &eligible_positions(&history, &config()),
            &TargetDescription::default(),
            &config(),
        );
        assert!(outcome.is_clean());

        let renamed = vec![make_position(
            "Resume Optimiser",
            "Personal Project",
            "2024-Present",
            3,
        )];
        let outcome = position_metadata(
            &renamed,
            &history,
            &eligible_positions(&history, &config()),
            &TargetDescription::default(),
            &config(),
        );
        assert_eq!(outcome.errors[0].kind, IssueKind::WrongPositionTitle);
        assert_eq!(
            outcome.corrected.unwrap()[0].title,
            "Resume Optimizer (Independent Project)"
        );
    }

    #[test]
    fn test_order_sorts_present_first_and_unparseable_last() {
        let positions = vec![
            make_position("Old", "X", "2010-2012", 2),
            make_position("Unknown", "X", "sometime", 2),
            make_position("Current", "X", "2022-Present", 3),
            make_position("Mid", "X", "2016-2022", 3),
        ];
        let outcome = chronological_order(&positions);
        assert_eq!(outcome.errors[0].kind, IssueKind::WrongOrder);
        let titles: Vec<String> = outcome
            .corrected
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Current", "Mid", "Old", "Unknown"]);
    }

    #[test]
    fn test_order_accepts_sorted_input() {
        let positions = vec![
            make_position("Current", "X", "2022-Present", 3),
            make_position("Mid", "X", "2016-2022", 3),
            make_position("Also Mid", "X", "2019-2022", 3),
        ];
        let outcome = chronological_order(&positions);
        assert!(outcome.is_clean());
        assert!(outcome.corrected.is_none());
    }

    #[test]
    fn test_bullet_count_severity() {
        let history = history();
        let eligible = eligible_positions(&history, &config());
        let positions = vec![
            make_position("Senior Backend Engineer", "Acme Corp", "2022-Present", 1),
            make_position("Backend Engineer", "Initech", "2016-2022", 6),
            make_position("Systems Engineer", "Umbrella", "2008-2014", 2),
        ];
        let outcome = bullet_count(&positions, &history, &eligible, &config());
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].severity, Severity::Critical);
        assert_eq!(outcome.errors[1].severity, Severity::High);
        assert!(outcome.errors.iter().all(|e| e.requires_regeneration));
        assert_eq!(
            outcome.errors[1].message,
            "Position \"Backend Engineer\" has 6 bullet(s), expected 3-5"
        );
    }

    #[test]
    fn test_char_limit_boundary() {
        let mut position = make_position("Engineer", "X", "2020-2022", 0);
        position.bullets = vec![
            make_bullet(&"a".repeat(210), "Built"),
            make_bullet(&"a".repeat(211), "Lead"),
        ];
        let outcome = bullet_format(&[position], &config());
        assert_eq!(outcome.errors.len(), 1);
        let issue = &outcome.errors[0];
        assert_eq!(issue.kind, IssueKind::CharLimitExceeded);
        assert!(issue.requires_regeneration);
        assert_eq!(issue.bullet_index, Some(1));
    }

    #[test]
    fn test_invalid_verb_category() {
        let mut position = make_position("Engineer", "X", "2020-2022", 0);
        position.bullets = vec![make_bullet("Spearheaded things", "Spearheaded")];
        let outcome = bullet_format(&[position], &config());
        assert_eq!(outcome.errors[0].kind, IssueKind::InvalidVerbCategory);
        assert!(outcome.errors[0].requires_regeneration);
    }
}
