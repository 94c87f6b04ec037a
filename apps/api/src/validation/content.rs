//! Content tier: honesty against declared limitations, length budgets, keyword stuffing,
//! implausible numbers and ATS-hostile punctuation.

use crate::validation::config::ValidationConfig;
use crate::validation::issues::{IssueKind, RuleOutcome, Severity, ValidationIssue};
use crate::validation::models::{
    normalize_keyword, CandidatePosition, CandidateProfile, GeneratedContent, KeywordIntents,
};
use crate::validation::text;

/// Skills the candidate said they lack must not show up in any bullet.
pub fn limitation_enforcement(
    positions: &[CandidatePosition],
    limitations: &[String],
) -> RuleOutcome {
    let keywords = text::limitation_keywords(limitations);
    if keywords.is_empty() {
        return RuleOutcome::default();
    }

    let bullets = positions
        .iter()
        .flat_map(|p| p.bullet_texts())
        .collect::<Vec<_>>()
        .join(" ");

    // Whole words only: "go" must not trip on "Google" or "ago".
    let errors = keywords
        .into_iter()
        .filter(|k| text::keyword_occurrences(&bullets, k) > 0)
        .map(|keyword| {
            ValidationIssue::new(
                IssueKind::LimitationViolated,
                Severity::Critical,
                format!("Claimed skill \"{keyword}\" but it's listed in honest limitations"),
            )
            .regenerate()
            .with("keyword", keyword)
        })
        .collect();

    RuleOutcome::from_errors(errors)
}

/// A skill cannot be both hard and soft.
pub fn skill_classification(content: &GeneratedContent) -> RuleOutcome {
    let soft: Vec<String> = content
        .soft_skill_list()
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let errors = content
        .hard_skill_list()
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| soft.contains(s))
        .map(|skill| {
            ValidationIssue::new(
                IssueKind::SkillDualClassification,
                Severity::Medium,
                format!("Skill \"{skill}\" classified as both hard and soft skill"),
            )
            .regenerate()
            .with("skill", skill)
        })
        .collect();

    RuleOutcome::from_errors(errors)
}

/// Minimum bullet length and the overall word budget for bullets plus summary.
pub fn budget_enforcement(
    positions: &[CandidatePosition],
    summary: Option<&str>,
    config: &ValidationConfig,
) -> RuleOutcome {
    let min_chars = config.bullet_char_min;
    let mut errors = Vec::new();

    for position in positions {
        for (idx, bullet) in position.bullets.iter().enumerate() {
            let length = bullet.char_len();
            if length < min_chars {
                errors.push(
                    ValidationIssue::new(
                        IssueKind::BulletTooShort,
                        Severity::Medium,
                        format!("Bullet has {length} chars (min {min_chars})"),
                    )
                    .regenerate()
                    .at_bullet(&position.title, idx)
                    .with("actual", length)
                    .with("minimum", min_chars),
                );
            }
        }
    }

    let total: usize = positions
        .iter()
        .flat_map(|p| p.bullet_texts())
        .map(text::word_count)
        .sum::<usize>()
        + summary.map_or(0, text::word_count);

    if total < config.min_total_words {
        errors.push(
            ValidationIssue::new(
                IssueKind::TotalWordsTooFew,
                Severity::Medium,
                format!("Total word count {total} (min {})", config.min_total_words),
            )
            .regenerate()
            .with("actual", total)
            .with("minimum", config.min_total_words),
        );
    }
    if total > config.max_total_words {
        errors.push(
            ValidationIssue::new(
                IssueKind::TotalWordsTooMany,
                Severity::Medium,
                format!("Total word count {total} (max {})", config.max_total_words),
            )
            .regenerate()
            .with("actual", total)
            .with("maximum", config.max_total_words),
        );
    }

    RuleOutcome::from_errors(errors)
}

/// Per-bullet keyword stuffing, plus any keyword the candidate asked to keep out.
pub fn keyword_density(
    positions: &[CandidatePosition],
    summary: Option<&str>,
    keywords: &KeywordIntents,
    config: &ValidationConfig,
) -> RuleOutcome {
    let wanted: Vec<String> = keywords
        .use_keywords
        .iter()
        .map(|k| normalize_keyword(k))
        .filter(|k| !k.is_empty())
        .collect();
    let ignored: Vec<String> = keywords
        .ignore
        .iter()
        .map(|k| normalize_keyword(k))
        .filter(|k| !k.is_empty())
        .collect();

    let mut errors = Vec::new();

    for position in positions {
        for (idx, bullet) in position.bullets.iter().enumerate() {
            let hits: Vec<(&str, usize)> = wanted
                .iter()
                .map(|k| (k.as_str(), text::keyword_occurrences(&bullet.text, k)))
                .filter(|(_, count)| *count > 0)
                .collect();

            if hits.len() > config.max_keywords_per_bullet {
                errors.push(
                    ValidationIssue::new(
                        IssueKind::TooManyKeywords,
                        Severity::Medium,
                        format!(
                            "Bullet has {} keywords (max {})",
                            hits.len(),
                            config.max_keywords_per_bullet
                        ),
                    )
                    .regenerate()
                    .at_bullet(&position.title, idx)
                    .with("actual", hits.len())
                    .with("maximum", config.max_keywords_per_bullet),
                );
            }

            for (keyword, count) in hits {
                if count > config.max_keyword_repeats {
                    errors.push(
                        ValidationIssue::new(
                            IssueKind::KeywordRepeated,
                            Severity::Medium,
                            format!("Keyword \"{keyword}\" used {count} times in one bullet"),
                        )
                        .regenerate()
                        .at_bullet(&position.title, idx)
                        .with("keyword", keyword)
                        .with("count", count),
                    );
                }
            }

            for keyword in &ignored {
                if text::keyword_occurrences(&bullet.text, keyword) > 0 {
                    let location = format!("{} bullet {}", position.title, idx + 1);
                    errors.push(
                        ignored_keyword(keyword, &location).at_bullet(&position.title, idx),
                    );
                }
            }
        }
    }

    if let Some(summary) = summary {
        for keyword in &ignored {
            if text::keyword_occurrences(summary, keyword) > 0 {
                errors.push(ignored_keyword(keyword, "Professional Summary"));
            }
        }
    }

    RuleOutcome::from_errors(errors)
}

fn ignored_keyword(keyword: &str, location: &str) -> ValidationIssue {
    ValidationIssue::new(
        IssueKind::IgnoredKeywordUsed,
        Severity::Medium,
        format!("Keyword \"{keyword}\" was marked to ignore but appears in {location}"),
    )
    .regenerate()
    .with("keyword", keyword)
    .with("location", location)
}

/// Percentages above 100 outside a growth context, reductions above 100%, and unexplained
/// seven-digit numbers.
pub fn metric_plausibility(positions: &[CandidatePosition]) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    for position in positions {
        for (idx, bullet) in position.bullets.iter().enumerate() {
            let lower = bullet.text.to_lowercase();
            let growth_context = lower.contains("growth") || lower.contains("increase");

            for (token, value) in text::high_percentages(&bullet.text) {
                if value > 100 && !growth_context {
                    outcome.warnings.push(
                        ValidationIssue::warning(
                            IssueKind::HighPercentage,
                            format!("Percentage {token} may be implausible (>100%)"),
                        )
                        .at_bullet(&position.title, idx)
                        .with("value", token),
                    );
                }
            }

            for value in text::reduction_percentages(&bullet.text) {
                if value > 100 {
                    outcome.errors.push(
                        ValidationIssue::new(
                            IssueKind::ImpossibleTimeSavings,
                            Severity::High,
                            format!("Time savings of {value}% is impossible"),
                        )
                        .regenerate()
                        .at_bullet(&position.title, idx)
                        .with("value", value),
                    );
                }
            }

            let money_context = bullet.text.contains('$') || lower.contains("revenue");
            if !money_context {
                for number in text::large_numbers(&bullet.text) {
                    outcome.warnings.push(
                        ValidationIssue::warning(
                            IssueKind::LargeNumber,
                            format!("Large number {number} may need verification"),
                        )
                        .at_bullet(&position.title, idx)
                        .with("value", number),
                    );
                }
            }
        }
    }

    outcome
}

/// Early-career candidates get a warning for senior-scope claims.
pub fn scope_attribution(
    positions: &[CandidatePosition],
    profile: &CandidateProfile,
    config: &ValidationConfig,
) -> RuleOutcome {
    if !profile.is_junior(config.junior_max_years) {
        return RuleOutcome::default();
    }

    let mut warnings = Vec::new();
    for position in positions {
        for (idx, bullet) in position.bullets.iter().enumerate() {
            let lower = bullet.text.to_lowercase();
            for phrase in text::SENIOR_SCOPE_PHRASES {
                if lower.contains(&phrase.to_lowercase()) {
                    warnings.push(
                        ValidationIssue::warning(
                            IssueKind::ScopeMismatch,
                            format!("Phrase \"{phrase}\" may be too senior for candidate level"),
                        )
                        .at_bullet(&position.title, idx)
                        .with("phrase", *phrase),
                    );
                }
            }
        }
    }

    RuleOutcome::from_warnings(warnings)
}

/// Em and en dashes trip some applicant-tracking parsers.
pub fn ats_formatting(positions: &[CandidatePosition], summary: Option<&str>) -> RuleOutcome {
    let dash_issue = |location: String| {
        ValidationIssue::new(
            IssueKind::EmDashFound,
            Severity::Medium,
            format!("Em-dash/en-dash found in {location} - may break ATS"),
        )
        .regenerate()
        .with("location", location)
    };

    let mut errors = Vec::new();
    for position in positions {
        for (idx, bullet) in position.bullets.iter().enumerate() {
            if text::contains_long_dash(&bullet.text) {
                errors.push(
                    dash_issue(format!("{} bullet {}", position.title, idx + 1))
                        .at_bullet(&position.title, idx),
                );
            }
        }
    }
    if summary.is_some_and(text::contains_long_dash) {
        errors.push(dash_issue("Professional Summary".to_string()));
    }

    RuleOutcome::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::models::{CandidateBullet, ExperienceLevel};

    fn make_position(bullets: &[&str]) -> CandidatePosition {
        CandidatePosition {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            dates: "2020-Present".to_string(),
            bullets: bullets
                .iter()
                .map(|text| CandidateBullet {
                    text: text.to_string(),
                    verb_category: "Built".to_string(),
                    keywords_used: vec![],
                    char_count: None,
                    has_metric: None,
                })
                .collect(),
        }
    }

    fn config() -> ValidationConfig {
        ValidationConfig::for_year(2026)
    }

    #[test]
    fn test_limitation_violation_is_critical() {
        let positions = vec![make_position(&["Ran production Kubernetes clusters"])];
        let limitations = vec!["No production Kubernetes experience".to_string()];
        let outcome = limitation_enforcement(&positions, &limitations);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].severity, Severity::Critical);
        assert_eq!(outcome.errors[0].details["keyword"], "production kubernetes");
        assert!(limitation_enforcement(&positions, &[]).is_clean());
    }

    #[test]
    fn test_limitation_matches_whole_words_only() {
        let limitations = vec!["Limited Go".to_string()];
        let clean = vec![make_position(&["Migrated Google Ads reporting built years ago"])];
        assert!(limitation_enforcement(&clean, &limitations).is_clean());

        let claimed = vec![make_position(&["Wrote Go services for billing"])];
        let outcome = limitation_enforcement(&claimed, &limitations);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].details["keyword"], "go");
        assert!(outcome.errors[0].requires_regeneration);
    }

    #[test]
    fn test_dual_classified_skill() {
        let content: GeneratedContent = serde_json::from_value(json!({
            "hardSkills": ["Rust", " Communication "],
            "softSkills": ["communication", "Mentoring"]
        }))
        .unwrap();
        let outcome = skill_classification(&content);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].details["skill"], "communication");
    }

    #[test]
    fn test_budget_short_bullet_and_word_floor() {
        let positions = vec![make_position(&["Built a thing"])];
        let outcome = budget_enforcement(&positions, Some("Short summary."), &config());
        let kinds: Vec<IssueKind> = outcome.errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![IssueKind::BulletTooShort, IssueKind::TotalWordsTooFew]);
        assert_eq!(outcome.errors[1].details["actual"], 5);
    }

    #[test]
    fn test_budget_word_ceiling() {
        let long = "word ".repeat(501);
        let outcome = budget_enforcement(&[], Some(&long), &config());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, IssueKind::TotalWordsTooMany);
    }

    #[test]
    fn test_budget_within_range() {
        let summary = "word ".repeat(400);
        assert!(budget_enforcement(&[], Some(&summary), &config()).is_clean());
    }

    #[test]
    fn test_keyword_density_limits() {
        let positions = vec![make_position(&[
            "Built Rust services on Kafka with Postgres and Redis",
            "Rust rewrite of the Rust parser, Rust everywhere",
        ])];
        let keywords = KeywordIntents::new(
            vec![
                "Rust".to_string(),
                "Kafka".to_string(),
                "Postgres".to_string(),
                "Custom: Redis".to_string(),
            ],
            vec![],
        );
        let outcome = keyword_density(&positions, None, &keywords, &config());
        let kinds: Vec<IssueKind> = outcome.errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![IssueKind::TooManyKeywords, IssueKind::KeywordRepeated]);
        assert_eq!(outcome.errors[0].bullet_index, Some(0));
        assert_eq!(outcome.errors[1].details["count"], 3);
    }

    #[test]
    fn test_ignored_keyword_in_bullet_and_summary() {
        let positions = vec![make_position(&["Maintained the PHP monolith"])];
        let keywords = KeywordIntents::new(vec![], vec!["Custom: PHP".to_string()]);
        let outcome = keyword_density(&positions, Some("Veteran of PHP."), &keywords, &config());
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome
            .errors
            .iter()
            .all(|e| e.kind == IssueKind::IgnoredKeywordUsed && e.requires_regeneration));
        assert_eq!(outcome.errors[1].details["location"], "Professional Summary");
    }

    #[test]
    fn test_plausibility() {
        let positions = vec![make_position(&[
            "Cut costs 250% in a quarter",
            "Reduced onboarding time by 120%",
            "Revenue growth of 300% year over year",
            "Indexed 45000000 documents",
            "Closed $12000000 in revenue",
        ])];
        let outcome = metric_plausibility(&positions);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, IssueKind::ImpossibleTimeSavings);
        assert_eq!(outcome.errors[0].bullet_index, Some(1));

        let kinds: Vec<IssueKind> = outcome.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::HighPercentage,
                IssueKind::HighPercentage,
                IssueKind::LargeNumber
            ]
        );
    }

    #[test]
    fn test_scope_only_for_junior() {
        let positions = vec![make_position(&["Drove a company-wide rollout for the executive team"])];
        let junior = CandidateProfile {
            experience_level: Some(ExperienceLevel::Entry),
            years_experience: Some(1.5),
        };
        let outcome = scope_attribution(&positions, &junior, &config());
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome.errors.is_empty());

        let senior = CandidateProfile {
            experience_level: Some(ExperienceLevel::Senior),
            years_experience: Some(8.0),
        };
        assert!(scope_attribution(&positions, &senior, &config()).warnings.is_empty());
    }

    #[test]
    fn test_ats_dashes() {
        let positions = vec![make_position(&["Shipped search \u{2014} in 3 weeks", "Plain bullet"])];
        let outcome = ats_formatting(&positions, Some("Engineer \u{2013} builder"));
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].details["location"], "Engineer bullet 1");
        assert_eq!(outcome.errors[1].details["location"], "Professional Summary");
        assert!(ats_formatting(&positions[..0], Some("no dashes - here")).is_clean());
    }
}
