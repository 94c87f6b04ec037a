//! Secondary tier: soft recommendations, warnings only.

use crate::validation::config::ValidationConfig;
use crate::validation::issues::{IssueKind, RuleOutcome, Severity, ValidationIssue};
use crate::validation::models::CandidatePosition;
use crate::validation::text;

/// The most recent position (first after ordering) should be the richest.
pub fn recency_weighting(positions: &[CandidatePosition], config: &ValidationConfig) -> RuleOutcome {
    let Some(recent) = positions.first() else {
        return RuleOutcome::default();
    };
    let mut warnings = Vec::new();

    let bullets = recent.bullets.len();
    if bullets < config.recent_min_bullets {
        warnings.push(
            ValidationIssue::warning(
                IssueKind::RecentPositionFewBullets,
                format!(
                    "Most recent position has {bullets} bullets (recommend {}+)",
                    config.recent_min_bullets
                ),
            )
            .for_position(&recent.title),
        );
    }

    let metrics: usize = recent.bullet_texts().map(text::recent_metric_count).sum();
    if metrics < config.recent_min_metrics {
        warnings.push(
            ValidationIssue::warning(
                IssueKind::RecentPositionFewMetrics,
                format!(
                    "Most recent position has {metrics} metrics (recommend {}+)",
                    config.recent_min_metrics
                ),
            )
            .for_position(&recent.title),
        );
    }

    RuleOutcome::from_warnings(warnings)
}

/// Known acronyms should be spelled out at or before their first use, reading the summary
/// first and then every bullet in order.
pub fn acronym_expansion(positions: &[CandidatePosition], summary: Option<&str>) -> RuleOutcome {
    let mut texts: Vec<&str> = summary.into_iter().collect();
    texts.extend(positions.iter().flat_map(|p| p.bullet_texts()));
    let combined = texts.join(" ");

    let warnings = text::unexpanded_acronyms(&combined)
        .into_iter()
        .map(|(acronym, expansion)| {
            ValidationIssue::new(
                IssueKind::AcronymNotExpanded,
                Severity::Low,
                format!("Acronym \"{acronym}\" not expanded on first use"),
            )
            .with("acronym", acronym)
            .with("expansion", expansion)
        })
        .collect();

    RuleOutcome::from_warnings(warnings)
}
